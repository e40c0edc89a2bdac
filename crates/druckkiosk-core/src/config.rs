// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kiosk configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DruckkioskError, Result};
use crate::types::{Money, PaperSize};

/// Persistent kiosk settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Paper size images are normalized to before printing.
    pub paper_size: PaperSize,
    /// Render resolution for page normalization (default 300 DPI).
    pub render_dpi: u32,
    /// Per-copy pricing policy.
    pub pricing: PricingPolicy,
    /// Payment recipient shown in the UPI QR code.
    pub payee: PayeeConfig,
    /// Port the kiosk web form listens on.
    pub listen_port: u16,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            render_dpi: 300,
            pricing: PricingPolicy::default(),
            payee: PayeeConfig::default(),
            listen_port: 8630,
        }
    }
}

impl KioskConfig {
    /// Validate settings at startup.  A kiosk with a nonsensical tariff or
    /// a zero-area page must refuse to start rather than misquote customers.
    pub fn validate(&self) -> Result<()> {
        self.pricing.validate()?;
        let (w, h) = self.paper_size.pixel_dimensions(self.render_dpi);
        if w == 0 || h == 0 {
            return Err(DruckkioskError::InvalidInput(format!(
                "paper size {:?} at {} DPI has zero area",
                self.paper_size, self.render_dpi
            )));
        }
        Ok(())
    }
}

/// Per-copy tariff.
///
/// The effective per-copy rate is `color_rate` for colour jobs and
/// `base_rate` otherwise; duplex scales the rate by `duplex_percent / 100`
/// (two-sided handling costs more per sheet).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Rate per monochrome copy.
    pub base_rate: Money,
    /// Rate per colour copy.
    pub color_rate: Money,
    /// Duplex scaling in percent (150 = one-and-a-half times the rate).
    pub duplex_percent: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base_rate: Money::from_major(2),
            color_rate: Money::from_major(10),
            duplex_percent: 150,
        }
    }
}

impl PricingPolicy {
    /// Tariff sanity: colour and duplex must never be cheaper than plain
    /// single-sided monochrome.
    pub fn validate(&self) -> Result<()> {
        if self.base_rate <= Money::ZERO {
            return Err(DruckkioskError::InvalidInput(format!(
                "base rate must be positive, got {}",
                self.base_rate
            )));
        }
        if self.color_rate < self.base_rate {
            return Err(DruckkioskError::InvalidInput(format!(
                "colour rate {} is below the base rate {}",
                self.color_rate, self.base_rate
            )));
        }
        if self.duplex_percent < 100 {
            return Err(DruckkioskError::InvalidInput(format!(
                "duplex percent must be at least 100, got {}",
                self.duplex_percent
            )));
        }
        Ok(())
    }
}

/// UPI payment recipient details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayeeConfig {
    /// Virtual payment address (the `pa` field of the UPI link).
    pub handle: String,
    /// Name shown in the payer's UPI app (the `pn` field).
    pub display_name: String,
    /// ISO 4217 currency code (the `cu` field).
    pub currency: String,
}

impl Default for PayeeConfig {
    fn default() -> Self {
        Self {
            handle: "kiosk@upi".into(),
            display_name: "Druckkiosk".into(),
            currency: "INR".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        KioskConfig::default().validate().expect("default config");
    }

    #[test]
    fn colour_cheaper_than_base_rejected() {
        let policy = PricingPolicy {
            base_rate: Money::from_major(10),
            color_rate: Money::from_major(2),
            duplex_percent: 150,
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn duplex_discount_rejected() {
        let policy = PricingPolicy {
            duplex_percent: 80,
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
