// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pricing calculator — a pure function of the print option selections and
// the configured tariff.  No hidden state: the same inputs always produce
// the same quote.

use serde::{Deserialize, Serialize};
use tracing::debug;

use druckkiosk_core::config::PricingPolicy;
use druckkiosk_core::error::Result;
use druckkiosk_core::types::{Money, PrintOptions};

/// A fully-derived price quote for one print job.
///
/// Carries the tariff inputs alongside the result so receipts and logs can
/// show how the total was reached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingQuote {
    /// Tariff rate per monochrome copy.
    pub base_rate: Money,
    /// Tariff rate per colour copy.
    pub color_rate: Money,
    /// Duplex scaling in percent.
    pub duplex_percent: u32,
    pub copies: u32,
    pub color: bool,
    pub duplex: bool,
    /// The per-copy rate after colour and duplex adjustments.
    pub effective_rate: Money,
    /// `effective_rate × copies`.
    pub total: Money,
}

/// Compute the price for the given selections under the given tariff.
///
/// Colour selects the colour rate instead of the base rate; duplex scales
/// the chosen rate by `duplex_percent / 100`.  Fails with `InvalidInput`
/// for zero copies or a tariff that violates its own invariants.
pub fn quote(
    policy: &PricingPolicy,
    copies: u32,
    color: bool,
    duplex: bool,
) -> Result<PricingQuote> {
    policy.validate()?;
    let options = PrintOptions {
        copies,
        color,
        duplex,
    };
    options.validate()?;

    let rate = if color {
        policy.color_rate
    } else {
        policy.base_rate
    };
    let effective_rate = if duplex {
        rate.scale_percent(policy.duplex_percent)
    } else {
        rate
    };
    let total = effective_rate.times(copies);

    debug!(
        copies,
        color,
        duplex,
        effective_rate = %effective_rate,
        total = %total,
        "quote computed"
    );

    Ok(PricingQuote {
        base_rate: policy.base_rate,
        color_rate: policy.color_rate,
        duplex_percent: policy.duplex_percent,
        copies,
        color,
        duplex,
        effective_rate,
        total,
    })
}
