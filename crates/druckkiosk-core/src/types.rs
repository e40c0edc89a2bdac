// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Druckkiosk print kiosk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{DruckkioskError, Result};

/// Unique identifier for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document types a customer may upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    PlainText,
    Png,
    Jpeg,
}

impl DocumentType {
    /// MIME type string for HTTP responses and logs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Canonical file extension used when persisting the upload.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "txt",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::PlainText),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Whether this document is a raster image the kiosk can crop and
    /// normalize before printing.
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Page dimensions in pixels at the given render resolution.
    ///
    /// Computed as `round(mm * dpi / 25.4)`.  A4 at 300 DPI yields
    /// (2480, 3508).
    pub fn pixel_dimensions(&self, dpi: u32) -> (u32, u32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        let to_px = |mm: u32| (f64::from(mm) * f64::from(dpi) / 25.4).round() as u32;
        (to_px(w_mm), to_px(h_mm))
    }
}

/// Duplex printing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplexMode {
    Simplex,
    LongEdge,
    ShortEdge,
}

impl DuplexMode {
    /// CUPS/IPP `sides` keyword (RFC 8011 §5.2.8).
    pub fn sides_keyword(&self) -> &'static str {
        match self {
            Self::Simplex => "one-sided",
            Self::LongEdge => "two-sided-long-edge",
            Self::ShortEdge => "two-sided-short-edge",
        }
    }
}

/// A monetary amount in minor currency units (paise).
///
/// All pricing arithmetic is integer-exact; the `Display` impl renders
/// major units with two decimals (`Money::from_minor(900)` → `"9.00"`),
/// which is also the format embedded in UPI payment links.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from minor units (paise).
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Construct from whole major units (rupees).
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// The amount in minor units.
    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiply by a unit count (e.g. number of copies).
    pub fn times(&self, count: u32) -> Money {
        Money(self.0 * i64::from(count))
    }

    /// Scale by a percentage, truncating toward zero.
    ///
    /// `scale_percent(150)` applied to 2.00 gives exactly 3.00.
    pub fn scale_percent(&self, percent: u32) -> Money {
        Money(self.0 * i64::from(percent) / 100)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Print option selections made by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub copies: u32,
    pub color: bool,
    pub duplex: bool,
}

impl PrintOptions {
    /// Reject selections the kiosk cannot price or print.
    pub fn validate(&self) -> Result<()> {
        if self.copies < 1 {
            return Err(DruckkioskError::InvalidInput(format!(
                "copies must be at least 1, got {}",
                self.copies
            )));
        }
        Ok(())
    }

    /// The duplex mode the selection maps to.  Two-sided jobs bind on the
    /// long edge, matching what walk-up customers expect for portrait pages.
    pub fn sides(&self) -> DuplexMode {
        if self.duplex {
            DuplexMode::LongEdge
        } else {
            DuplexMode::Simplex
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            copies: 1,
            color: false,
            duplex: false,
        }
    }
}

/// A confirmed print job, ready for dispatch.
///
/// Immutable once built; created when the customer confirms their options
/// and discarded after dispatch returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: JobId,
    /// Path of the (possibly edited) file to print.
    pub source_path: PathBuf,
    pub document_type: DocumentType,
    pub document_name: String,
    /// SHA-256 hash of the document bytes, for logs and receipts.
    pub document_hash: String,
    pub options: PrintOptions,
    pub created_at: DateTime<Utc>,
}

impl PrintJob {
    pub fn new(
        source_path: PathBuf,
        document_type: DocumentType,
        document_name: String,
        document_hash: String,
        options: PrintOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            id: JobId::new(),
            source_path,
            document_type,
            document_name,
            document_hash,
            options,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_at_300_dpi_is_2480_by_3508() {
        assert_eq!(PaperSize::A4.pixel_dimensions(300), (2480, 3508));
    }

    #[test]
    fn letter_at_300_dpi() {
        // 216mm x 279mm → 2551 x 3295
        assert_eq!(PaperSize::Letter.pixel_dimensions(300), (2551, 3295));
    }

    #[test]
    fn money_display_two_decimals() {
        assert_eq!(Money::from_minor(900).to_string(), "9.00");
        assert_eq!(Money::from_minor(1050).to_string(), "10.50");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
    }

    #[test]
    fn money_scale_percent_exact() {
        assert_eq!(Money::from_major(2).scale_percent(150), Money::from_major(3));
    }

    #[test]
    fn extension_mapping_case_insensitive() {
        assert_eq!(DocumentType::from_extension("JPEG"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_extension("jpg"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_extension("docx"), None);
    }

    #[test]
    fn zero_copies_rejected() {
        let opts = PrintOptions {
            copies: 0,
            color: false,
            duplex: false,
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn duplex_flag_maps_to_long_edge() {
        let opts = PrintOptions {
            copies: 1,
            color: false,
            duplex: true,
        };
        assert_eq!(opts.sides(), DuplexMode::LongEdge);
        assert_eq!(opts.sides().sides_keyword(), "two-sided-long-edge");
    }
}
