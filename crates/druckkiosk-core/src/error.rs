// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Druckkiosk.

use thiserror::Error;

/// Top-level error type for all Druckkiosk operations.
#[derive(Debug, Error)]
pub enum DruckkioskError {
    // -- Document errors --
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    // -- Pricing / input errors --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- Payment errors --
    #[error("invalid payment request: {0}")]
    InvalidPaymentRequest(String),

    #[error("QR encoding failed: {0}")]
    QrEncoding(String),

    // -- Print errors --
    #[error("no printer available on this host")]
    NoPrinterAvailable,

    #[error("print submission failed: {0}")]
    PrintSubmission(String),

    #[error("printing is not supported on this platform")]
    UnsupportedPlatform,

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DruckkioskError>;
