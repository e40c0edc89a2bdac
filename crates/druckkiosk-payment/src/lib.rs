// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Druckkiosk Payment — pricing calculator, UPI payment requests, and QR
// code rendering.

pub mod pricing;
pub mod qr;
pub mod upi;

pub use pricing::{PricingQuote, quote};
pub use qr::{payment_qr_png, qr_png};
pub use upi::PaymentRequest;
