// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod data_dir;
pub mod kiosk_services;

pub use kiosk_services::{KioskServices, PrintReceipt, UploadSummary};
