// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Druckkiosk Print — spooler capability over the host OS print subsystem
// and the dispatch state machine.  This crate bridges between the core
// domain types in `druckkiosk-core` and the actual printing infrastructure.

pub mod cups;
pub mod dispatch;
pub mod spooler;
pub mod windows;

pub use dispatch::{DispatchOutcome, DispatchReceipt, DispatchState, Dispatcher, FailureKind};
pub use spooler::{Spooler, SubmitOptions, platform_spooler};
