// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spooler capability — the one seam between the kiosk and the host OS
// print subsystem.
//
// Exactly one concrete implementation is selected per deployment target,
// decided once at process start via `platform_spooler()`.  There is no
// dynamic switching mid-run.

use std::path::Path;

use druckkiosk_core::error::Result;
use druckkiosk_core::types::DuplexMode;

/// Options accompanying a single submission to the OS spooler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOptions {
    pub copies: u32,
    pub sides: DuplexMode,
    pub color: bool,
    /// Human-readable name shown in the OS print queue.
    pub job_name: String,
}

/// Capability interface over the host platform's print subsystem.
///
/// Submission is a blocking call; once the spooler accepts the job, the OS
/// owns queuing and no cancellation is supported from here.
pub trait Spooler: Send + Sync {
    /// Short backend name for logs ("CUPS", "Windows spooler", ...).
    fn backend_name(&self) -> &'static str;

    /// The host's default (or first available) printer, if any.
    fn default_printer(&self) -> Result<Option<String>>;

    /// Submit a file to the named printer.  All-or-nothing: on error,
    /// nothing was queued.
    fn submit(&self, printer: &str, file_path: &Path, options: &SubmitOptions) -> Result<()>;
}

/// Select the spooler implementation for the host OS.
///
/// Called once at process start.  Hosts without a print integration get
/// `UnsupportedPlatform`.
pub fn platform_spooler() -> Result<Box<dyn Spooler>> {
    #[cfg(unix)]
    {
        Ok(Box::new(crate::cups::CupsSpooler::new()))
    }
    #[cfg(windows)]
    {
        Ok(Box::new(crate::windows::WindowsSpooler::new()))
    }
    #[cfg(not(any(unix, windows)))]
    {
        Err(druckkiosk_core::error::DruckkioskError::UnsupportedPlatform)
    }
}
