// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CUPS spooler backend for Unix hosts.
//
// Talks to the local print service through the standard command-line
// clients: `lpstat` for printer resolution and `lp` for submission.  The
// copy count, sides, and colour mode travel as one job via `-n` and `-o`
// options, so a failed submission queues nothing.

#![cfg(unix)]

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, instrument, warn};

use druckkiosk_core::error::{DruckkioskError, Result};

use crate::spooler::{Spooler, SubmitOptions};

/// Spooler backed by the CUPS command-line clients.
pub struct CupsSpooler;

impl CupsSpooler {
    pub fn new() -> Self {
        Self
    }

    /// Parse `lpstat -d` output ("system default destination: Office_HP").
    fn parse_default(output: &str) -> Option<String> {
        let line = output.lines().next()?;
        let name = line.rsplit_once(':')?.1.trim();
        if name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }

    /// First destination listed by `lpstat -e`, if any.
    fn first_destination() -> Option<String> {
        let output = Command::new("lpstat").arg("-e").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }
}

impl Default for CupsSpooler {
    fn default() -> Self {
        Self::new()
    }
}

impl Spooler for CupsSpooler {
    fn backend_name(&self) -> &'static str {
        "CUPS"
    }

    #[instrument(skip(self))]
    fn default_printer(&self) -> Result<Option<String>> {
        // `lpstat -d` prints "no system default destination" when unset;
        // fall back to the first destination the scheduler knows about.
        let output = match Command::new("lpstat").arg("-d").output() {
            Ok(out) => out,
            Err(err) => {
                warn!(error = %err, "lpstat not available");
                return Ok(None);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(name) = Self::parse_default(&stdout) {
            debug!(printer = %name, "default printer resolved");
            return Ok(Some(name));
        }

        let fallback = Self::first_destination();
        if let Some(ref name) = fallback {
            debug!(printer = %name, "no default set, using first destination");
        }
        Ok(fallback)
    }

    #[instrument(skip(self, file_path), fields(path = %file_path.display()))]
    fn submit(&self, printer: &str, file_path: &Path, options: &SubmitOptions) -> Result<()> {
        let color_mode = if options.color { "color" } else { "monochrome" };

        let output = Command::new("lp")
            .arg("-d")
            .arg(printer)
            .arg("-n")
            .arg(options.copies.to_string())
            .arg("-t")
            .arg(&options.job_name)
            .arg("-o")
            .arg(format!("sides={}", options.sides.sides_keyword()))
            .arg("-o")
            .arg(format!("print-color-mode={color_mode}"))
            .arg(file_path)
            .output()
            .map_err(|err| DruckkioskError::PrintSubmission(format!("lp: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DruckkioskError::PrintSubmission(format!(
                "lp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!(
            printer,
            copies = options.copies,
            sides = options.sides.sides_keyword(),
            color_mode,
            "job accepted by CUPS"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_destination_line() {
        let out = "system default destination: Office_HP\n";
        assert_eq!(
            CupsSpooler::parse_default(out),
            Some("Office_HP".to_string())
        );
    }

    #[test]
    fn no_default_yields_none() {
        assert_eq!(CupsSpooler::parse_default("no system default destination\n"), None);
        assert_eq!(CupsSpooler::parse_default(""), None);
    }

    #[test]
    fn trailing_whitespace_trimmed() {
        let out = "system default destination: PDF \n";
        assert_eq!(CupsSpooler::parse_default(out), Some("PDF".to_string()));
    }
}
