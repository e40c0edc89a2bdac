// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows spooler backend.
//
// Resolves the default printer through a `Win32_Printer` CIM query and
// submits via the shell `Print` verb, which hands the file to the
// application registered for its type.  The verb carries no copy count, so
// multi-copy jobs are submitted once per copy.

#![cfg(windows)]

use std::os::windows::process::CommandExt;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info, instrument, warn};

use druckkiosk_core::error::{DruckkioskError, Result};

use crate::spooler::{Spooler, SubmitOptions};

const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Create a PowerShell command that hides the console window.
fn powershell(script: &str) -> Command {
    let mut cmd = Command::new("powershell");
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd.args(["-NoProfile", "-Command", script]);
    cmd
}

/// Spooler backed by the Windows shell print integration.
pub struct WindowsSpooler;

impl WindowsSpooler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsSpooler {
    fn default() -> Self {
        Self::new()
    }
}

impl Spooler for WindowsSpooler {
    fn backend_name(&self) -> &'static str {
        "Windows spooler"
    }

    #[instrument(skip(self))]
    fn default_printer(&self) -> Result<Option<String>> {
        let output = match powershell(
            r#"(Get-CimInstance Win32_Printer -Filter "Default=TRUE").Name"#,
        )
        .output()
        {
            Ok(out) => out,
            Err(err) => {
                warn!(error = %err, "powershell not available");
                return Ok(None);
            }
        };

        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || name.is_empty() {
            return Ok(None);
        }
        debug!(printer = %name, "default printer resolved");
        Ok(Some(name))
    }

    #[instrument(skip(self, file_path), fields(path = %file_path.display()))]
    fn submit(&self, printer: &str, file_path: &Path, options: &SubmitOptions) -> Result<()> {
        if options.color || options.sides != druckkiosk_core::types::DuplexMode::Simplex {
            // The shell print verb has no option vocabulary; these settings
            // follow the printer's configured preferences.
            warn!(
                color = options.color,
                sides = options.sides.sides_keyword(),
                "colour/duplex selections ride on printer defaults via the shell print verb"
            );
        }

        let path = file_path.to_string_lossy().replace('\'', "''");
        let script = format!("Start-Process -FilePath '{path}' -Verb Print -Wait");

        // One invocation per copy: the verb carries no copy count.
        for copy in 1..=options.copies {
            let output = powershell(&script)
                .output()
                .map_err(|err| DruckkioskError::PrintSubmission(format!("powershell: {err}")))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(DruckkioskError::PrintSubmission(format!(
                    "print verb failed on copy {copy} of {}: {}",
                    options.copies,
                    stderr.trim()
                )));
            }
        }

        info!(printer, copies = options.copies, "job handed to Windows spooler");
        Ok(())
    }
}
