// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the kiosk screen.
//
// Walk-up customers are not developers: every technical error is mapped to
// plain English with a clear suggestion.  Severity drives how the shell
// presents the message.

use crate::error::DruckkioskError;

/// Severity of an error from the customer's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A retry may simply work (printer busy, I/O hiccup).
    Transient,
    /// The customer must change something (file, options, selection).
    ActionRequired,
    /// Cannot be fixed at this kiosk (unsupported file, no printer driver).
    Permanent,
}

/// A plain-English error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Summary shown as a heading.
    pub message: String,
    /// What the customer should try, shown as body text.
    pub suggestion: String,
    /// Whether pressing the button again is worth a try.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `DruckkioskError` into something a customer can act on.
pub fn humanize_error(err: &DruckkioskError) -> HumanError {
    match err {
        DruckkioskError::InvalidImage(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or empty. Try saving it again as a JPEG or PNG and re-upload.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DruckkioskError::UnsupportedDocument(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!(
                "The kiosk prints PDF, TXT, PNG, and JPG files. Try saving your file as a PDF first. (File type: {detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        DruckkioskError::InvalidInput(detail) => HumanError {
            message: "Those print options don't work.".into(),
            suggestion: format!("Please check the number of copies and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DruckkioskError::InvalidPaymentRequest(detail) => HumanError {
            message: "The payment code couldn't be prepared.".into(),
            suggestion: format!(
                "Please ask the shop attendant to check the kiosk's payment settings. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        DruckkioskError::QrEncoding(_) => HumanError {
            message: "The payment QR code couldn't be drawn.".into(),
            suggestion: "Try again. If this keeps happening, pay the attendant directly.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DruckkioskError::NoPrinterAvailable => HumanError {
            message: "No printer was found.".into(),
            suggestion: "Make sure the printer is turned on and connected, then press Print again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DruckkioskError::PrintSubmission(detail) => HumanError {
            message: "The printer didn't accept the job.".into(),
            suggestion: format!(
                "Nothing was printed and nothing is owed. Try again, or ask the attendant. (Detail: {detail})"
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        DruckkioskError::UnsupportedPlatform => HumanError {
            message: "This kiosk can't print on its current computer.".into(),
            suggestion: "Printing needs a Windows or Linux host. Please tell the attendant.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DruckkioskError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The uploaded file couldn't be found.".into(),
                    suggestion: "It may have expired. Please upload the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the kiosk's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        DruckkioskError::Serialization(_) => HumanError {
            message: "The kiosk had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_printer_is_transient_and_retriable() {
        let human = humanize_error(&DruckkioskError::NoPrinterAvailable);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn unsupported_document_is_permanent() {
        let human = humanize_error(&DruckkioskError::UnsupportedDocument("docx".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn submission_failure_promises_nothing_queued() {
        let human = humanize_error(&DruckkioskError::PrintSubmission("lp exited 1".into()));
        assert!(human.suggestion.contains("Nothing was printed"));
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = DruckkioskError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
