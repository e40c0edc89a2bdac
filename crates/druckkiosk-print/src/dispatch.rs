// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print dispatch — drives a confirmed job through the spooler.
//
// State machine: Idle → ResolvingPrinter → Submitting → {Succeeded, Failed}.
// Failures are returned as values, never panicked, and never retried
// automatically; the customer decides whether to try again.

use serde::Serialize;
use tracing::{error, info, instrument};

use druckkiosk_core::error::Result;
use druckkiosk_core::types::PrintJob;

use crate::spooler::{Spooler, SubmitOptions, platform_spooler};

/// Where the dispatcher currently is in the submission flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchState {
    Idle,
    ResolvingPrinter,
    Submitting,
    Succeeded,
    Failed,
}

/// Why a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    NoPrinterAvailable,
    SubmissionFailed,
}

/// Proof of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub printer_name: String,
    pub copies_submitted: u32,
}

/// The terminal result of one dispatch attempt.
#[derive(Debug, Clone, Serialize)]
pub enum DispatchOutcome {
    Succeeded(DispatchReceipt),
    Failed { kind: FailureKind, message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Dispatcher bound to one spooler for the lifetime of the process.
pub struct Dispatcher {
    spooler: Box<dyn Spooler>,
    state: DispatchState,
}

impl Dispatcher {
    /// Bind the host platform's spooler.  Fails with `UnsupportedPlatform`
    /// on hosts without a print integration.
    pub fn for_host() -> Result<Self> {
        let spooler = platform_spooler()?;
        info!(backend = spooler.backend_name(), "dispatcher bound to host spooler");
        Ok(Self::with_spooler(spooler))
    }

    /// Bind an explicit spooler (tests use a mock here).
    pub fn with_spooler(spooler: Box<dyn Spooler>) -> Self {
        Self {
            spooler,
            state: DispatchState::Idle,
        }
    }

    /// Current position in the state machine.
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Submit the job to the host's default printer, blocking until the
    /// spooler accepts or rejects it.  Once accepted the OS owns queuing;
    /// no timeout is enforced and no cancellation is possible from here.
    #[instrument(skip(self, job), fields(job_id = %job.id, copies = job.options.copies))]
    pub fn dispatch(&mut self, job: &PrintJob) -> DispatchOutcome {
        self.state = DispatchState::ResolvingPrinter;

        let printer = match self.spooler.default_printer() {
            Ok(Some(name)) => name,
            Ok(None) => {
                error!("no printer available");
                return self.fail(
                    FailureKind::NoPrinterAvailable,
                    "no default or available printer on this host".into(),
                );
            }
            Err(err) => {
                error!(error = %err, "printer resolution failed");
                return self.fail(FailureKind::NoPrinterAvailable, err.to_string());
            }
        };

        self.state = DispatchState::Submitting;

        let options = SubmitOptions {
            copies: job.options.copies,
            sides: job.options.sides(),
            color: job.options.color,
            job_name: job.document_name.clone(),
        };

        match self.spooler.submit(&printer, &job.source_path, &options) {
            Ok(()) => {
                self.state = DispatchState::Succeeded;
                info!(printer = %printer, "dispatch succeeded");
                DispatchOutcome::Succeeded(DispatchReceipt {
                    printer_name: printer,
                    copies_submitted: job.options.copies,
                })
            }
            Err(err) => {
                error!(printer = %printer, error = %err, "submission failed");
                self.fail(FailureKind::SubmissionFailed, err.to_string())
            }
        }
    }

    fn fail(&mut self, kind: FailureKind, message: String) -> DispatchOutcome {
        self.state = DispatchState::Failed;
        DispatchOutcome::Failed { kind, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use druckkiosk_core::error::DruckkioskError;
    use druckkiosk_core::types::{DocumentType, PrintOptions};

    /// Mock spooler recording every submission.
    struct MockSpooler {
        printer: Option<String>,
        fail_submit: bool,
        submissions: Arc<Mutex<Vec<SubmitOptions>>>,
    }

    impl MockSpooler {
        fn with_printer(name: &str) -> Self {
            Self {
                printer: Some(name.to_string()),
                fail_submit: false,
                submissions: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn without_printer() -> Self {
            Self {
                printer: None,
                fail_submit: false,
                submissions: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl Spooler for MockSpooler {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        fn default_printer(&self) -> Result<Option<String>> {
            Ok(self.printer.clone())
        }

        fn submit(&self, _printer: &str, _file: &Path, options: &SubmitOptions) -> Result<()> {
            if self.fail_submit {
                return Err(DruckkioskError::PrintSubmission("printer on fire".into()));
            }
            self.submissions
                .lock()
                .expect("submissions lock")
                .push(options.clone());
            Ok(())
        }
    }

    fn test_job(copies: u32, color: bool, duplex: bool) -> PrintJob {
        PrintJob::new(
            "/tmp/druckkiosk-test.pdf".into(),
            DocumentType::Pdf,
            "menu.pdf".into(),
            "deadbeef".into(),
            PrintOptions {
                copies,
                color,
                duplex,
            },
        )
        .expect("job")
    }

    #[test]
    fn successful_dispatch_returns_receipt() {
        let mut dispatcher = Dispatcher::with_spooler(Box::new(MockSpooler::with_printer("HP")));
        let outcome = dispatcher.dispatch(&test_job(3, false, true));

        match outcome {
            DispatchOutcome::Succeeded(receipt) => {
                assert_eq!(receipt.printer_name, "HP");
                assert_eq!(receipt.copies_submitted, 3);
            }
            DispatchOutcome::Failed { .. } => panic!("expected success"),
        }
        assert_eq!(dispatcher.state(), DispatchState::Succeeded);
    }

    #[test]
    fn option_flags_reach_the_spooler() {
        let spooler = MockSpooler::with_printer("HP");
        let submissions = Arc::clone(&spooler.submissions);

        let mut dispatcher = Dispatcher::with_spooler(Box::new(spooler));
        let outcome = dispatcher.dispatch(&test_job(2, true, true));
        assert!(outcome.is_success());

        let recorded = submissions.lock().expect("submissions lock");
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].copies, 2);
        assert!(recorded[0].color);
        assert_eq!(recorded[0].sides, druckkiosk_core::types::DuplexMode::LongEdge);
        assert_eq!(recorded[0].job_name, "menu.pdf");
    }

    #[test]
    fn no_printer_fails_without_panicking() {
        let mut dispatcher =
            Dispatcher::with_spooler(Box::new(MockSpooler::without_printer()));
        let outcome = dispatcher.dispatch(&test_job(1, false, false));

        match outcome {
            DispatchOutcome::Failed { kind, .. } => {
                assert_eq!(kind, FailureKind::NoPrinterAvailable);
            }
            DispatchOutcome::Succeeded(_) => panic!("expected failure"),
        }
        assert_eq!(dispatcher.state(), DispatchState::Failed);
    }

    #[test]
    fn submission_error_is_surfaced_not_retried() {
        let spooler = MockSpooler {
            printer: Some("HP".into()),
            fail_submit: true,
            submissions: Arc::new(Mutex::new(Vec::new())),
        };
        let mut dispatcher = Dispatcher::with_spooler(Box::new(spooler));
        let outcome = dispatcher.dispatch(&test_job(1, false, false));

        match outcome {
            DispatchOutcome::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::SubmissionFailed);
                assert!(message.contains("printer on fire"));
            }
            DispatchOutcome::Succeeded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn dispatcher_starts_idle() {
        let dispatcher = Dispatcher::with_spooler(Box::new(MockSpooler::without_printer()));
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn duplex_flag_translates_to_sides_keyword() {
        let job = test_job(1, false, true);
        assert_eq!(job.options.sides().sides_keyword(), "two-sided-long-edge");
        let job = test_job(1, false, false);
        assert_eq!(job.options.sides().sides_keyword(), "one-sided");
    }
}
