// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — holds the validated config, the one dispatcher
// bound at process start, and the current customer session.
//
// The kiosk serves one walk-up interaction at a time: the session slot is a
// `Mutex<Option<Session>>`, and each upload replaces whatever was there
// (dropping the previous temp file).

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};

use druckkiosk_core::KioskConfig;
use druckkiosk_core::error::{DruckkioskError, Result};
use druckkiosk_core::human_errors::humanize_error;
use druckkiosk_core::types::PrintOptions;
use druckkiosk_document::{PagePreparer, UploadedDocument};
use druckkiosk_payment::{PaymentRequest, payment_qr_png, quote};
use druckkiosk_print::{DispatchOutcome, Dispatcher};

use super::data_dir;

/// One customer's in-flight interaction.
struct Session {
    document: UploadedDocument,
    /// Normalized page PNG, present once the customer has edited an image.
    preview_png: Option<Vec<u8>>,
}

/// Shared kiosk services, cheaply cloneable for axum handlers.
#[derive(Clone)]
pub struct KioskServices {
    config: Arc<KioskConfig>,
    /// `None` when the host OS has no print integration — the kiosk still
    /// quotes and shows payment codes, it just cannot print.
    dispatcher: Arc<Mutex<Option<Dispatcher>>>,
    session: Arc<Mutex<Option<Session>>>,
}

/// Summary returned after a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadSummary {
    pub name: String,
    pub mime: &'static str,
    pub size: u64,
    pub hash: String,
    /// Whether the file is an image the kiosk can crop and normalize.
    pub editable: bool,
}

/// Everything the customer sees after pressing Print.
#[derive(Debug, Serialize)]
pub struct PrintReceipt {
    pub total: String,
    pub upi_link: String,
    /// Payment QR as a `data:image/png;base64,...` URL.
    pub qr_data_url: String,
    pub printed: bool,
    pub printer_name: Option<String>,
    pub copies_submitted: Option<u32>,
    /// Plain-language failure message, when not printed.
    pub error: Option<String>,
    pub suggestion: Option<String>,
}

impl KioskServices {
    /// Initialise services.  Call once at startup.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising kiosk services");

        let config = match load_config(&dir) {
            Some(config) => config,
            None => {
                // First run: seed a config file the attendant can edit.
                let config = KioskConfig::default();
                if let Err(err) = persist_config(&dir, &config) {
                    warn!(error = %err, "could not write default config");
                }
                config
            }
        };
        config.validate()?;

        let dispatcher = match Dispatcher::for_host() {
            Ok(d) => Some(d),
            Err(DruckkioskError::UnsupportedPlatform) => {
                warn!("no print integration on this host — running quote-only");
                None
            }
            Err(e) => return Err(e),
        };

        info!("kiosk services initialised");

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            session: Arc::new(Mutex::new(None)),
        })
    }

    /// Build services from explicit parts (tests use this with a mock-backed
    /// dispatcher or none at all).
    pub fn with_parts(config: KioskConfig, dispatcher: Option<Dispatcher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            session: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &KioskConfig {
        &self.config
    }

    // -- Upload --------------------------------------------------------------

    /// Accept an upload and make it the current session, replacing (and
    /// thereby cleaning up) any previous one.
    pub fn receive_upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadSummary> {
        let document = UploadedDocument::receive(filename, bytes)?;
        let summary = UploadSummary {
            name: document.name().to_string(),
            mime: document.document_type().mime_type(),
            size: document.len(),
            hash: document.hash().to_string(),
            editable: document.document_type().is_raster(),
        };

        let mut slot = self.session.lock().expect("session lock poisoned");
        if slot.is_some() {
            info!("replacing previous session");
        }
        *slot = Some(Session {
            document,
            preview_png: None,
        });
        Ok(summary)
    }

    // -- Edit / normalize -----------------------------------------------------

    /// Crop (optionally) and normalize the uploaded image to the configured
    /// page size.  The normalized PNG replaces the session payload, so the
    /// printer receives exactly what the preview shows.
    pub fn edit_page(&self, crop: Option<(u32, u32, u32, u32)>) -> Result<Vec<u8>> {
        let mut slot = self.session.lock().expect("session lock poisoned");
        let session = slot.as_mut().ok_or_else(|| {
            DruckkioskError::InvalidInput("no document uploaded yet".into())
        })?;

        if !session.document.document_type().is_raster() {
            return Err(DruckkioskError::InvalidInput(format!(
                "only images can be edited, not {}",
                session.document.document_type().mime_type()
            )));
        }

        let bytes = session.document.read_bytes()?;
        let mut preparer = PagePreparer::from_bytes(&bytes)?;
        if let Some((x, y, w, h)) = crop {
            preparer = preparer.crop(x, y, w, h)?;
        }

        let target = self.config.paper_size.pixel_dimensions(self.config.render_dpi);
        let page = preparer.normalize(target)?;
        let png = page.to_png_bytes()?;

        session
            .document
            .replace_payload(&png, druckkiosk_core::types::DocumentType::Png)?;
        session.preview_png = Some(png.clone());
        Ok(png)
    }

    /// The current normalized page PNG, if the customer has edited one.
    pub fn preview_png(&self) -> Option<Vec<u8>> {
        let slot = self.session.lock().expect("session lock poisoned");
        slot.as_ref().and_then(|s| s.preview_png.clone())
    }

    // -- Print ----------------------------------------------------------------

    /// Quote, build the payment QR, and dispatch the job.
    ///
    /// Blocking (the spooler call is synchronous); axum handlers run it via
    /// `spawn_blocking`.  The session — and with it the temp file — is
    /// released once dispatch has completed or failed.
    pub fn print(&self, options: PrintOptions) -> Result<PrintReceipt> {
        options.validate()?;

        let pricing = quote(
            &self.config.pricing,
            options.copies,
            options.color,
            options.duplex,
        )?;
        let request = PaymentRequest::for_quote(&self.config.payee, &pricing)?;
        let upi_link = request.to_uri();
        let qr_png = payment_qr_png(&request)?;
        let qr_data_url = format!(
            "data:image/png;base64,{}",
            {
                use base64::Engine as _;
                base64::engine::general_purpose::STANDARD.encode(&qr_png)
            }
        );

        // Take the session out of the slot: from here on the temp file is
        // released on every exit path once dispatch has run.
        let session = {
            let mut slot = self.session.lock().expect("session lock poisoned");
            slot.take().ok_or_else(|| {
                DruckkioskError::InvalidInput("no document uploaded yet".into())
            })?
        };

        let job = session.document.print_job(options)?;
        info!(job_id = %job.id, total = %pricing.total, "dispatching print job");

        let outcome = {
            let mut guard = self.dispatcher.lock().expect("dispatcher lock poisoned");
            match guard.as_mut() {
                Some(dispatcher) => dispatcher.dispatch(&job),
                None => {
                    let human = humanize_error(&DruckkioskError::UnsupportedPlatform);
                    return Ok(PrintReceipt {
                        total: pricing.total.to_string(),
                        upi_link,
                        qr_data_url,
                        printed: false,
                        printer_name: None,
                        copies_submitted: None,
                        error: Some(human.message),
                        suggestion: Some(human.suggestion),
                    });
                }
            }
        };
        // `session` drops here — temp file deleted whether or not dispatch
        // succeeded.

        let receipt = match outcome {
            DispatchOutcome::Succeeded(r) => PrintReceipt {
                total: pricing.total.to_string(),
                upi_link,
                qr_data_url,
                printed: true,
                printer_name: Some(r.printer_name),
                copies_submitted: Some(r.copies_submitted),
                error: None,
                suggestion: None,
            },
            DispatchOutcome::Failed { kind, message } => {
                let err = match kind {
                    druckkiosk_print::FailureKind::NoPrinterAvailable => {
                        DruckkioskError::NoPrinterAvailable
                    }
                    druckkiosk_print::FailureKind::SubmissionFailed => {
                        DruckkioskError::PrintSubmission(message)
                    }
                };
                let human = humanize_error(&err);
                PrintReceipt {
                    total: pricing.total.to_string(),
                    upi_link,
                    qr_data_url,
                    printed: false,
                    printer_name: None,
                    copies_submitted: None,
                    error: Some(human.message),
                    suggestion: Some(human.suggestion),
                }
            }
        };
        Ok(receipt)
    }
}

// -- Config file persistence --------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &std::path::Path) -> Option<KioskConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

/// Persist the config (used by an attendant editing the tariff on disk —
/// the kiosk itself never mutates it mid-run).
pub fn persist_config(data_dir: &std::path::Path, config: &KioskConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_only_services() -> KioskServices {
        // Small custom paper keeps normalization cheap in tests.
        let config = KioskConfig {
            paper_size: druckkiosk_core::types::PaperSize::Custom {
                width_mm: 21,
                height_mm: 29,
            },
            render_dpi: 30,
            ..KioskConfig::default()
        };
        KioskServices::with_parts(config, None).expect("services")
    }

    fn tiny_png() -> Vec<u8> {
        let dynamic = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([200, 10, 10]),
        ));
        let page = druckkiosk_document::PagePreparer::from_dynamic(dynamic)
            .expect("preparer")
            .normalize((8, 8))
            .expect("normalize");
        page.to_png_bytes().expect("encode")
    }

    #[test]
    fn upload_then_print_without_printer_reports_unsupported() {
        let services = quote_only_services();
        services
            .receive_upload("note.txt", b"hello")
            .expect("upload");

        let receipt = services
            .print(PrintOptions {
                copies: 3,
                color: false,
                duplex: true,
            })
            .expect("print flow");

        assert!(!receipt.printed);
        assert_eq!(receipt.total, "9.00");
        assert!(receipt.upi_link.contains("am=9.00"));
        assert!(receipt.qr_data_url.starts_with("data:image/png;base64,"));
        assert!(receipt.error.is_some());
    }

    #[test]
    fn print_without_upload_is_invalid_input() {
        let services = quote_only_services();
        let result = services.print(PrintOptions::default());
        assert!(matches!(result, Err(DruckkioskError::InvalidInput(_))));
    }

    #[test]
    fn editing_a_text_file_is_rejected() {
        let services = quote_only_services();
        services
            .receive_upload("note.txt", b"hello")
            .expect("upload");
        assert!(matches!(
            services.edit_page(None),
            Err(DruckkioskError::InvalidInput(_))
        ));
    }

    #[test]
    fn edit_normalizes_to_configured_page() {
        let services = quote_only_services();
        services
            .receive_upload("photo.png", &tiny_png())
            .expect("upload");

        let png = services.edit_page(None).expect("edit");
        let page = druckkiosk_document::PagePreparer::from_bytes(&png).expect("decode");
        let target = services
            .config()
            .paper_size
            .pixel_dimensions(services.config().render_dpi);
        assert_eq!((page.width(), page.height()), target);
        assert!(services.preview_png().is_some());
    }

    #[test]
    fn invalid_options_keep_the_session_alive() {
        let services = quote_only_services();
        services
            .receive_upload("note.txt", b"hello")
            .expect("upload");

        let result = services.print(PrintOptions {
            copies: 0,
            color: false,
            duplex: false,
        });
        assert!(result.is_err());

        // Session not consumed: a corrected print attempt still works.
        let receipt = services.print(PrintOptions::default()).expect("print");
        assert_eq!(receipt.total, "2.00");
    }
}
