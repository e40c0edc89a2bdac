// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP routes for the kiosk shell.  Thin glue: handlers parse the request,
// call into `KioskServices`, and translate errors into plain-language JSON.

use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;

use druckkiosk_core::error::DruckkioskError;
use druckkiosk_core::human_errors::humanize_error;
use druckkiosk_core::types::PrintOptions;

use crate::services::KioskServices;

/// Build the kiosk router.
pub fn router(services: KioskServices) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/edit", post(edit))
        .route("/preview", get(preview))
        .route("/print", post(print))
        .layer(CorsLayer::permissive())
        .with_state(services)
}

/// JSON error body shown on the kiosk screen.
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
    suggestion: String,
    retriable: bool,
}

impl From<DruckkioskError> for ApiError {
    fn from(err: DruckkioskError) -> Self {
        let human = humanize_error(&err);
        Self {
            error: human.message,
            suggestion: human.suggestion,
            retriable: human.retriable,
        }
    }
}

fn error_response(err: DruckkioskError) -> Response {
    let status = match &err {
        DruckkioskError::InvalidImage(_)
        | DruckkioskError::InvalidInput(_)
        | DruckkioskError::UnsupportedDocument(_)
        | DruckkioskError::InvalidPaymentRequest(_) => StatusCode::BAD_REQUEST,
        DruckkioskError::UnsupportedPlatform => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(error = %err, status = %status, "request failed");
    (status, Json(ApiError::from(err))).into_response()
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn upload(State(services): State<KioskServices>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return error_response(DruckkioskError::InvalidInput(format!(
                    "malformed upload: {err}"
                )));
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            return error_response(DruckkioskError::InvalidInput(
                "upload is missing a filename".into(),
            ));
        };
        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(err) => {
                return error_response(DruckkioskError::InvalidInput(format!(
                    "upload read failed: {err}"
                )));
            }
        };

        return match services.receive_upload(&filename, &bytes) {
            Ok(summary) => Json(summary).into_response(),
            Err(err) => error_response(err),
        };
    }

    error_response(DruckkioskError::InvalidInput(
        "no 'file' field in upload".into(),
    ))
}

/// Optional crop rectangle in source-image pixels.
#[derive(Debug, Deserialize)]
struct EditRequest {
    crop: Option<CropRect>,
}

#[derive(Debug, Deserialize)]
struct CropRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

async fn edit(
    State(services): State<KioskServices>,
    Json(request): Json<EditRequest>,
) -> Response {
    let crop = request
        .crop
        .map(|r| (r.x, r.y, r.width, r.height));

    // Normalization resamples megapixel images; keep it off the async pool.
    let result =
        tokio::task::spawn_blocking(move || services.edit_page(crop)).await;

    match result {
        Ok(Ok(png)) => png_response(png),
        Ok(Err(err)) => error_response(err),
        Err(join_err) => error_response(DruckkioskError::InvalidInput(format!(
            "edit task failed: {join_err}"
        ))),
    }
}

async fn preview(State(services): State<KioskServices>) -> Response {
    match services.preview_png() {
        Some(png) => png_response(png),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct PrintRequest {
    copies: u32,
    #[serde(default)]
    color: bool,
    #[serde(default)]
    duplex: bool,
}

async fn print(
    State(services): State<KioskServices>,
    Json(request): Json<PrintRequest>,
) -> Response {
    let options = PrintOptions {
        copies: request.copies,
        color: request.color,
        duplex: request.duplex,
    };

    // Spooler submission blocks on the OS print subsystem.
    let result = tokio::task::spawn_blocking(move || services.print(options)).await;

    match result {
        Ok(Ok(receipt)) => Json(receipt).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(join_err) => error_response(DruckkioskError::PrintSubmission(format!(
            "print task failed: {join_err}"
        ))),
    }
}

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}

/// Single-page kiosk form.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Druckkiosk</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 640px; margin: 2em auto; }
    fieldset { margin-bottom: 1em; }
    img { max-width: 100%; }
    #result { white-space: pre-wrap; }
  </style>
</head>
<body>
  <h1>Print &amp; Pay</h1>

  <fieldset>
    <legend>1. Upload (PDF, TXT, PNG, JPG)</legend>
    <input type="file" id="file">
    <button onclick="upload()">Upload</button>
  </fieldset>

  <fieldset>
    <legend>2. Fit image to page (images only)</legend>
    <button onclick="edit()">Fit to page</button>
    <div><img id="preview" alt=""></div>
  </fieldset>

  <fieldset>
    <legend>3. Print options</legend>
    <label>Copies <input type="number" id="copies" min="1" max="50" value="1"></label>
    <label><input type="checkbox" id="duplex"> Both sides</label>
    <label><input type="checkbox" id="color"> Colour</label>
    <button onclick="printJob()">Print</button>
  </fieldset>

  <div id="result"></div>
  <img id="qr" alt="">

  <script>
    async function upload() {
      const input = document.getElementById('file');
      if (!input.files.length) return;
      const form = new FormData();
      form.append('file', input.files[0]);
      const res = await fetch('/upload', { method: 'POST', body: form });
      show(await res.json());
    }

    async function edit() {
      const res = await fetch('/edit', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ crop: null })
      });
      if (!res.ok) { show(await res.json()); return; }
      const blob = await res.blob();
      document.getElementById('preview').src = URL.createObjectURL(blob);
    }

    async function printJob() {
      const res = await fetch('/print', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          copies: Number(document.getElementById('copies').value),
          duplex: document.getElementById('duplex').checked,
          color: document.getElementById('color').checked
        })
      });
      const body = await res.json();
      show(body);
      if (body.qr_data_url) document.getElementById('qr').src = body.qr_data_url;
    }

    function show(obj) {
      document.getElementById('result').textContent = JSON.stringify(obj, null, 2);
    }
  </script>
</body>
</html>
"#;
