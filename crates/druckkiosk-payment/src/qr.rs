// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR code rendering — encodes a payment link as a scannable PNG.
//
// Error-correction level L tolerates minor physical damage while keeping
// the module grid small enough for cheap kiosk screens and receipt paper.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::{debug, instrument};

use druckkiosk_core::error::{DruckkioskError, Result};

use crate::upi::PaymentRequest;

/// Pixel size of one QR module.
const MODULE_PX: u32 = 10;

/// Render a payment request as a PNG QR code.
pub fn payment_qr_png(request: &PaymentRequest) -> Result<Vec<u8>> {
    qr_png(&request.to_uri())
}

/// Encode arbitrary data as a QR code PNG.
///
/// Dark modules on a white background, 10×10 px per module, with the
/// standard 4-module quiet zone.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn qr_png(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|err| DruckkioskError::QrEncoding(err.to_string()))?;

    let rendered = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PX, MODULE_PX)
        .build();

    debug!(
        modules = code.width(),
        px = rendered.width(),
        "QR code rendered"
    );

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageLuma8(rendered)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| DruckkioskError::QrEncoding(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use druckkiosk_core::types::Money;

    fn sample_request() -> PaymentRequest {
        PaymentRequest::new("shop@okbank", "Corner Print Shop", Money::from_minor(900), "INR")
            .expect("request")
    }

    #[test]
    fn output_is_png() {
        let bytes = payment_qr_png(&sample_request()).expect("qr");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn output_is_deterministic() {
        let a = payment_qr_png(&sample_request()).expect("qr");
        let b = payment_qr_png(&sample_request()).expect("qr");
        assert_eq!(a, b);
    }

    #[test]
    fn different_amounts_give_different_codes() {
        let nine = payment_qr_png(&sample_request()).expect("qr");
        let ten = payment_qr_png(
            &PaymentRequest::new("shop@okbank", "Corner Print Shop", Money::from_major(10), "INR")
                .expect("request"),
        )
        .expect("qr");
        assert_ne!(nine, ten);
    }

    #[test]
    fn oversized_payload_fails_cleanly() {
        // QR version 40 at level L caps out below 3kB of binary data.
        let huge = "x".repeat(4000);
        assert!(matches!(
            qr_png(&huge),
            Err(DruckkioskError::QrEncoding(_))
        ));
    }
}
