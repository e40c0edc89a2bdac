// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page normalizer — turns an arbitrary raster image into a fixed-resolution
// page image for a standard paper size.  Crop-to-fill anchored at centre,
// Lanczos3 resampling, no letterboxing.

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};

use druckkiosk_core::error::{DruckkioskError, Result};

/// Staging area for a customer's image on its way to becoming a page.
///
/// Operations are non-destructive: each method consumes `self` and returns
/// a new `PagePreparer`, enabling method chaining.
///
/// ```ignore
/// let page = PagePreparer::from_bytes(&upload)?
///     .crop(120, 80, 1600, 2200)?
///     .normalize(PaperSize::A4.pixel_dimensions(300))?;
/// ```
pub struct PagePreparer {
    /// The current working image.
    image: DynamicImage,
}

impl PagePreparer {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            DruckkioskError::InvalidImage(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Self::from_dynamic(img)
    }

    /// Create a preparer from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            DruckkioskError::InvalidImage(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Self::from_dynamic(img)
    }

    /// Wrap an already-decoded `DynamicImage`.
    ///
    /// Zero-area images are rejected here so that every `PagePreparer` holds
    /// a raster the normalizer can work with.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DruckkioskError::InvalidImage(format!(
                "image has zero area ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Crop a rectangular region before normalization.
    ///
    /// `x` and `y` are the top-left corner; `width` and `height` define the
    /// crop rectangle.  The rectangle is clamped to image bounds; an empty
    /// rectangle is rejected.
    #[instrument(skip(self))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DruckkioskError::InvalidInput(format!(
                "crop rectangle has zero area ({}x{})",
                width, height
            )));
        }

        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w - 1);
        let safe_y = y.min(img_h - 1);
        let safe_w = width.min(img_w - safe_x);
        let safe_h = height.min(img_h - safe_y);

        info!(safe_x, safe_y, safe_w, safe_h, "Cropping image");

        let cropped = self.image.crop_imm(safe_x, safe_y, safe_w, safe_h);
        Self::from_dynamic(cropped)
    }

    /// Normalize to a fixed page raster.
    ///
    /// The source is cropped to the target aspect ratio anchored at centre,
    /// then scaled to exactly `target_px` with Lanczos3.  The output always
    /// fully fills the target dimensions — no letterboxing.
    #[instrument(skip(self), fields(target_w = target_px.0, target_h = target_px.1))]
    pub fn normalize(self, target_px: (u32, u32)) -> Result<PageImage> {
        let (target_w, target_h) = target_px;
        if target_w == 0 || target_h == 0 {
            return Err(DruckkioskError::InvalidInput(format!(
                "target page size has zero area ({}x{})",
                target_w, target_h
            )));
        }

        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            target_w,
            target_h,
            "Normalizing image to page"
        );

        let filled =
            self.image
                .resize_to_fill(target_w, target_h, image::imageops::FilterType::Lanczos3);

        debug_assert_eq!((filled.width(), filled.height()), (target_w, target_h));
        debug!("Normalization complete");
        Ok(PageImage { image: filled })
    }
}

/// A normalized page raster.
///
/// Invariant: the dimensions always equal the target pixel size the
/// normalizer was given.
pub struct PageImage {
    image: DynamicImage,
}

impl PageImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Encode the page as PNG bytes for preview or printing.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| {
                DruckkioskError::InvalidImage(format!("PNG encoding failed: {}", err))
            })?;
        Ok(buffer)
    }

    /// Write the page to a file.  The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            DruckkioskError::InvalidImage(format!(
                "failed to save page to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ))
    }

    #[test]
    fn normalize_wide_input_hits_exact_target() {
        let page = PagePreparer::from_dynamic(solid_image(1200, 300))
            .expect("preparer")
            .normalize((248, 351))
            .expect("normalize");
        assert_eq!((page.width(), page.height()), (248, 351));
    }

    #[test]
    fn normalize_tall_input_hits_exact_target() {
        let page = PagePreparer::from_dynamic(solid_image(200, 1800))
            .expect("preparer")
            .normalize((248, 351))
            .expect("normalize");
        assert_eq!((page.width(), page.height()), (248, 351));
    }

    #[test]
    fn normalize_upscales_small_input() {
        let page = PagePreparer::from_dynamic(solid_image(10, 10))
            .expect("preparer")
            .normalize((100, 140))
            .expect("normalize");
        assert_eq!((page.width(), page.height()), (100, 140));
    }

    #[test]
    fn zero_area_image_rejected() {
        let result = PagePreparer::from_dynamic(DynamicImage::new_rgb8(0, 10));
        assert!(matches!(result, Err(DruckkioskError::InvalidImage(_))));
    }

    #[test]
    fn undecodable_bytes_rejected() {
        let result = PagePreparer::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(DruckkioskError::InvalidImage(_))));
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let prepared = PagePreparer::from_dynamic(solid_image(100, 100))
            .expect("preparer")
            .crop(90, 90, 50, 50)
            .expect("crop");
        assert_eq!((prepared.width(), prepared.height()), (10, 10));
    }

    #[test]
    fn empty_crop_rectangle_rejected() {
        let result = PagePreparer::from_dynamic(solid_image(100, 100))
            .expect("preparer")
            .crop(10, 10, 0, 5);
        assert!(matches!(result, Err(DruckkioskError::InvalidInput(_))));
    }

    #[test]
    fn crop_then_normalize_keeps_invariant() {
        let page = PagePreparer::from_dynamic(solid_image(640, 480))
            .expect("preparer")
            .crop(100, 50, 400, 300)
            .expect("crop")
            .normalize((248, 351))
            .expect("normalize");
        assert_eq!((page.width(), page.height()), (248, 351));
    }

    #[test]
    fn png_bytes_carry_png_signature() {
        let page = PagePreparer::from_dynamic(solid_image(30, 40))
            .expect("preparer")
            .normalize((30, 40))
            .expect("normalize");
        let bytes = page.to_png_bytes().expect("encode");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
