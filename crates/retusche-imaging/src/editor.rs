// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image editor — decode, chain transforms, apply masks, and encode PNG.
// Wraps the free functions in `transform` and `mask` around one working
// RGBA image.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use retusche_core::error::RetuscheError;
use tracing::{debug, info, instrument};

use crate::mask::{self, MaskSource};
use crate::transform;

/// Editing pipeline operating on a single in-memory RGBA image.
///
/// Transforms consume `self` and return a new `ImageEditor`, so calls chain:
///
/// ```ignore
/// let png = ImageEditor::open("photo.jpg")?
///     .remove_background(60.0)
///     .round_border()
///     .to_png_bytes()?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageEditor {
    /// The current working image, always RGBA8.
    image: RgbaImage,
}

impl ImageEditor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path. Any decodable format is accepted and
    /// converted to RGBA.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RetuscheError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            RetuscheError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self::from_dynamic(img))
    }

    /// Create an editor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, RetuscheError> {
        let img = image::load_from_memory(data).map_err(|err| {
            RetuscheError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self::from_dynamic(img))
    }

    /// Wrap an already-decoded image, converting it to RGBA.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: image.into_rgba8(),
        }
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    pub fn round_border(self) -> Self {
        Self::from_rgba(transform::round_border(&self.image))
    }

    pub fn grayscale(self) -> Self {
        Self::from_rgba(transform::grayscale(&self.image))
    }

    pub fn blur(self, sigma: f32) -> Self {
        Self::from_rgba(transform::blur(&self.image, sigma))
    }

    pub fn brighten(self, factor: f32) -> Self {
        Self::from_rgba(transform::brighten(&self.image, factor))
    }

    pub fn remove_background(self, tolerance: f64) -> Self {
        Self::from_rgba(transform::remove_background(&self.image, tolerance))
    }

    /// Zero alpha outside the mask. On error the editor is dropped; keep a
    /// clone if the previous image is still needed.
    pub fn apply_mask(self, source: Option<&MaskSource>) -> Result<Self, RetuscheError> {
        mask::apply_mask(&self.image, source).map(Self::from_rgba)
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes (lossless, alpha preserved).
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, RetuscheError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| RetuscheError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to `path` as PNG, whatever the extension says.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RetuscheError> {
        self.image
            .save_with_format(path.as_ref(), ImageFormat::Png)
            .map_err(|err| {
                RetuscheError::ImageError(format!(
                    "failed to save image to {}: {}",
                    path.as_ref().display(),
                    err
                ))
            })?;
        info!(width = self.width(), height = self.height(), "Image saved");
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------
