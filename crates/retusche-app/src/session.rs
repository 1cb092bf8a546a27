// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit session — the image being worked on, plus action dispatch shared by
// the desktop and command-line front-ends.

use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use retusche_core::error::Result;
use retusche_core::{EditAction, EditorConfig};
use retusche_imaging::{ImageEditor, MaskSource, mask, transform};
use tracing::{info, instrument};

/// One opened image and its edits so far.
///
/// Sessions are values: [`EditSession::apply`] returns a new session and
/// leaves `self` untouched, so a failed action simply keeps the old one.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Display name (usually the file name).
    name: String,
    /// Image as loaded, for "reset".
    original: Arc<RgbaImage>,
    /// Current result.
    image: RgbaImage,
}

impl EditSession {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            original: Arc::new(image.clone()),
            image,
        }
    }

    /// Open a file; the display name is its file name.
    pub fn open(path: &Path) -> Result<Self> {
        let editor = ImageEditor::open(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".into());
        Ok(Self::new(name, editor.into_rgba()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Whether any action changed the image since it was opened.
    pub fn is_modified(&self) -> bool {
        self.image != *self.original
    }

    /// Back to the image as loaded.
    pub fn reset(&self) -> Self {
        Self {
            name: self.name.clone(),
            original: Arc::clone(&self.original),
            image: (*self.original).clone(),
        }
    }

    /// Run one action on the current image.
    ///
    /// `mask_source` is only consulted by [`EditAction::ApplyMask`]; `None`
    /// there means "nothing drawn" and leaves the image unchanged.
    #[instrument(skip(self, mask_source, config), fields(name = %self.name))]
    pub fn apply(
        &self,
        action: EditAction,
        mask_source: Option<&MaskSource>,
        config: &EditorConfig,
    ) -> Result<Self> {
        config.validate()?;
        info!("Applying action");

        let image = match action {
            EditAction::RoundBorder => transform::round_border(&self.image),
            EditAction::Grayscale => transform::grayscale(&self.image),
            EditAction::Blur => transform::blur(&self.image, config.blur_sigma),
            EditAction::Brighten => transform::brighten(&self.image, config.brightness_factor),
            EditAction::RemoveBackground => {
                transform::remove_background(&self.image, config.tolerance)
            }
            EditAction::ApplyMask => mask::apply_mask(&self.image, mask_source)?,
        };

        Ok(Self {
            name: self.name.clone(),
            original: Arc::clone(&self.original),
            image,
        })
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        ImageEditor::from_rgba(self.image.clone()).to_png_bytes()
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        ImageEditor::from_rgba(self.image.clone()).save_png(path)
    }

    /// `data:` URL of the current image, for an `<img>` preview.
    pub fn png_data_url(&self) -> Result<String> {
        let bytes = self.to_png_bytes()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use retusche_core::{Point, RetuscheError};

    fn red_session() -> EditSession {
        EditSession::new("red.png", RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn remove_background_on_red_square_clears_everything() {
        let config = EditorConfig {
            tolerance: 10.0,
            ..EditorConfig::default()
        };
        let next = red_session()
            .apply(EditAction::RemoveBackground, None, &config)
            .unwrap();
        assert!(next.image().pixels().all(|p| p.0[3] == 0));
        assert!(next.is_modified());
    }

    #[test]
    fn every_action_preserves_dimensions() {
        let session = red_session();
        let config = EditorConfig::default();
        for action in EditAction::ALL {
            let next = session.apply(action, None, &config).unwrap();
            assert_eq!(next.dimensions(), (4, 4), "{action}");
        }
    }

    #[test]
    fn mask_without_source_is_noop() {
        let session = red_session();
        let next = session
            .apply(EditAction::ApplyMask, None, &EditorConfig::default())
            .unwrap();
        assert_eq!(next.image(), session.image());
        assert!(!next.is_modified());
    }

    #[test]
    fn failed_mask_keeps_previous_session() {
        let session = red_session();
        let source = MaskSource::Polygon(vec![Point::new(0.0, 0.0), Point::new(3.0, 3.0)]);
        let err = session
            .apply(EditAction::ApplyMask, Some(&source), &EditorConfig::default())
            .unwrap_err();
        assert!(matches!(err, RetuscheError::InsufficientPoints { found: 2 }));
        assert!(!session.is_modified());
    }

    #[test]
    fn invalid_config_is_rejected_before_processing() {
        let config = EditorConfig {
            blur_sigma: -1.0,
            ..EditorConfig::default()
        };
        let err = red_session().apply(EditAction::Blur, None, &config).unwrap_err();
        assert!(matches!(err, RetuscheError::InvalidConfig(_)));
    }

    #[test]
    fn reset_restores_original() {
        let edited = red_session()
            .apply(EditAction::Grayscale, None, &EditorConfig::default())
            .unwrap();
        assert!(edited.is_modified());
        let reset = edited.reset();
        assert!(!reset.is_modified());
        assert_eq!(reset.image().get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = red_session().png_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
