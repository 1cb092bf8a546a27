// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetuscheError};

/// How captured freehand strokes become a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskMode {
    /// Pixels covered by the painted strokes are inside the mask.
    Brush,
    /// Each stroke is closed into a polygon; its interior is inside the mask.
    Lasso,
}

/// Persistent editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Background removal: RGB distance below which a pixel is cleared.
    pub tolerance: f64,
    /// Brightness multiplier applied to the colour channels.
    pub brightness_factor: f32,
    /// Gaussian blur standard deviation, in pixels.
    pub blur_sigma: f32,
    /// Brush width for painted strokes, in pixels.
    pub stroke_width: u32,
    /// Interpretation of freehand strokes.
    pub mask_mode: MaskMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tolerance: 60.0,
            brightness_factor: 1.5,
            blur_sigma: 5.0,
            stroke_width: 20,
            mask_mode: MaskMode::Brush,
        }
    }
}

impl EditorConfig {
    /// Reject values the image routines cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RetuscheError::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if !self.brightness_factor.is_finite() || self.brightness_factor < 0.0 {
            return Err(RetuscheError::InvalidConfig(format!(
                "brightness factor must be a non-negative number, got {}",
                self.brightness_factor
            )));
        }
        // imageproc panics on sigma <= 0.
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(RetuscheError::InvalidConfig(format!(
                "blur sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if self.stroke_width == 0 {
            return Err(RetuscheError::InvalidConfig(
                "stroke width must be at least 1 pixel".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tolerance, 60.0);
        assert_eq!(config.brightness_factor, 1.5);
        assert_eq!(config.blur_sigma, 5.0);
    }

    #[test]
    fn zero_sigma_rejected() {
        let config = EditorConfig {
            blur_sigma: 0.0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RetuscheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn nan_tolerance_rejected() {
        let config = EditorConfig {
            tolerance: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "tolerance": 10.0 }"#).unwrap();
        assert_eq!(config.tolerance, 10.0);
        assert_eq!(config.stroke_width, 20);
        assert_eq!(config.mask_mode, MaskMode::Brush);
    }
}
