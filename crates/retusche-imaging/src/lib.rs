// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// retusche-imaging — Pixel operations for the Retusche editor.
//
// Provides the transform library (round border, grayscale, blur, brighten,
// corner-sampled background removal), the freehand mask compositor, stroke
// capture for building masks, and a chaining `ImageEditor` wrapper with PNG
// output.

pub mod editor;
pub mod mask;
pub mod stroke;
pub mod transform;

// Re-export the primary items so callers can use `retusche_imaging::ImageEditor` etc.
pub use editor::ImageEditor;
pub use mask::{Mask, MaskSource, apply_mask};
pub use stroke::{Stroke, StrokeRecorder, render_layer};
pub use transform::{
    background_estimate, blur, brighten, grayscale, remove_background, round_border,
};
