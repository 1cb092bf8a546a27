// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Freehand stroke capture. Pointer press/drag/release events are accumulated
// into point sequences; finished strokes become either a lasso polygon or a
// painted brush layer.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use retusche_core::error::Result;
use retusche_core::{MaskMode, Point, Polygon};
use tracing::{debug, trace};

use crate::mask::{Mask, MaskSource};

/// Brush paint: opaque white, as on a drawing canvas.
const PAINT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// One finished press-drag-release gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Close the stroke into a polygon (lasso interpretation).
    pub fn to_polygon(&self) -> Result<Polygon> {
        Polygon::new(&self.points)
    }
}

/// Accumulates pointer events into strokes.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    /// Points of the stroke in progress, if the pointer is down.
    active: Option<Vec<Point>>,
    /// Finished strokes, oldest first.
    finished: Vec<Stroke>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down: start a new stroke. A stroke still in progress is
    /// finished first.
    pub fn press(&mut self, point: Point) {
        self.release();
        trace!(x = point.x, y = point.y, "Stroke started");
        self.active = Some(vec![point]);
    }

    /// Pointer moved. Returns `false` (and records nothing) when no stroke is
    /// in progress.
    pub fn drag(&mut self, point: Point) -> bool {
        match self.active.as_mut() {
            Some(points) => {
                points.push(point);
                true
            }
            None => false,
        }
    }

    /// Pointer up: finish the stroke in progress and return it.
    pub fn release(&mut self) -> Option<&Stroke> {
        let points = self.active.take()?;
        debug!(points = points.len(), "Stroke finished");
        self.finished.push(Stroke::new(points));
        self.finished.last()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Points of the stroke in progress (empty when idle).
    pub fn active_points(&self) -> &[Point] {
        self.active.as_deref().unwrap_or(&[])
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.finished
    }

    pub fn is_empty(&self) -> bool {
        self.finished.is_empty() && self.active.is_none()
    }

    /// Drop everything, including a stroke in progress.
    pub fn clear(&mut self) {
        self.active = None;
        self.finished.clear();
    }

    /// Turn the finished strokes into a mask source for a `width` x `height`
    /// image, or `None` when nothing was drawn.
    ///
    /// In lasso mode a single stroke is passed through as a polygon and
    /// validated when the mask is applied; several strokes are validated here
    /// and merged.
    pub fn to_mask_source(
        &self,
        mode: MaskMode,
        width: u32,
        height: u32,
        stroke_width: u32,
    ) -> Result<Option<MaskSource>> {
        if self.finished.is_empty() {
            return Ok(None);
        }
        let source = match (mode, self.finished.as_slice()) {
            (MaskMode::Brush, strokes) => MaskSource::Layer(DynamicImage::ImageRgba8(
                render_layer(strokes, width, height, stroke_width),
            )),
            (MaskMode::Lasso, [only]) => MaskSource::Polygon(only.points().to_vec()),
            (MaskMode::Lasso, strokes) => {
                let mut merged: Option<Mask> = None;
                for stroke in strokes {
                    let region = Mask::from_polygon(&stroke.to_polygon()?, width, height);
                    merged = Some(match merged {
                        Some(acc) => acc.union(&region)?,
                        None => region,
                    });
                }
                match merged {
                    Some(mask) => MaskSource::Layer(mask.to_layer()),
                    None => return Ok(None),
                }
            }
        };
        Ok(Some(source))
    }
}

/// Paint `strokes` onto a transparent `width` x `height` layer with a round
/// brush `stroke_width` pixels across.
pub fn render_layer(strokes: &[Stroke], width: u32, height: u32, stroke_width: u32) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    let radius = (stroke_width / 2) as i32;

    for stroke in strokes {
        match stroke.points() {
            [] => {}
            [only] => dab(&mut layer, *only, radius),
            points => {
                for segment in points.windows(2) {
                    paint_segment(&mut layer, segment[0], segment[1], radius);
                }
            }
        }
    }
    layer
}

/// Stamp the brush at one-pixel steps from `from` to `to`.
fn paint_segment(layer: &mut RgbaImage, from: Point, to: Point, radius: i32) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        dab(layer, Point::new(from.x + dx * t, from.y + dy * t), radius);
    }
}

fn dab(layer: &mut RgbaImage, at: Point, radius: i32) {
    draw_filled_circle_mut(layer, at.rounded(), radius, PAINT);
}

// -- Tests --------------------------------------------------------------------
