// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mask compositor — turns a captured drawing layer or a freehand polygon into
// a boolean mask and zeroes alpha outside it.

use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;
use retusche_core::error::{Result, RetuscheError};
use retusche_core::{Point, Polygon};
use tracing::{debug, info, instrument};

const INSIDE: Luma<u8> = Luma([255]);

/// Where a mask comes from.
#[derive(Debug, Clone)]
pub enum MaskSource {
    /// A drawing layer congruent with the image. With an alpha channel, any
    /// non-zero alpha is inside; without one, any non-zero luma is inside.
    Layer(DynamicImage),
    /// A closed freehand point sequence; its interior is inside.
    Polygon(Vec<Point>),
}

/// Per-pixel inside/outside selector, congruent with its target image.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    /// 255 inside, 0 outside.
    cells: GrayImage,
}

impl Mask {
    /// Binarise a drawing layer.
    pub fn from_layer(layer: &DynamicImage) -> Self {
        let cells = if layer.color().has_alpha() {
            let rgba = layer.to_rgba8();
            GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                binarize(rgba.get_pixel(x, y).0[3])
            })
        } else {
            let luma = layer.to_luma8();
            GrayImage::from_fn(luma.width(), luma.height(), |x, y| {
                binarize(luma.get_pixel(x, y).0[0])
            })
        };
        Self { cells }
    }

    /// Rasterise the interior (and boundary) of `polygon` onto a
    /// `width` x `height` grid.
    ///
    /// The polygon is first clipped to a frame one pixel outside the grid, so
    /// arbitrarily distant vertices never reach the rasteriser.
    pub fn from_polygon(polygon: &Polygon, width: u32, height: u32) -> Self {
        let mut cells = GrayImage::new(width, height);
        let vertices = clip_to_frame(polygon.vertices(), width, height);
        if vertices.len() >= Polygon::MIN_VERTICES {
            draw_polygon_mut(&mut cells, &vertices, INSIDE);
        }
        Self { cells }
    }

    /// Build the mask for a `width` x `height` target.
    ///
    /// Fails with `InsufficientPoints` for a polygon with fewer than three
    /// vertices and with `DimensionMismatch` for a layer of another size.
    pub fn from_source(source: &MaskSource, width: u32, height: u32) -> Result<Self> {
        match source {
            MaskSource::Layer(layer) => {
                if layer.width() != width || layer.height() != height {
                    return Err(RetuscheError::DimensionMismatch {
                        expected: (width, height),
                        actual: (layer.width(), layer.height()),
                    });
                }
                Ok(Self::from_layer(layer))
            }
            MaskSource::Polygon(points) => {
                let polygon = Polygon::new(points)?;
                Ok(Self::from_polygon(&polygon, width, height))
            }
        }
    }

    /// Combine two masks cell by cell; a cell is inside when either is.
    pub fn union(mut self, other: &Mask) -> Result<Self> {
        if self.dimensions() != other.dimensions() {
            return Err(RetuscheError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        for (cell, theirs) in self.cells.pixels_mut().zip(other.cells.pixels()) {
            cell.0[0] |= theirs.0[0];
        }
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.cells.dimensions()
    }

    /// Whether `(x, y)` is inside. Out-of-range positions are outside.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.cells.get_pixel(x, y).0[0] > 0
    }

    /// Number of inside cells.
    pub fn inside_count(&self) -> usize {
        self.cells.pixels().filter(|cell| cell.0[0] > 0).count()
    }

    /// The mask as a layer image (opaque white inside, transparent outside).
    pub fn to_layer(&self) -> DynamicImage {
        let layer = RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let value = self.cells.get_pixel(x, y).0[0];
            image::Rgba([value, value, value, value])
        });
        DynamicImage::ImageRgba8(layer)
    }

    /// Copy `base`, forcing alpha to 0 wherever the mask is outside. Inside
    /// pixels keep their original alpha and no RGB value changes.
    pub fn apply(&self, base: &RgbaImage) -> Result<RgbaImage> {
        if base.dimensions() != self.dimensions() {
            return Err(RetuscheError::DimensionMismatch {
                expected: base.dimensions(),
                actual: self.dimensions(),
            });
        }
        let mut output = base.clone();
        for (pixel, cell) in output.pixels_mut().zip(self.cells.pixels()) {
            if cell.0[0] == 0 {
                pixel.0[3] = 0;
            }
        }
        Ok(output)
    }
}

// -- Polygon clipping ---------------------------------------------------------

type Vertex = (f64, f64);

/// Sutherland-Hodgman clip of `points` against `[-1, width] x [-1, height]`,
/// rounded to pixels with repeated vertices removed. The first and last
/// returned vertices always differ.
fn clip_to_frame(points: &[Point], width: u32, height: u32) -> Vec<PixelPoint<i32>> {
    const FAR: f64 = 1e12;
    let (left, top) = (-1.0, -1.0);
    let (right, bottom) = (width as f64, height as f64);

    let mut ring: Vec<Vertex> = points
        .iter()
        .map(|p| {
            (
                (p.x as f64).clamp(-FAR, FAR),
                (p.y as f64).clamp(-FAR, FAR),
            )
        })
        .collect();
    ring = clip_edge(&ring, |v| v.0 >= left, |a, b| cross_x(a, b, left));
    ring = clip_edge(&ring, |v| v.0 <= right, |a, b| cross_x(a, b, right));
    ring = clip_edge(&ring, |v| v.1 >= top, |a, b| cross_y(a, b, top));
    ring = clip_edge(&ring, |v| v.1 <= bottom, |a, b| cross_y(a, b, bottom));

    let mut vertices: Vec<PixelPoint<i32>> = Vec::with_capacity(ring.len());
    for (x, y) in ring {
        let pixel = PixelPoint::new(x.round() as i32, y.round() as i32);
        if vertices.last() != Some(&pixel) {
            vertices.push(pixel);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

fn clip_edge(
    ring: &[Vertex],
    inside: impl Fn(Vertex) -> bool,
    cross: impl Fn(Vertex, Vertex) -> Vertex,
) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(ring.len() + 4);
    for (i, &current) in ring.iter().enumerate() {
        let previous = ring[(i + ring.len() - 1) % ring.len()];
        match (inside(previous), inside(current)) {
            (true, true) => out.push(current),
            (true, false) => out.push(cross(previous, current)),
            (false, true) => {
                out.push(cross(previous, current));
                out.push(current);
            }
            (false, false) => {}
        }
    }
    out
}

/// Point on segment `a`-`b` at `x`; the endpoints lie on opposite sides.
fn cross_x(a: Vertex, b: Vertex, x: f64) -> Vertex {
    (x, a.1 + (b.1 - a.1) * (x - a.0) / (b.0 - a.0))
}

/// Point on segment `a`-`b` at `y`; the endpoints lie on opposite sides.
fn cross_y(a: Vertex, b: Vertex, y: f64) -> Vertex {
    (a.0 + (b.0 - a.0) * (y - a.1) / (b.1 - a.1), y)
}

fn binarize(value: u8) -> Luma<u8> {
    if value > 0 { INSIDE } else { Luma([0]) }
}

/// Zero the alpha of every pixel of `base` outside the mask described by
/// `source`.
///
/// With no source the input is returned unchanged. Errors leave nothing to
/// write: the caller must report them and keep its previous image.
#[instrument(skip_all, fields(width = base.width(), height = base.height()))]
pub fn apply_mask(base: &RgbaImage, source: Option<&MaskSource>) -> Result<RgbaImage> {
    let Some(source) = source else {
        debug!("No mask source; returning input unchanged");
        return Ok(base.clone());
    };

    let mask = Mask::from_source(source, base.width(), base.height())?;
    info!(inside = mask.inside_count(), "Applying mask");
    mask.apply(base)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgba};

    fn base() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([120, 60, 30, 255]));
        img.put_pixel(5, 5, Rgba([1, 2, 3, 99]));
        img
    }

    fn square(min: f32, max: f32) -> Vec<Point> {
        vec![
            Point::new(min, min),
            Point::new(max, min),
            Point::new(max, max),
            Point::new(min, max),
        ]
    }

    #[test]
    fn no_source_returns_identical_image() {
        let img = base();
        assert_eq!(apply_mask(&img, None).unwrap(), img);
    }

    #[test]
    fn two_point_polygon_fails_validation() {
        let source = MaskSource::Polygon(vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)]);
        let err = apply_mask(&base(), Some(&source)).unwrap_err();
        assert!(matches!(err, RetuscheError::InsufficientPoints { found: 2 }));
    }

    #[test]
    fn polygon_keeps_inside_and_clears_outside() {
        let source = MaskSource::Polygon(square(2.0, 7.0));
        let out = apply_mask(&base(), Some(&source)).unwrap();

        assert_eq!(out.get_pixel(4, 4).0, [120, 60, 30, 255]);
        // Inside alpha is preserved, not forced opaque.
        assert_eq!(out.get_pixel(5, 5).0, [1, 2, 3, 99]);
        // Outside: alpha cleared, colour untouched.
        assert_eq!(out.get_pixel(0, 0).0, [120, 60, 30, 0]);
        assert_eq!(out.get_pixel(9, 9).0, [120, 60, 30, 0]);
    }

    #[test]
    fn polygon_mask_covers_its_square() {
        let polygon = Polygon::new(&square(2.0, 7.0)).unwrap();
        let mask = Mask::from_polygon(&polygon, 10, 10);
        assert_eq!(mask.inside_count(), 36);
        assert!(mask.contains(2, 2));
        assert!(mask.contains(7, 7));
        assert!(!mask.contains(8, 8));
        assert!(!mask.contains(100, 0));
    }

    #[test]
    fn polygon_beyond_bounds_is_clipped() {
        let polygon = Polygon::new(&square(-50.0, 50.0)).unwrap();
        let mask = Mask::from_polygon(&polygon, 4, 3);
        assert_eq!(mask.inside_count(), 12);
    }

    #[test]
    fn far_away_vertices_do_not_overflow() {
        let source = MaskSource::Polygon(vec![
            Point::new(-3e9, -3e9),
            Point::new(3e9, -3e9),
            Point::new(3e9, 3e9),
        ]);
        let img = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let out = apply_mask(&img, Some(&source)).unwrap();
        // Upper-right half of the diagonal is kept.
        assert_eq!(out.get_pixel(3, 0).0[3], 255);
        assert_eq!(out.get_pixel(0, 3).0[3], 0);
    }

    #[test]
    fn polygon_entirely_outside_masks_everything() {
        let polygon = Polygon::new(&square(20.0, 30.0)).unwrap();
        let mask = Mask::from_polygon(&polygon, 4, 4);
        assert_eq!(mask.inside_count(), 0);
    }

    #[test]
    fn in_frame_polygon_is_not_altered_by_clipping() {
        let points = square(2.0, 7.0);
        let clipped = clip_to_frame(&points, 10, 10);
        let expected: Vec<PixelPoint<i32>> = points
            .iter()
            .map(|p| PixelPoint::new(p.x as i32, p.y as i32))
            .collect();
        assert_eq!(clipped, expected);
    }

    #[test]
    fn alpha_layer_nonzero_is_inside() {
        let mut layer = RgbaImage::new(10, 10);
        layer.put_pixel(0, 0, Rgba([0, 0, 0, 1]));
        layer.put_pixel(5, 5, Rgba([255, 255, 255, 150]));
        let source = MaskSource::Layer(DynamicImage::ImageRgba8(layer));
        let out = apply_mask(&base(), Some(&source)).unwrap();

        assert_eq!(out.get_pixel(0, 0).0[3], 255);
        assert_eq!(out.get_pixel(5, 5).0[3], 99);
        assert_eq!(out.get_pixel(1, 0).0[3], 0);
        let visible = out.pixels().filter(|p| p.0[3] > 0).count();
        assert_eq!(visible, 2);
    }

    #[test]
    fn single_channel_layer_uses_luma() {
        let mut layer = GrayImage::new(10, 10);
        layer.put_pixel(3, 4, Luma([7]));
        let mask = Mask::from_layer(&DynamicImage::ImageLuma8(layer));
        assert_eq!(mask.inside_count(), 1);
        assert!(mask.contains(3, 4));
    }

    #[test]
    fn layer_of_wrong_size_is_rejected() {
        let source = MaskSource::Layer(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)));
        let err = apply_mask(&base(), Some(&source)).unwrap_err();
        assert!(matches!(
            err,
            RetuscheError::DimensionMismatch {
                expected: (10, 10),
                actual: (4, 4)
            }
        ));
    }

    #[test]
    fn union_combines_cells() {
        let left = Mask::from_polygon(&Polygon::new(&square(0.0, 2.0)).unwrap(), 10, 10);
        let right = Mask::from_polygon(&Polygon::new(&square(6.0, 8.0)).unwrap(), 10, 10);
        let both = left.union(&right).unwrap();
        assert_eq!(both.inside_count(), 18);
    }

    #[test]
    fn layer_round_trip_preserves_cells() {
        let mask = Mask::from_polygon(&Polygon::new(&square(1.0, 3.0)).unwrap(), 6, 6);
        assert_eq!(Mask::from_layer(&mask.to_layer()), mask);
    }
}
