// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Retusche.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetuscheError};

/// A position in image pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest whole-pixel position.
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// A closed freehand region with at least three distinct vertices.
///
/// The closing edge is implicit: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Minimum number of vertices for a region with an interior.
    pub const MIN_VERTICES: usize = 3;

    /// Build a polygon from a captured point sequence.
    ///
    /// Consecutive points that land on the same pixel are collapsed, as is a
    /// final point repeating the first. Fails with
    /// [`RetuscheError::InsufficientPoints`] when fewer than three vertices
    /// remain.
    pub fn new(points: &[Point]) -> Result<Self> {
        let mut vertices: Vec<Point> = Vec::with_capacity(points.len());
        for point in points {
            if vertices.last().map(Point::rounded) != Some(point.rounded()) {
                vertices.push(*point);
            }
        }
        if vertices.len() > 1
            && vertices.first().map(Point::rounded) == vertices.last().map(Point::rounded)
        {
            vertices.pop();
        }

        if vertices.len() < Self::MIN_VERTICES {
            return Err(RetuscheError::InsufficientPoints {
                found: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Never true for a constructed polygon.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// One user-triggered editing action. Actions are independent of each other
/// and may be applied in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditAction {
    RoundBorder,
    Grayscale,
    Blur,
    Brighten,
    RemoveBackground,
    ApplyMask,
}

impl EditAction {
    /// Every action, in toolbar order.
    pub const ALL: [EditAction; 6] = [
        Self::RoundBorder,
        Self::Grayscale,
        Self::Blur,
        Self::Brighten,
        Self::RemoveBackground,
        Self::ApplyMask,
    ];

    /// Resolve a mode string as typed by the user.
    ///
    /// Unknown modes yield `None`; callers treat that as "do nothing".
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "round" | "round-border" => Some(Self::RoundBorder),
            "grayscale" | "gray" => Some(Self::Grayscale),
            "blur" => Some(Self::Blur),
            "brighten" | "brightness" => Some(Self::Brighten),
            "remove-bg" | "remove-background" => Some(Self::RemoveBackground),
            "mask" | "apply-mask" => Some(Self::ApplyMask),
            _ => None,
        }
    }

    /// Canonical mode string.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::RoundBorder => "round",
            Self::Grayscale => "grayscale",
            Self::Blur => "blur",
            Self::Brighten => "brighten",
            Self::RemoveBackground => "remove-bg",
            Self::ApplyMask => "mask",
        }
    }

    /// Button label for the desktop UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoundBorder => "Round Border",
            Self::Grayscale => "Grayscale",
            Self::Blur => "Blur",
            Self::Brighten => "Brighten",
            Self::RemoveBackground => "Remove Background",
            Self::ApplyMask => "Apply Freehand Mask",
        }
    }
}

impl std::fmt::Display for EditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn polygon_accepts_triangle() {
        let poly = Polygon::new(&pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)])).unwrap();
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn polygon_rejects_two_points() {
        let err = Polygon::new(&pts(&[(0.0, 0.0), (10.0, 0.0)])).unwrap_err();
        assert!(matches!(err, RetuscheError::InsufficientPoints { found: 2 }));
    }

    #[test]
    fn polygon_rejects_empty() {
        let err = Polygon::new(&[]).unwrap_err();
        assert!(matches!(err, RetuscheError::InsufficientPoints { found: 0 }));
    }

    #[test]
    fn polygon_drops_repeated_closing_point() {
        let poly = Polygon::new(&pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 0.0),
        ]))
        .unwrap();
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn polygon_collapses_jitter_before_counting() {
        // A drag that never leaves two pixels is not a region.
        let err = Polygon::new(&pts(&[
            (1.0, 1.0),
            (1.2, 0.9),
            (5.0, 5.0),
            (5.1, 5.0),
        ]))
        .unwrap_err();
        assert!(matches!(err, RetuscheError::InsufficientPoints { found: 2 }));
    }

    #[test]
    fn mode_aliases_resolve() {
        assert_eq!(EditAction::from_mode("round"), Some(EditAction::RoundBorder));
        assert_eq!(EditAction::from_mode(" Gray "), Some(EditAction::Grayscale));
        assert_eq!(
            EditAction::from_mode("REMOVE-BACKGROUND"),
            Some(EditAction::RemoveBackground)
        );
        assert_eq!(EditAction::from_mode("apply-mask"), Some(EditAction::ApplyMask));
    }

    #[test]
    fn unknown_mode_is_none() {
        assert_eq!(EditAction::from_mode("sepia"), None);
        assert_eq!(EditAction::from_mode(""), None);
    }

    #[test]
    fn canonical_mode_round_trips() {
        for action in EditAction::ALL {
            assert_eq!(EditAction::from_mode(action.mode()), Some(action));
        }
    }
}
