// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop application state. Every handler takes the current state and
// returns the next one; the Dioxus layer only stores it in a signal.

use retusche_core::human_errors::{Severity, humanize_error};
use retusche_core::{EditAction, EditorConfig, Point, RetuscheError};
use retusche_imaging::StrokeRecorder;
use tracing::{error, info, warn};

use crate::session::EditSession;

/// Status line shown under the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    /// `None` for success / informational messages.
    pub severity: Option<Severity>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: None,
        }
    }

    pub fn from_error(err: &RetuscheError) -> Self {
        let human = humanize_error(err);
        Self {
            text: human.to_string(),
            severity: Some(human.severity),
        }
    }
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Image being edited, if any.
    pub session: Option<EditSession>,
    /// Encoded preview of `session`, refreshed whenever the image changes.
    pub preview: Option<String>,
    /// Freehand strokes drawn over the current image.
    pub recorder: StrokeRecorder,
    /// Editor settings (edited on the Settings page).
    pub config: EditorConfig,
    /// Status message for user feedback.
    pub status: Option<StatusMessage>,
}

impl AppState {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the image being edited; strokes from the previous one are
    /// dropped.
    pub fn with_session(&self, session: EditSession, status: StatusMessage) -> Self {
        let preview = match session.png_data_url() {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, "preview encoding failed");
                None
            }
        };
        Self {
            session: Some(session),
            preview,
            recorder: StrokeRecorder::new(),
            config: self.config.clone(),
            status: Some(status),
        }
    }

    pub fn with_status(&self, status: StatusMessage) -> Self {
        Self {
            status: Some(status),
            ..self.clone()
        }
    }

    /// Run one toolbar action.
    ///
    /// On failure the session and strokes are kept and the error is turned
    /// into a status message; nothing else changes.
    pub fn dispatch(&self, action: EditAction) -> Self {
        let Some(session) = self.session.as_ref() else {
            return self.with_status(StatusMessage::from_error(&RetuscheError::NoImageLoaded));
        };

        let result = if action == EditAction::ApplyMask {
            let (width, height) = session.dimensions();
            self.recorder
                .to_mask_source(self.config.mask_mode, width, height, self.config.stroke_width)
                .and_then(|source| session.apply(action, source.as_ref(), &self.config))
        } else {
            session.apply(action, None, &self.config)
        };

        match result {
            Ok(next) => {
                info!(%action, "action applied");
                let message = match action {
                    EditAction::ApplyMask if self.recorder.strokes().is_empty() => {
                        "Nothing drawn; image unchanged.".to_string()
                    }
                    EditAction::ApplyMask => "Mask applied!".to_string(),
                    other => format!("{} applied.", other.label()),
                };
                self.with_session(next, StatusMessage::info(message))
            }
            Err(e) => {
                error!(%action, error = %e, "action failed");
                self.with_status(StatusMessage::from_error(&e))
            }
        }
    }

    /// Back to the image as it was opened.
    pub fn reset(&self) -> Self {
        match self.session.as_ref() {
            Some(session) => {
                self.with_session(session.reset(), StatusMessage::info("Reverted to original."))
            }
            None => self.clone(),
        }
    }

    // -- Stroke capture --------------------------------------------------------

    pub fn press(&mut self, point: Point) {
        if self.session.is_some() {
            self.recorder.press(point);
        }
    }

    pub fn drag(&mut self, point: Point) {
        self.recorder.drag(point);
    }

    pub fn release(&mut self) {
        self.recorder.release();
    }

    pub fn clear_strokes(&mut self) {
        self.recorder.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use retusche_core::MaskMode;

    fn loaded(mode: MaskMode) -> AppState {
        let config = EditorConfig {
            mask_mode: mode,
            ..EditorConfig::default()
        };
        let session = EditSession::new("t.png", RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255])));
        AppState::new(config).with_session(session, StatusMessage::info("opened"))
    }

    fn draw(state: &mut AppState, points: &[(f32, f32)]) {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            state.press(Point::new(x, y));
        }
        for &(x, y) in iter {
            state.drag(Point::new(x, y));
        }
        state.release();
    }

    #[test]
    fn action_without_image_reports_no_image() {
        let next = AppState::default().dispatch(EditAction::Blur);
        assert!(next.session.is_none());
        let status = next.status.unwrap();
        assert_eq!(status.severity, Some(Severity::ActionRequired));
        assert!(status.text.contains("No image"));
    }

    #[test]
    fn loading_builds_preview() {
        let state = loaded(MaskMode::Brush);
        assert!(state.preview.as_deref().unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn lasso_with_two_points_keeps_image_and_strokes() {
        let mut state = loaded(MaskMode::Lasso);
        draw(&mut state, &[(1.0, 1.0), (8.0, 8.0)]);
        let next = state.dispatch(EditAction::ApplyMask);

        assert!(!next.session.as_ref().unwrap().is_modified());
        assert_eq!(next.recorder.strokes().len(), 1);
        let status = next.status.unwrap();
        assert_eq!(status.severity, Some(Severity::ActionRequired));
    }

    #[test]
    fn lasso_mask_clears_outside_and_resets_strokes() {
        let mut state = loaded(MaskMode::Lasso);
        draw(&mut state, &[(2.0, 2.0), (7.0, 2.0), (7.0, 7.0), (2.0, 7.0)]);
        let next = state.dispatch(EditAction::ApplyMask);

        let image = next.session.as_ref().unwrap().image();
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert_eq!(image.get_pixel(4, 4).0[3], 255);
        assert!(next.recorder.is_empty());
        assert_eq!(next.status.unwrap().text, "Mask applied!");
    }

    #[test]
    fn brush_mask_keeps_painted_pixels() {
        let mut state = loaded(MaskMode::Brush);
        state.config.stroke_width = 2;
        draw(&mut state, &[(5.0, 5.0)]);
        let next = state.dispatch(EditAction::ApplyMask);

        let image = next.session.as_ref().unwrap().image();
        assert_eq!(image.get_pixel(5, 5).0[3], 255);
        assert_eq!(image.get_pixel(0, 9).0[3], 0);
    }

    #[test]
    fn mask_with_nothing_drawn_is_noop() {
        let next = loaded(MaskMode::Brush).dispatch(EditAction::ApplyMask);
        assert!(!next.session.as_ref().unwrap().is_modified());
        assert_eq!(next.status.unwrap().severity, None);
    }

    #[test]
    fn strokes_ignored_without_image() {
        let mut state = AppState::default();
        state.press(Point::new(1.0, 1.0));
        state.release();
        assert!(state.recorder.is_empty());
    }

    #[test]
    fn reset_after_action_restores_image() {
        let state = loaded(MaskMode::Brush).dispatch(EditAction::Brighten);
        assert!(state.session.as_ref().unwrap().is_modified());
        let reset = state.reset();
        assert!(!reset.session.unwrap().is_modified());
    }
}
