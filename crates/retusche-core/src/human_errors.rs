// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the editor UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the status line is coloured.

use crate::error::RetuscheError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it right away (draw more, pick a file, change a setting).
    ActionRequired,
    /// Retrying the same thing will not help.
    Permanent,
    /// Something on the machine got in the way; trying again may work.
    Transient,
}

/// A human-readable error with a plain English message and a suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level (drives colour in UI).
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `RetuscheError` into a `HumanError` for the status line.
pub fn humanize_error(err: &RetuscheError) -> HumanError {
    match err {
        RetuscheError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a PNG or JPEG first.".into(),
            severity: Severity::Permanent,
        },

        RetuscheError::InsufficientPoints { found } => HumanError {
            message: "The drawn mask is too small.".into(),
            suggestion: format!(
                "Draw a shape with at least 3 points around the area to keep (got {found}). Nothing was saved."
            ),
            severity: Severity::ActionRequired,
        },

        RetuscheError::DimensionMismatch { expected, actual } => HumanError {
            message: "The mask doesn't fit this image.".into(),
            suggestion: format!(
                "The mask is {}x{} but the image is {}x{}. Use a mask the same size as the image.",
                actual.0, actual.1, expected.0, expected.1
            ),
            severity: Severity::ActionRequired,
        },

        RetuscheError::NoImageLoaded => HumanError {
            message: "No image is open.".into(),
            suggestion: "Open an image first, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        RetuscheError::InvalidConfig(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the values on the Settings page. ({detail})"),
            severity: Severity::ActionRequired,
        },

        RetuscheError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick a different folder.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        RetuscheError::Serialization(_) => HumanError {
            message: "The saved settings couldn't be read.".into(),
            suggestion: "Open Settings and save them again to rewrite the file.".into(),
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points_is_action_required() {
        let human = humanize_error(&RetuscheError::InsufficientPoints { found: 2 });
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("got 2"));
    }

    #[test]
    fn damaged_image_is_permanent() {
        let err = RetuscheError::ImageError("failed to decode image".into());
        assert_eq!(humanize_error(&err).severity, Severity::Permanent);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = RetuscheError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("couldn't be found"));
    }

    #[test]
    fn mismatch_reports_both_sizes() {
        let err = RetuscheError::DimensionMismatch {
            expected: (4, 4),
            actual: (2, 3),
        };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("2x3"));
        assert!(human.suggestion.contains("4x4"));
    }
}
