// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Retusche.

use thiserror::Error;

/// Top-level error type for all Retusche operations.
#[derive(Debug, Error)]
pub enum RetuscheError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("mask needs at least 3 points, got {found}")]
    InsufficientPoints { found: usize },

    #[error("mask is {actual:?} but image is {expected:?} (width, height)")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("no image loaded")]
    NoImageLoaded,

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RetuscheError>;
