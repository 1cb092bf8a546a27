// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line front-end: one mode string, one input file, one output file.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use retusche_core::error::{Result, RetuscheError};
use retusche_core::{EditAction, EditorConfig, Point};
use retusche_imaging::MaskSource;
use tracing::{info, warn};

use crate::session::EditSession;

/// Small image retouching tool. Without a subcommand the desktop editor opens.
#[derive(Parser, Debug)]
#[command(name = "retusche", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply one edit to an image and write the result as PNG.
    Apply(ApplyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// round | grayscale | blur | brighten | remove-bg | mask.
    /// Unknown modes do nothing and write no file.
    #[arg(short, long)]
    pub mode: String,
    /// Image to read (any format the decoder knows).
    pub input: PathBuf,
    /// Where to write the PNG result.
    pub output: PathBuf,
    /// Mask polygon as a JSON array of {"x", "y"} points (mode `mask`).
    #[arg(long, conflicts_with = "mask_layer")]
    pub points: Option<PathBuf>,
    /// Mask layer image; non-zero alpha (or luma) is kept (mode `mask`).
    #[arg(long)]
    pub mask_layer: Option<PathBuf>,
    /// Background removal tolerance (RGB distance).
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Brightness factor.
    #[arg(long)]
    pub factor: Option<f32>,
    /// Blur standard deviation in pixels.
    #[arg(long)]
    pub sigma: Option<f32>,
    /// Settings file to use instead of the saved settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ApplyArgs {
    /// `base` with any values given on the command line taking precedence.
    pub fn effective_config(&self, base: EditorConfig) -> EditorConfig {
        EditorConfig {
            tolerance: self.tolerance.unwrap_or(base.tolerance),
            brightness_factor: self.factor.unwrap_or(base.brightness_factor),
            blur_sigma: self.sigma.unwrap_or(base.blur_sigma),
            ..base
        }
    }
}

/// What `run` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result was written to this path.
    Written(PathBuf),
    /// The mode was not recognised; nothing was read or written.
    UnknownMode(String),
}

/// Execute one `apply` invocation.
pub fn run(args: &ApplyArgs, base: EditorConfig) -> Result<Outcome> {
    let Some(action) = EditAction::from_mode(&args.mode) else {
        warn!(mode = %args.mode, "unsupported mode; nothing to do");
        return Ok(Outcome::UnknownMode(args.mode.clone()));
    };

    let config = args.effective_config(base);
    config.validate()?;

    let session = EditSession::open(&args.input)?;
    let mask_source = match action {
        EditAction::ApplyMask => load_mask_source(args)?,
        _ => None,
    };

    let edited = session.apply(action, mask_source.as_ref(), &config)?;
    edited.save_png(&args.output)?;
    info!(%action, output = %args.output.display(), "result written");
    Ok(Outcome::Written(args.output.clone()))
}

fn load_mask_source(args: &ApplyArgs) -> Result<Option<MaskSource>> {
    if let Some(path) = &args.points {
        return Ok(Some(MaskSource::Polygon(read_points(path)?)));
    }
    if let Some(path) = &args.mask_layer {
        let layer = image::open(path).map_err(|err| {
            RetuscheError::ImageError(format!("failed to open mask {}: {}", path.display(), err))
        })?;
        return Ok(Some(MaskSource::Layer(layer)));
    }
    Ok(None)
}

fn read_points(path: &Path) -> Result<Vec<Point>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
