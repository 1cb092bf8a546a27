// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform library — round border, grayscale, blur, brighten, and
// corner-sampled background removal. Every function borrows its input and
// returns a new image of the same dimensions.

use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, info, instrument, warn};

/// Fill for pixels outside the rounded border.
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Cut the image to the largest centred circle that fits.
///
/// The radius is `min(width, height) / 2`. Inside the circle pixels are
/// copied unchanged (alpha included); outside they become fully transparent
/// black. On a non-square image the excess of the longer side is cleared on
/// both ends.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn round_border(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let radius = width.min(height) / 2;
    info!(radius, "Rounding border");

    let mut mask = GrayImage::new(width, height);
    draw_filled_circle_mut(
        &mut mask,
        ((width / 2) as i32, (height / 2) as i32),
        radius as i32,
        Luma([255u8]),
    );

    ImageBuffer::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            *image.get_pixel(x, y)
        } else {
            TRANSPARENT
        }
    })
}

/// Convert to ITU-R 601-2 luma and expand back to RGBA.
///
/// `L = (299 R + 587 G + 114 B) / 1000`, rounded. Alpha is forced to 255: any
/// transparency in the input is lost. Pixels that are already gray keep
/// their RGB values, so applying this twice changes nothing the second time.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn grayscale(image: &RgbaImage) -> RgbaImage {
    info!("Converting to grayscale");
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let l = luma_601(image.get_pixel(x, y));
        Rgba([l, l, l, 255])
    })
}

fn luma_601(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0.map(u32::from);
    // At most 255, so the narrowing cannot truncate.
    ((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8
}

/// Gaussian blur with standard deviation `sigma`, applied to all four
/// channels including alpha.
///
/// A non-positive or non-finite `sigma` leaves the image unchanged.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if !(sigma.is_finite() && sigma > 0.0) {
        warn!(sigma, "Blur sigma must be positive; returning unchanged");
        return image.clone();
    }
    info!(sigma, "Applying Gaussian blur");
    gaussian_blur_f32(image, sigma)
}

/// Multiply the colour channels by `factor`, clamping to 0..=255 and
/// truncating the fraction. Alpha is left as is.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn brighten(image: &RgbaImage, factor: f32) -> RgbaImage {
    info!(factor, "Adjusting brightness");

    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let adjust = |channel: u8| -> u8 { (channel as f32 * factor).clamp(0.0, 255.0) as u8 };
        Rgba([adjust(r), adjust(g), adjust(b), a])
    })
}

/// Mean RGB of the four corner pixels, or `None` for an empty image.
pub fn background_estimate(image: &RgbaImage) -> Option<[f64; 3]> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let corners = [
        image.get_pixel(0, 0),
        image.get_pixel(width - 1, 0),
        image.get_pixel(0, height - 1),
        image.get_pixel(width - 1, height - 1),
    ];

    let mut sum = [0.0f64; 3];
    for corner in corners {
        for (acc, &channel) in sum.iter_mut().zip(&corner.0[..3]) {
            *acc += channel as f64;
        }
    }
    Some(sum.map(|total| total / corners.len() as f64))
}

/// Clear every pixel whose colour is close to the corner-sampled background.
///
/// The background colour is the mean of the four corners. A pixel whose
/// Euclidean RGB distance from it is strictly below `tolerance` gets alpha 0;
/// all other pixels are left untouched. This is a heuristic: it gives wrong
/// results on non-uniform backgrounds or when the subject touches a corner,
/// and no attempt is made to detect either case.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn remove_background(image: &RgbaImage, tolerance: f64) -> RgbaImage {
    let mut output = image.clone();
    let Some(background) = background_estimate(image) else {
        debug!("Empty image; nothing to remove");
        return output;
    };
    info!(?background, tolerance, "Removing background");

    let mut cleared = 0usize;
    for pixel in output.pixels_mut() {
        let distance = pixel.0[..3]
            .iter()
            .zip(background)
            .map(|(&channel, bg)| (channel as f64 - bg).powi(2))
            .sum::<f64>()
            .sqrt();
        if distance < tolerance {
            pixel.0[3] = 0;
            cleared += 1;
        }
    }

    debug!(cleared, total = image.width() as u64 * image.height() as u64, "Background removal complete");
    output
}

// -- Tests --------------------------------------------------------------------
