//! Text-as-point-cloud sampling.
//!
//! The host rasterizes the text (white on black) into a bitmap; this module
//! only reads luminance, so it runs the same natively and in the browser.

use glam::Vec3;
use rand::Rng;

use crate::error::SwarmError;

/// Single-channel 8-bit bitmap, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct LumaBitmap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl LumaBitmap {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SwarmError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(SwarmError::BitmapSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// All-black bitmap; sampling it yields the origin fallback.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Take the red channel of RGBA pixels (canvas `getImageData` layout).
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self, SwarmError> {
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(SwarmError::BitmapSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: rgba.chunks_exact(4).map(|px| px[0]).collect(),
        })
    }

    #[inline]
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Coordinates of pixels brighter than `threshold`, visiting every
    /// `stride`-th row and column.
    pub fn bright_pixels(&self, stride: usize, threshold: u8) -> Vec<(usize, usize)> {
        let stride = stride.max(1);
        let mut out = Vec::new();
        for y in (0..self.height).step_by(stride) {
            for x in (0..self.width).step_by(stride) {
                if self.luma(x, y) > threshold {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

/// Sample `count` points from the bright pixels of `bitmap`, with replacement.
///
/// Pixels are centered on the bitmap middle, y is flipped to point up, and a
/// small depth jitter is added. No bright pixels means every point is the
/// origin.
pub fn sample_glyph<R: Rng + ?Sized>(
    count: usize,
    bitmap: &LumaBitmap,
    stride: usize,
    threshold: u8,
    scale: f32,
    rng: &mut R,
) -> Vec<Vec3> {
    let pixels = bitmap.bright_pixels(stride, threshold);
    if pixels.is_empty() {
        log::warn!(
            "glyph bitmap {}x{} has no pixels above {}, collapsing to origin",
            bitmap.width,
            bitmap.height,
            threshold
        );
        return vec![Vec3::ZERO; count];
    }

    let half_w = bitmap.width as f32 * 0.5;
    let half_h = bitmap.height as f32 * 0.5;
    (0..count)
        .map(|_| {
            let (x, y) = pixels[rng.gen_range(0..pixels.len())];
            Vec3::new(
                (x as f32 - half_w) * scale,
                -(y as f32 - half_h) * scale,
                (rng.gen::<f32>() - 0.5) * 10.0,
            )
        })
        .collect()
}
