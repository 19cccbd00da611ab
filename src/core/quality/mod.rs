//! # Quality Module
//!
//! Decides whether a photo is blurry.
//! Uses the variance of the Laplacian of the image's luminance: sharp photos
//! have crisp edges and therefore a widely spread Laplacian response, blurry
//! ones do not.
//!
//! A photo is blurry when its variance is strictly below the threshold. A
//! file that cannot be decoded at all counts as blurry, so unreadable images
//! end up in the blurry folder instead of disappearing.
//!
//! Luminance comes from `image`'s `to_luma8`, which weighs channels with
//! Rec. 709 coefficients rather than BT.601. Colour photos whose variance
//! sits right at the threshold can fall on either side depending on which
//! weighting produced the gray image.

mod decode;

pub use decode::LumaDecoder;

use crate::error::DecodeError;
use image::GrayImage;
use std::path::Path;

/// Variance below which a photo is considered blurry
pub const DEFAULT_BLUR_THRESHOLD: f64 = 100.0;

/// Blur decision for a file on disk
pub trait BlurDetector: Send + Sync {
    /// True if the photo at `path` is blurry or cannot be decoded
    fn is_blurry(&self, path: &Path) -> bool;
}

/// Laplacian-variance blur classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpnessClassifier {
    threshold: f64,
}

impl Default for SharpnessClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BLUR_THRESHOLD,
        }
    }
}

impl SharpnessClassifier {
    /// Create a classifier with a custom threshold
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The variance threshold in use
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Measure the Laplacian variance of a file
    pub fn measure(&self, path: &Path) -> Result<f64, DecodeError> {
        let gray = LumaDecoder::decode(path)?;
        Ok(laplacian_variance(&gray))
    }

    /// Blur decision for an already-measured variance
    pub fn is_blurry_variance(&self, variance: f64) -> bool {
        variance < self.threshold
    }
}

impl BlurDetector for SharpnessClassifier {
    fn is_blurry(&self, path: &Path) -> bool {
        match self.measure(path) {
            Ok(variance) => {
                tracing::trace!(path = %path.display(), variance, "Measured sharpness");
                self.is_blurry_variance(variance)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Undecodable image treated as blurry");
                true
            }
        }
    }
}

/// Mirror an out-of-range index back into `0..len`, excluding the edge pixel
/// itself (`-1 -> 1`, `len -> len - 2`).
fn reflect101(index: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let mirrored = if index < 0 {
        -index
    } else if index >= len {
        2 * (len - 1) - index
    } else {
        index
    };
    mirrored as u32
}

/// Population variance of the 4-neighbour Laplacian over every pixel.
///
/// Kernel `[0, 1, 0; 1, -4, 1; 0, 1, 0]`; border pixels use reflect-101
/// neighbours. Accumulated in one pass (Welford) so no response buffer is
/// allocated.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let (w, h) = (width as i64, height as i64);
    let at = |x: i64, y: i64| gray.get_pixel(reflect101(x, w), reflect101(y, h))[0] as f64;

    let mut count = 0.0;
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for y in 0..h {
        for x in 0..w {
            let response =
                at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * at(x, y);

            count += 1.0;
            let delta = response - mean;
            mean += delta / count;
            m2 += delta * (response - mean);
        }
    }

    m2 / count
}
