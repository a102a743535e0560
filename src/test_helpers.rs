//! Shared test utilities: synthetic rasters and in-memory encoding.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let img = bordered_image(30, 20, Rgba([10, 20, 30, 255]), Rgba([0, 0, 0, 255]));
//! let bytes = encode_png(&img);
//! compositor.load_image(&bytes).unwrap();
//! ```

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

// =========================================================================
// Synthetic rasters
// =========================================================================

/// A `w`×`h` image filled with a single color.
pub fn solid_image(w: u32, h: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(w, h, color)
}

/// A `w`×`h` image whose outermost ring is `border` and whose interior is
/// `inner`.
pub fn bordered_image(w: u32, h: u32, border: Rgba<u8>, inner: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            border
        } else {
            inner
        }
    })
}

// =========================================================================
// Encoding
// =========================================================================

/// Encode an image as PNG bytes, as a file picker or paste would deliver it.
pub fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .unwrap();
    out
}
