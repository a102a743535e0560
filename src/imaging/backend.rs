//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, composite and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock so compositor logic can be checked
//! without touching pixels.

use super::params::CompositeParams;
use crate::types::ExportFormat;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of inspecting an image's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded source raster, always RGBA8 with non-zero dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Wrap a decoded buffer. Returns `None` for a zero-sized image.
    pub fn new(pixels: RgbaImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return None;
        }
        Some(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Trait for image backends.
///
/// Every backend must implement all three operations so the compositor is
/// backend-agnostic.
pub trait ImageBackend: Sync {
    /// Decode raw bytes of any supported format, sniffing the format from content.
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError>;

    /// Produce a full canvas-sized surface for the given parameters.
    ///
    /// Must be deterministic: equal params give byte-identical output.
    fn composite(&self, params: &CompositeParams<'_>) -> RgbaImage;

    /// Serialize a surface at maximum quality.
    fn encode(&self, surface: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, BackendError>;
}
