//! Pure Rust canvas backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, GIF, BMP, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Heavy downscale | `image::imageops::resize` with `Triangle` filter |
//! | Composite | inverse-mapped nearest / bilinear sampling, rows in parallel via `rayon` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at quality 100 (alpha dropped) |

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::params::{CompositeParams, ImageLayer, Placement, Sampling};
use crate::types::{CANVAS_HEIGHT, CANVAS_WIDTH, ExportFormat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader, Rgba, RgbaImage,
};
use rayon::prelude::*;
use std::borrow::Cow;
use std::io::Cursor;

/// JPEG exports never trade quality for size.
pub const JPEG_QUALITY: u8 = 100;

const CHANNELS: usize = 4;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A premultiplied RGBA sample: color channels in 0..=255 already scaled by
/// alpha, alpha in 0..=1.
type Premultiplied = [f32; 4];

fn premultiply(px: &Rgba<u8>) -> Premultiplied {
    let a = px[3] as f32 / 255.0;
    [px[0] as f32 * a, px[1] as f32 * a, px[2] as f32 * a, a]
}

/// Source-over blend of a premultiplied sample onto a destination pixel.
fn blend_over(dst: &mut [u8], src: Premultiplied) {
    let inv = 1.0 - src[3];
    for c in 0..3 {
        dst[c] = (src[c] + dst[c] as f32 * inv).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (src[3] * 255.0 + dst[3] as f32 * inv).round().clamp(0.0, 255.0) as u8;
}

/// Shrink the source up front when the image is drawn at less than half its
/// size, so bilinear sampling doesn't skip most of the pixels.
fn prepare_source<'a>(layer: &ImageLayer<'a>, sampling: Sampling) -> Cow<'a, RgbaImage> {
    let src = layer.source.pixels();
    if sampling != Sampling::Bilinear {
        return Cow::Borrowed(src);
    }
    let (w, h) = src.dimensions();
    let target_w = layer.placement.width.round().max(1.0);
    let target_h = layer.placement.height.round().max(1.0);
    if target_w * 2.0 >= w as f64 && target_h * 2.0 >= h as f64 {
        return Cow::Borrowed(src);
    }
    let out_w = (target_w as u32).clamp(1, w);
    let out_h = (target_h as u32).clamp(1, h);
    Cow::Owned(image::imageops::resize(src, out_w, out_h, FilterType::Triangle))
}

/// Maps canvas pixel centers back into source space and samples there.
struct Sampler<'a> {
    source: &'a RgbaImage,
    placement: Placement,
    sampling: Sampling,
    /// Source pixels per canvas pixel on each axis.
    step_x: f64,
    step_y: f64,
}

impl<'a> Sampler<'a> {
    fn new(source: &'a RgbaImage, placement: Placement, sampling: Sampling) -> Self {
        Self {
            source,
            placement,
            sampling,
            step_x: source.width() as f64 / placement.width,
            step_y: source.height() as f64 / placement.height,
        }
    }

    fn draw_row(&self, y: u32, row: &mut [u8]) {
        let p = &self.placement;
        let py = y as f64 + 0.5;
        if py < p.top || py >= p.bottom() {
            return;
        }
        let v = (py - p.top) * self.step_y;

        // Canvas columns whose centers fall inside [left, right)
        let x_start = (p.left - 0.5).ceil().max(0.0);
        let x_end = (p.right() - 0.5).ceil().clamp(0.0, CANVAS_WIDTH as f64);
        if x_start >= x_end {
            return;
        }

        for x in x_start as usize..x_end as usize {
            let u = (x as f64 + 0.5 - p.left) * self.step_x;
            let sample = match self.sampling {
                Sampling::Nearest => self.nearest(u, v),
                Sampling::Bilinear => self.bilinear(u, v),
            };
            let offset = x * CHANNELS;
            blend_over(&mut row[offset..offset + CHANNELS], sample);
        }
    }

    fn nearest(&self, u: f64, v: f64) -> Premultiplied {
        let x = (u.floor().max(0.0) as u32).min(self.source.width() - 1);
        let y = (v.floor().max(0.0) as u32).min(self.source.height() - 1);
        premultiply(self.source.get_pixel(x, y))
    }

    fn bilinear(&self, u: f64, v: f64) -> Premultiplied {
        let (x0, x1, tx) = Self::taps(u, self.source.width());
        let (y0, y1, ty) = Self::taps(v, self.source.height());

        let p00 = premultiply(self.source.get_pixel(x0, y0));
        let p10 = premultiply(self.source.get_pixel(x1, y0));
        let p01 = premultiply(self.source.get_pixel(x0, y1));
        let p11 = premultiply(self.source.get_pixel(x1, y1));

        let mut out = [0.0f32; 4];
        for c in 0..4 {
            let top = p00[c] * (1.0 - tx) + p10[c] * tx;
            let bottom = p01[c] * (1.0 - tx) + p11[c] * tx;
            out[c] = top * (1.0 - ty) + bottom * ty;
        }
        out
    }

    /// Neighbouring texel indices and the weight of the second one, with
    /// edges clamped.
    fn taps(coord: f64, len: u32) -> (u32, u32, f32) {
        let max = (len - 1) as f64;
        let f = coord - 0.5;
        let base = f.floor();
        let t = (f - base) as f32;
        let i0 = base.clamp(0.0, max) as u32;
        let i1 = (base + 1.0).clamp(0.0, max) as u32;
        (i0, i1, t)
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(BackendError::Io)?;
        let format = reader
            .format()
            .ok_or_else(|| BackendError::Decode("unrecognized image format".into()))?;
        let decode_err = |e: image::ImageError| BackendError::Decode(format!("{format:?}: {e}"));

        let mut decoder = reader.into_decoder().map_err(decode_err)?;
        // Missing or unreadable EXIF means the pixels are already upright
        let orientation = decoder.orientation().unwrap_or_else(|e| {
            log::debug!("Ignoring unreadable orientation: {e}");
            Orientation::NoTransforms
        });
        let mut decoded = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        decoded.apply_orientation(orientation);
        SourceImage::new(decoded.into_rgba8())
            .ok_or_else(|| BackendError::Decode("image has zero width or height".into()))
    }

    fn composite(&self, params: &CompositeParams<'_>) -> RgbaImage {
        let bg = params.background;
        let mut canvas = RgbaImage::from_pixel(
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
            Rgba([bg.r, bg.g, bg.b, 255]),
        );

        let Some(layer) = params.layer else {
            return canvas;
        };
        if !layer.placement.is_visible() {
            return canvas;
        }

        let source = prepare_source(&layer, params.sampling);
        let sampler = Sampler::new(&source, layer.placement, params.sampling);
        let row_len = CANVAS_WIDTH as usize * CHANNELS;
        let buf: &mut [u8] = &mut canvas;
        buf.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| sampler.draw_row(y as u32, row));

        canvas
    }

    fn encode(&self, surface: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, BackendError> {
        let (width, height) = surface.dimensions();
        let mut out = Vec::new();
        let result = match format {
            ExportFormat::Png => PngEncoder::new(&mut out).write_image(
                surface.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            ExportFormat::Jpeg => {
                let rgb: Vec<u8> = surface.pixels().flat_map(|p| [p[0], p[1], p[2]]).collect();
                JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).write_image(
                    &rgb,
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
        };
        result.map_err(|e| BackendError::Encode(format!("{format}: {e}")))?;
        Ok(out)
    }
}
