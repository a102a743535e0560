//! High-level canvas operations.
//!
//! These functions combine calculations with backend execution: they take
//! the current state, compute where things go, and call the backend.

use super::backend::{ImageBackend, SourceImage};
use super::calculations::{centered_origin, display_dimensions, rounded_mean};
use super::params::{CompositeParams, ImageLayer, Placement, Sampling, ViewState};
use crate::types::{CANVAS_HEIGHT, CANVAS_WIDTH, EXPORT_STEM, ExportFormat, Rgb};
use image::RgbaImage;

/// Compute where the image lands on the canvas for a given view.
pub fn plan_placement(source: &SourceImage, view: &ViewState) -> Placement {
    let (width, height) = display_dimensions(
        view.fit,
        (source.width(), source.height()),
        (CANVAS_WIDTH, CANVAS_HEIGHT),
        view.scale,
    );
    let (left, top) = centered_origin(view.center(), (width, height));
    Placement {
        left,
        top,
        width,
        height,
    }
}

/// Plan a redraw without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_composite<'a>(
    source: Option<&'a SourceImage>,
    view: &ViewState,
    background: Rgb,
    sampling: Sampling,
) -> CompositeParams<'a> {
    CompositeParams {
        background,
        layer: source.map(|source| ImageLayer {
            source,
            placement: plan_placement(source, view),
        }),
        sampling,
    }
}

/// Render the canvas: background fill, then the image if one is loaded.
pub fn render(
    backend: &impl ImageBackend,
    source: Option<&SourceImage>,
    view: &ViewState,
    background: Rgb,
    sampling: Sampling,
) -> RgbaImage {
    backend.composite(&plan_composite(source, view, background, sampling))
}

/// A fully transparent canvas, the state after clearing.
pub fn blank_surface() -> RgbaImage {
    RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

/// Average color of the image's outermost rows and columns.
///
/// The top and bottom rows are walked for every x, then the left and right
/// columns for every y, so each corner pixel is counted twice. Channels are
/// averaged independently and rounded half up. Alpha is not a weight, but a
/// fully transparent pixel reads as black regardless of its stored color.
pub fn sample_edge_background(source: &SourceImage) -> Rgb {
    let pixels = source.pixels();
    let (w, h) = pixels.dimensions();

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    let mut add = |x: u32, y: u32| {
        let p = pixels.get_pixel(x, y);
        count += 1;
        // Fully transparent pixels read back as (0, 0, 0)
        if p[3] == 0 {
            return;
        }
        for (sum, channel) in sums.iter_mut().zip(p.0) {
            *sum += channel as u64;
        }
    };

    for x in 0..w {
        add(x, 0);
        add(x, h - 1);
    }
    for y in 0..h {
        add(0, y);
        add(w - 1, y);
    }

    Rgb::new(
        rounded_mean(sums[0], count),
        rounded_mean(sums[1], count),
        rounded_mean(sums[2], count),
    )
}

/// File name an export is saved under, e.g. `instagram-1080x1350.jpg`.
pub fn export_file_name(format: ExportFormat) -> String {
    format!("{}.{}", EXPORT_STEM, format.extension())
}
