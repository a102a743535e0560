//! Parameter types for canvas operations.
//!
//! These structs describe *what* to draw, not *how*. They are the interface
//! between the [`operations`](super::operations) module (which decides where
//! the image goes) and the [`backend`](super::backend) (which does the pixel
//! work), so a mock backend can stand in during tests.
//!
//! ## Types
//!
//! - [`ViewState`]: zoom factor, center point and fit mode.
//! - [`ZoomRange`]: bounds and step of the zoom slider.
//! - [`Sampling`]: resampling filter used when drawing the image.
//! - [`Placement`]: where the image lands on the canvas.
//! - [`CompositeParams`]: everything the backend needs for one redraw.

use super::backend::SourceImage;
use super::calculations::snap_to_step;
use crate::types::{CANVAS_HEIGHT, CANVAS_WIDTH, FitMode, Rgb};
use serde::{Deserialize, Serialize};

/// User-controlled view of the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Zoom factor applied on top of the fit mode.
    pub scale: f64,
    /// Image center in canvas coordinates.
    pub center_x: f64,
    pub center_y: f64,
    pub fit: FitMode,
}

impl ViewState {
    /// The state a freshly loaded image starts from: unzoomed, centered, contained.
    pub fn initial() -> Self {
        Self {
            scale: 1.0,
            center_x: CANVAS_WIDTH as f64 / 2.0,
            center_y: CANVAS_HEIGHT as f64 / 2.0,
            fit: FitMode::Contain,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Bounds and granularity of the zoom control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ZoomRange {
    /// Snap a raw slider value into range. `None` for NaN/infinite input.
    pub fn snap(&self, value: f64) -> Option<f64> {
        snap_to_step(value, self.min, self.max, self.step)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step: 0.01,
        }
    }
}

/// Resampling used to map source pixels onto canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
    Nearest,
    /// Bilinear interpolation, with a Triangle pre-shrink for heavy downscales.
    #[default]
    Bilinear,
}

/// Rectangle the image occupies on the canvas, in canvas pixels.
///
/// May extend past the canvas on any side, or lie entirely outside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether any part of the rectangle overlaps the canvas.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.right() > 0.0
            && self.bottom() > 0.0
            && self.left < CANVAS_WIDTH as f64
            && self.top < CANVAS_HEIGHT as f64
    }
}

/// The image layer of a composite: what to draw and where.
#[derive(Debug, Clone, Copy)]
pub struct ImageLayer<'a> {
    pub source: &'a SourceImage,
    pub placement: Placement,
}

/// Full description of one redraw.
#[derive(Debug, Clone, Copy)]
pub struct CompositeParams<'a> {
    pub background: Rgb,
    /// `None` draws the background alone.
    pub layer: Option<ImageLayer<'a>>,
    pub sampling: Sampling,
}
