//! The compositor: the single state object behind the canvas.
//!
//! It owns the loaded image, the view (zoom, center, fit mode), the
//! background color and the surface that was last drawn. Every mutating call
//! that changes what the canvas should show redraws the surface immediately,
//! so [`Compositor::surface`] is always what an export would write.
//!
//! ```text
//! Empty ──load ok──▶ Loaded ──drag / zoom / mode / color──▶ Loaded
//!   ▲                  │
//!   └──────clear───────┘          load failure: no state change
//! ```
//!
//! Operations that need an image (dragging, edge sampling) are silent
//! no-ops while empty, so every control is safe to use before loading.

use crate::imaging::{
    BackendError, Dimensions, ImageBackend, RustBackend, Sampling, SourceImage, ViewState,
    ZoomRange, blank_surface, export_file_name, render, sample_edge_background,
};
use crate::types::{ExportFormat, FitMode, Rgb};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The supplied bytes could not be decoded as an image.
#[derive(Error, Debug)]
#[error("could not decode image: {reason}")]
pub struct DecodeError {
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export failed: {0}")]
    Encode(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether an image is currently loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
}

/// Session-wide settings that are not part of the per-image view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositorSettings {
    pub zoom: ZoomRange,
    pub sampling: Sampling,
    /// Background color before the user picks one.
    pub background: Rgb,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            zoom: ZoomRange::default(),
            sampling: Sampling::default(),
            background: Rgb::WHITE,
        }
    }
}

pub struct Compositor<B = RustBackend> {
    backend: B,
    zoom: ZoomRange,
    sampling: Sampling,
    source: Option<SourceImage>,
    view: ViewState,
    background: Rgb,
    surface: RgbaImage,
}

impl Compositor<RustBackend> {
    pub fn new() -> Self {
        Self::with_settings(CompositorSettings::default())
    }

    pub fn with_settings(settings: CompositorSettings) -> Self {
        Self::with_backend(RustBackend::new(), settings)
    }
}

impl Default for Compositor<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend> Compositor<B> {
    pub fn with_backend(backend: B, settings: CompositorSettings) -> Self {
        Self {
            backend,
            zoom: settings.zoom,
            sampling: settings.sampling,
            source: None,
            view: ViewState::initial(),
            background: settings.background,
            surface: blank_surface(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.source {
            Some(_) => Phase::Loaded,
            None => Phase::Empty,
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom
    }

    /// The surface as last drawn.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Decode `bytes` and make them the current image.
    ///
    /// On success the view resets to unzoomed, centered, [`FitMode::Contain`]
    /// so the whole image is visible, and the canvas is redrawn. On failure
    /// nothing changes.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Dimensions, DecodeError> {
        let source = self.backend.decode(bytes).map_err(|e| {
            log::warn!("Rejected {} bytes: {}", bytes.len(), e);
            DecodeError {
                reason: e.to_string(),
            }
        })?;
        let dims = source.dimensions();
        log::info!("Loaded {}x{} image", dims.width, dims.height);

        self.source = Some(source);
        self.view = ViewState::initial();
        self.redraw();
        Ok(dims)
    }

    /// Render the current state without touching it.
    pub fn render(&self) -> RgbaImage {
        render(
            &self.backend,
            self.source.as_ref(),
            &self.view,
            self.background,
            self.sampling,
        )
    }

    pub fn redraw(&mut self) {
        self.surface = self.render();
    }

    /// Move the image by `(dx, dy)` canvas pixels. Unbounded; the image may
    /// leave the canvas entirely. Returns `false` (no-op) while empty.
    pub fn reposition(&mut self, dx: f64, dy: f64) -> bool {
        if self.source.is_none() {
            log::debug!("Ignoring reposition: no image loaded");
            return false;
        }
        self.view.center_x += dx;
        self.view.center_y += dy;
        self.redraw();
        true
    }

    /// Put the image center at an absolute canvas position. No-op while empty.
    pub fn move_center_to(&mut self, x: f64, y: f64) -> bool {
        if self.source.is_none() {
            return false;
        }
        self.view.center_x = x;
        self.view.center_y = y;
        self.redraw();
        true
    }

    /// Apply a zoom slider value, snapped to the zoom range.
    ///
    /// Non-finite values are ignored and return `false`.
    pub fn set_scale(&mut self, value: f64) -> bool {
        let Some(scale) = self.zoom.snap(value) else {
            log::warn!("Ignoring zoom value {value}");
            return false;
        };
        self.view.scale = scale;
        self.redraw();
        true
    }

    pub fn set_fit_mode(&mut self, fit: FitMode) {
        self.view.fit = fit;
        self.redraw();
    }

    pub fn set_background(&mut self, color: Rgb) {
        self.background = color;
        self.redraw();
    }

    /// Replace the background with the average edge color of the image.
    ///
    /// Returns the new color, or `None` (no-op) while empty.
    pub fn sample_edge_background(&mut self) -> Option<Rgb> {
        let color = sample_edge_background(self.source.as_ref()?);
        log::debug!("Edge-sampled background {color}");
        self.set_background(color);
        Some(color)
    }

    /// Encode the current surface.
    ///
    /// Works in every phase: an empty compositor exports whatever it last
    /// drew, a cleared one exports a blank canvas.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        Ok(self.backend.encode(&self.surface, format)?)
    }

    /// Export into `dir` under the conventional file name and return the path.
    pub fn export_to(&self, dir: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let bytes = self.export(format)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(format));
        std::fs::write(&path, &bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Drop the image and blank the canvas to transparent.
    ///
    /// View and background are kept; the next load resets the view.
    pub fn clear(&mut self) {
        self.source = None;
        self.surface = blank_surface();
        log::debug!("Cleared canvas");
    }
}
