//! # instafit
//!
//! Fit a single photo onto a fixed 1080×1350 portrait canvas, nudge and zoom
//! it, fill the margins with a background color, and export the result as
//! `instagram-1080x1350.png` or `.jpg`.
//!
//! # Architecture
//!
//! One state object and a thin layer of input adapters around it:
//!
//! ```text
//! InputEvent ──▶ Session ──&mut──▶ Compositor ──▶ ImageBackend
//!  (file, drop,   (drag state)     (image, view,   (decode, composite,
//!   paste, zoom,                    background,     encode)
//!   pointer, …)                     surface)
//! ```
//!
//! The surface is a deterministic function of (image, view, background):
//! every control that changes one of those redraws immediately, and
//! [`Compositor::render`] can be called any number of times without side
//! effects.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compositor`] | The canvas state object: load, render, reposition, sample, export, clear |
//! | [`session`] | Input adapters: file pick, drop, paste, controls, pointer drag |
//! | [`imaging`] | Fit math, redraw parameters, the `image`-crate backend |
//! | [`config`] | `instafit.toml` loading, validation and merging |
//! | [`types`] | Shared value types (`Rgb`, `FitMode`, `ExportFormat`) and canvas constants |
//! | [`output`] | CLI output formatting |
//!
//! # Fit Modes
//!
//! | Mode | Display size |
//! |------|--------------|
//! | `none` | intrinsic size × zoom |
//! | `cover` | `max(W/iw, H/ih)` × zoom; fills the canvas, crops overflow |
//! | `contain` | `min(W/iw, H/ih)` × zoom; whole image visible, margins filled |
//!
//! A freshly loaded image always starts in `contain` at zoom 1, centered.
//!
//! # Edge-Sampled Background
//!
//! [`Compositor::sample_edge_background`] averages the outermost rows and
//! columns of the image. Corner pixels are visited by both the row and the
//! column pass and therefore weigh double.

pub mod compositor;
pub mod config;
pub mod imaging;
pub mod output;
pub mod session;
pub mod types;

pub use compositor::{Compositor, CompositorSettings, DecodeError, ExportError, Phase};
pub use session::{ClipboardItem, DragState, InputEvent, Outcome, Session, SessionError};
pub use types::{CANVAS_HEIGHT, CANVAS_WIDTH, ExportFormat, FitMode, Rgb};

#[cfg(test)]
pub(crate) mod test_helpers;
