//! Canvas imaging in pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader::with_guessed_format` |
//! | **Fit math** | pure functions in `calculations` |
//! | **Composite** | inverse-mapped sampling, rows in parallel via `rayon` |
//! | **Edge color** | border walk + rounded channel mean |
//! | **Encode** | PNG (RGBA) / JPEG quality 100 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit and slider math (unit testable)
//! - **Parameters**: Data structures describing a redraw
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, SourceImage};
pub use calculations::{display_dimensions, snap_to_step};
pub use operations::{
    blank_surface, export_file_name, plan_composite, plan_placement, render,
    sample_edge_background,
};
pub use params::{CompositeParams, ImageLayer, Placement, Sampling, ViewState, ZoomRange};
pub use rust_backend::RustBackend;
