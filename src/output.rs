//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Compose
//!
//! ```text
//! Source 2000x1000
//!     Fit: contain at 1.00x
//!     Placed: 1080x540 at (0, 405)
//!     Background: #ffffff
//! Wrote out/instagram-1080x1350.png (48213 bytes)
//! ```

use crate::compositor::Compositor;
use crate::imaging::{ImageBackend, Placement, plan_placement};
use crate::types::{FitMode, Rgb};
use std::path::PathBuf;

/// Everything worth reporting after a compose run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeReport {
    pub source: Option<(u32, u32)>,
    pub fit: FitMode,
    pub scale: f64,
    pub placement: Option<Placement>,
    pub background: Rgb,
    pub output: PathBuf,
    pub bytes: u64,
}

impl ComposeReport {
    /// Snapshot the compositor after an export to `output`.
    pub fn from_compositor<B: ImageBackend>(
        compositor: &Compositor<B>,
        output: PathBuf,
        bytes: u64,
    ) -> Self {
        let view = compositor.view();
        Self {
            source: compositor.source().map(|s| (s.width(), s.height())),
            fit: view.fit,
            scale: view.scale,
            placement: compositor.source().map(|s| plan_placement(s, view)),
            background: compositor.background(),
            output,
            bytes,
        }
    }
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Round to a whole pixel, folding `-0` into `0`.
fn whole(v: f64) -> f64 {
    v.round() + 0.0
}

/// Format a placement rectangle rounded to whole pixels.
fn placement_line(p: &Placement) -> String {
    format!(
        "Placed: {}x{} at ({}, {})",
        whole(p.width),
        whole(p.height),
        whole(p.left),
        whole(p.top)
    )
}

pub fn format_compose_report(report: &ComposeReport) -> Vec<String> {
    let mut lines = Vec::new();
    match report.source {
        Some((w, h)) => lines.push(format!("Source {w}x{h}")),
        None => lines.push("No image loaded".to_string()),
    }
    lines.push(format!(
        "{}Fit: {} at {:.2}x",
        indent(1),
        report.fit,
        report.scale
    ));
    if let Some(p) = &report.placement {
        lines.push(format!("{}{}", indent(1), placement_line(p)));
    }
    lines.push(format!("{}Background: {}", indent(1), report.background));
    lines.push(format!(
        "Wrote {} ({} bytes)",
        report.output.display(),
        report.bytes
    ));
    lines
}

pub fn print_compose_report(report: &ComposeReport) {
    for line in format_compose_report(report) {
        println!("{}", line);
    }
}

pub fn format_sample(color: Rgb) -> Vec<String> {
    vec![color.to_hex()]
}

pub fn print_sample(color: Rgb) {
    for line in format_sample(color) {
        println!("{}", line);
    }
}
