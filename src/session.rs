//! Input adapters: discrete UI events driving the [`Compositor`].
//!
//! A [`Session`] owns the compositor and the pointer-drag state. Every event
//! is handled synchronously through `&mut self`, so there is exactly one
//! writer and no locking. Handlers are thin: they translate the event into
//! compositor calls and report what happened.
//!
//! Drag is an explicit two-state machine:
//!
//! ```text
//! Idle ──PointerDown (image loaded)──▶ Dragging { anchor }
//!   ▲                                      │ PointerMove → center = pointer − anchor
//!   └──────── PointerUp / PointerLeave ────┘
//! ```

use crate::compositor::{Compositor, DecodeError, ExportError};
use crate::imaging::{ImageBackend, RustBackend, export_file_name};
use crate::types::{ExportFormat, FitMode, Rgb};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One entry of a clipboard paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.contains("image")
    }
}

/// Everything the user can do to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// File chooser closed; `None` when nothing was picked.
    FilePicked(Option<Vec<u8>>),
    /// Files dropped on the canvas; only the first one is used.
    Dropped(Vec<Vec<u8>>),
    /// Clipboard paste; every image item is loaded in order.
    Pasted(Vec<ClipboardItem>),
    ZoomInput(f64),
    FitModeSelected(FitMode),
    BackgroundPicked(Rgb),
    /// The "auto background" button.
    AutoBackground,
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    Clear,
    Export(ExportFormat),
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and the canvas was redrawn.
    Redrawn,
    /// Nothing visible changed.
    Unchanged,
    /// Encoded canvas, ready to be saved under `file_name`.
    Exported { file_name: String, bytes: Vec<u8> },
}

/// Pointer-drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Offset from the image center to the pointer when the drag began.
    Dragging { anchor_x: f64, anchor_y: f64 },
}

pub struct Session<B = RustBackend> {
    compositor: Compositor<B>,
    drag: DragState,
}

impl<B: ImageBackend> Session<B> {
    pub fn new(compositor: Compositor<B>) -> Self {
        Self {
            compositor,
            drag: DragState::Idle,
        }
    }

    pub fn compositor(&self) -> &Compositor<B> {
        &self.compositor
    }

    /// Exclusive handle for callers that drive the compositor directly.
    pub fn compositor_mut(&mut self) -> &mut Compositor<B> {
        &mut self.compositor
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn into_compositor(self) -> Compositor<B> {
        self.compositor
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<Outcome, SessionError> {
        match event {
            InputEvent::FilePicked(None) => Ok(Outcome::Unchanged),
            InputEvent::FilePicked(Some(bytes)) => self.load(&bytes),
            InputEvent::Dropped(files) => match files.first() {
                Some(bytes) => self.load(bytes),
                None => Ok(Outcome::Unchanged),
            },
            InputEvent::Pasted(items) => self.paste(&items),
            InputEvent::ZoomInput(value) => Ok(redrawn_if(self.compositor.set_scale(value))),
            InputEvent::FitModeSelected(fit) => {
                self.compositor.set_fit_mode(fit);
                Ok(Outcome::Redrawn)
            }
            InputEvent::BackgroundPicked(color) => {
                self.compositor.set_background(color);
                Ok(Outcome::Redrawn)
            }
            InputEvent::AutoBackground => Ok(redrawn_if(
                self.compositor.sample_edge_background().is_some(),
            )),
            InputEvent::PointerDown { x, y } => {
                self.begin_drag(x, y);
                Ok(Outcome::Unchanged)
            }
            InputEvent::PointerMove { x, y } => Ok(redrawn_if(self.drag_to(x, y))),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.drag = DragState::Idle;
                Ok(Outcome::Unchanged)
            }
            InputEvent::Clear => {
                self.drag = DragState::Idle;
                self.compositor.clear();
                Ok(Outcome::Redrawn)
            }
            InputEvent::Export(format) => Ok(Outcome::Exported {
                file_name: export_file_name(format),
                bytes: self.compositor.export(format)?,
            }),
        }
    }

    fn load(&mut self, bytes: &[u8]) -> Result<Outcome, SessionError> {
        self.compositor.load_image(bytes)?;
        self.drag = DragState::Idle;
        Ok(Outcome::Redrawn)
    }

    /// Load every image item in paste order. The last one that decodes wins;
    /// if none decode, the last error is returned.
    fn paste(&mut self, items: &[ClipboardItem]) -> Result<Outcome, SessionError> {
        let mut loaded = false;
        let mut last_err = None;
        for item in items {
            if !item.is_image() {
                log::debug!("Skipping pasted {} item", item.mime_type);
                continue;
            }
            match self.load(&item.bytes) {
                Ok(_) => loaded = true,
                Err(e) => last_err = Some(e),
            }
        }
        match (loaded, last_err) {
            (true, _) | (false, None) => Ok(redrawn_if(loaded)),
            (false, Some(e)) => Err(e),
        }
    }

    fn begin_drag(&mut self, x: f64, y: f64) {
        if self.compositor.source().is_none() {
            return;
        }
        let (cx, cy) = self.compositor.view().center();
        self.drag = DragState::Dragging {
            anchor_x: x - cx,
            anchor_y: y - cy,
        };
    }

    fn drag_to(&mut self, x: f64, y: f64) -> bool {
        match self.drag {
            DragState::Idle => false,
            DragState::Dragging { anchor_x, anchor_y } => {
                self.compositor.move_center_to(x - anchor_x, y - anchor_y)
            }
        }
    }
}

impl Session<RustBackend> {
    pub fn with_defaults() -> Self {
        Self::new(Compositor::new())
    }
}

fn redrawn_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Redrawn
    } else {
        Outcome::Unchanged
    }
}
