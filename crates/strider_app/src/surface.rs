use std::cell::Cell;
use std::sync::Arc;

use strider_core::PointerSurface;
use winit::window::{CursorGrabMode, Window};

/// Pointer capture on a winit window.
///
/// Platforms differ in which grab modes they support: macOS only locks,
/// Windows only confines.  Locking is tried first.
pub struct WindowSurface {
    window: Arc<Window>,
    captured: Cell<bool>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            captured: Cell::new(false),
        }
    }
}

impl PointerSurface for WindowSurface {
    fn has_pointer_capture(&self) -> bool {
        self.captured.get()
    }

    fn request_pointer_capture(&self) {
        let grab = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grab {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.captured.set(true);
            }
            Err(err) => log::warn!("pointer capture refused: {err}"),
        }
    }

    fn release_pointer_capture(&self) {
        if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("failed to release pointer capture: {err}");
        }
        self.window.set_cursor_visible(true);
        self.captured.set(false);
    }
}
