use std::cell::Cell;

/// The display surface the pointer can be locked to.
///
/// Implementations use interior mutability: windowing APIs grab the cursor
/// through shared references, and listeners only hold an `Rc` to the
/// surface.
pub trait PointerSurface {
    /// Whether this surface currently holds exclusive pointer capture.
    fn has_pointer_capture(&self) -> bool;

    /// Ask for exclusive capture.  The grant may arrive later; hosts poll
    /// `has_pointer_capture` once per frame to notice it.
    fn request_pointer_capture(&self);

    /// Give capture back.
    fn release_pointer_capture(&self);
}

/// In-memory surface that grants every request immediately.
///
/// Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct VirtualSurface {
    captured: Cell<bool>,
    requests: Cell<u32>,
}

impl VirtualSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times capture was requested.
    pub fn capture_requests(&self) -> u32 {
        self.requests.get()
    }
}

impl PointerSurface for VirtualSurface {
    fn has_pointer_capture(&self) -> bool {
        self.captured.get()
    }

    fn request_pointer_capture(&self) {
        self.requests.set(self.requests.get() + 1);
        self.captured.set(true);
    }

    fn release_pointer_capture(&self) {
        self.captured.set(false);
    }
}
