//! Input aggregation: raw keyboard, mouse and gamepad events in, normalized
//! per-axis intents out.
//!
//! [`InputAggregator`] subscribes to an [`EventHub`] when it is created and
//! keeps the subscription handles until [`InputAggregator::dispose`] (or
//! drop).  Events only ever *write* intent; reading and clearing happens
//! from the frame update.
//!
//! # Example
//! ```rust,ignore
//! use std::rc::Rc;
//! use strider_core::input::{EventHub, InputAggregator, InputEvent, KeyCode, VirtualSurface};
//!
//! let hub = EventHub::new();
//! let input = InputAggregator::new(&hub, Rc::new(VirtualSurface::new()));
//! hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
//! assert_eq!(input.movement().z.value(), -1.0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

// re-export the winit key and mouse enums so callers don't need a direct
// winit dependency just to name a key
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

pub mod bindings;
pub mod event;
pub mod gamepad;
pub mod surface;

pub use bindings::{AxisBinding, AxisIntent, Direction, KeyBindings, LookIntent, MovementIntent};
pub use event::{EventHub, EventKind, Flow, InputEvent, Subscription};
pub use gamepad::{GamepadLayout, GamepadRegistry, GamepadSample, GamepadSnapshot};
pub use surface::{PointerSurface, VirtualSurface};

use crate::error::ControlError;

/// Intent fields written by event listeners.
#[derive(Debug, Default)]
struct IntentState {
    keys: KeyBindings,
    movement: MovementIntent,
    look: LookIntent,
    gamepads: GamepadRegistry,
}

impl IntentState {
    fn key_down(&mut self, key: KeyCode) {
        if let Some(binding) = self.keys.get(key) {
            *self.movement.axis_mut(binding.axis) = AxisIntent::Key(binding.direction);
        }
    }

    // Releasing either key of an opposed pair idles the whole axis, even if
    // the other key is still held.
    fn key_up(&mut self, key: KeyCode) {
        if let Some(binding) = self.keys.get(key) {
            *self.movement.axis_mut(binding.axis) = AxisIntent::Idle;
        }
    }

    fn mouse_move(&mut self, dx: f32, dy: f32) {
        self.look.mouse_x += dx;
        self.look.mouse_y += dy;
    }

    fn gamepad_connected(&mut self, snapshot: &GamepadSnapshot) {
        log::debug!(
            "gamepad connected at index {}: {}. {} buttons, {} axes.",
            snapshot.index,
            snapshot.id,
            snapshot.buttons.len(),
            snapshot.axes.len()
        );
        self.gamepads.connect(snapshot.clone());
    }

    fn gamepad_disconnected(&mut self, index: u32, id: &str) {
        if self.gamepads.disconnect(index) {
            log::info!("gamepad disconnected from index {index}: {id}");
        }
    }
}

fn request_capture(surface: &dyn PointerSurface) -> Flow {
    if surface.has_pointer_capture() {
        log::debug!("surface already holds the pointer capture");
    } else {
        log::debug!("surface has no pointer capture yet, requesting");
        surface.request_pointer_capture();
    }
    Flow::PreventDefault
}

/// Turns device events into movement and look intent.
pub struct InputAggregator {
    state: Rc<RefCell<IntentState>>,
    surface: Rc<dyn PointerSurface>,
    subscriptions: Vec<Subscription>,
    /// Raw pad index mapping and analog filtering.
    pub gamepad_layout: GamepadLayout,
}

impl InputAggregator {
    /// Subscribe to `hub` with the default key layout.
    pub fn new(hub: &EventHub, surface: Rc<dyn PointerSurface>) -> Self {
        Self::with_bindings(hub, surface, KeyBindings::with_default_layout())
    }

    /// Subscribe to `hub` with a custom key table.
    pub fn with_bindings(hub: &EventHub, surface: Rc<dyn PointerSurface>, keys: KeyBindings) -> Self {
        let state = Rc::new(RefCell::new(IntentState {
            keys,
            ..Default::default()
        }));
        let mut input = Self {
            state,
            surface,
            subscriptions: Vec::with_capacity(9),
            gamepad_layout: GamepadLayout::default(),
        };
        input.subscribe_all(hub);
        input
    }

    fn subscribe_all(&mut self, hub: &EventHub) {
        let s = self.state.clone();
        self.subscriptions.push(hub.subscribe(EventKind::KeyDown, move |e| {
            if let InputEvent::KeyDown(key) = e {
                s.borrow_mut().key_down(*key);
            }
            Flow::Continue
        }));

        let s = self.state.clone();
        self.subscriptions.push(hub.subscribe(EventKind::KeyUp, move |e| {
            if let InputEvent::KeyUp(key) = e {
                s.borrow_mut().key_up(*key);
            }
            Flow::Continue
        }));

        let s = self.state.clone();
        self.subscriptions.push(hub.subscribe(EventKind::MouseMove, move |e| {
            if let InputEvent::MouseMove { dx, dy } = e {
                s.borrow_mut().mouse_move(*dx, *dy);
            }
            Flow::Continue
        }));

        let surface = self.surface.clone();
        self.subscriptions.push(
            hub.subscribe(EventKind::MouseDown, move |_| request_capture(surface.as_ref())),
        );
        self.subscriptions
            .push(hub.subscribe(EventKind::MouseUp, |_| Flow::PreventDefault));
        self.subscriptions
            .push(hub.subscribe(EventKind::ContextMenu, |_| Flow::PreventDefault));

        let s = self.state.clone();
        self.subscriptions.push(hub.subscribe(EventKind::GamepadConnected, move |e| {
            if let InputEvent::GamepadConnected(snapshot) = e {
                s.borrow_mut().gamepad_connected(snapshot);
            }
            Flow::Continue
        }));

        let s = self.state.clone();
        self.subscriptions.push(hub.subscribe(EventKind::GamepadDisconnected, move |e| {
            if let InputEvent::GamepadDisconnected { index, id } = e {
                s.borrow_mut().gamepad_disconnected(*index, id);
            }
            Flow::Continue
        }));

        let s = self.state.clone();
        self.subscriptions.push(hub.subscribe(EventKind::GamepadState, move |e| {
            if let InputEvent::GamepadState(snapshot) = e {
                s.borrow_mut().gamepads.refresh(snapshot.clone());
            }
            Flow::Continue
        }));
    }

    // ── Event entry points ─────────────────────────────────────────────────
    // The hub listeners call the same code; these exist for hosts that
    // prefer to feed the aggregator directly.

    pub fn on_key_down(&self, key: KeyCode) {
        self.state.borrow_mut().key_down(key);
    }

    pub fn on_key_up(&self, key: KeyCode) {
        self.state.borrow_mut().key_up(key);
    }

    /// Record relative pointer motion.  Samples arriving between two frames
    /// add up; the frame update consumes the total once.
    pub fn on_mouse_move(&self, dx: f32, dy: f32) {
        self.state.borrow_mut().mouse_move(dx, dy);
    }

    /// Request pointer capture unless it is already held.
    pub fn on_mouse_down(&self) -> Flow {
        request_capture(self.surface.as_ref())
    }

    pub fn on_gamepad_connected(&self, snapshot: GamepadSnapshot) {
        self.state.borrow_mut().gamepad_connected(&snapshot);
    }

    pub fn on_gamepad_disconnected(&self, index: u32, id: &str) {
        self.state.borrow_mut().gamepad_disconnected(index, id);
    }

    pub fn on_gamepad_state(&self, snapshot: GamepadSnapshot) {
        self.state.borrow_mut().gamepads.refresh(snapshot);
    }

    // ── Frame-side access ──────────────────────────────────────────────────

    /// Sample the first registered pad, if any.
    pub fn poll_first_gamepad(&self) -> Result<Option<GamepadSample>, ControlError> {
        let state = self.state.borrow();
        state
            .gamepads
            .first()
            .map(|snapshot| self.gamepad_layout.sample(snapshot))
            .transpose()
    }

    /// Poll the first pad and let it own the movement axes and pad look
    /// fields for this frame.  Returns whether a pad was present.
    ///
    /// On a malformed snapshot nothing is written.
    pub fn merge_first_gamepad(&self) -> Result<bool, ControlError> {
        let Some(sample) = self.poll_first_gamepad()? else {
            return Ok(false);
        };
        let mut state = self.state.borrow_mut();
        // already dead-zoned; `stick` only maps exact zeros to Idle
        state.movement.x = AxisIntent::stick(sample.move_x, 0.0);
        state.movement.y = AxisIntent::stick(sample.move_y, 0.0);
        state.movement.z = AxisIntent::stick(sample.move_z, 0.0);
        state.look.pad_x = sample.look_x;
        state.look.pad_y = sample.look_y;
        Ok(true)
    }

    pub fn movement(&self) -> MovementIntent {
        self.state.borrow().movement
    }

    pub fn look(&self) -> LookIntent {
        self.state.borrow().look
    }

    /// Zero the one-shot mouse fields.
    pub fn clear_mouse_delta(&self) {
        let mut state = self.state.borrow_mut();
        state.look.mouse_x = 0.0;
        state.look.mouse_y = 0.0;
    }

    /// Replace the key table.  Axes currently held keep their intent until
    /// the next key event.
    pub fn set_key_bindings(&self, keys: KeyBindings) {
        self.state.borrow_mut().keys = keys;
    }

    pub fn gamepad_count(&self) -> usize {
        self.state.borrow().gamepads.len()
    }

    pub fn surface(&self) -> &Rc<dyn PointerSurface> {
        &self.surface
    }

    // ── Teardown ───────────────────────────────────────────────────────────

    /// Unsubscribe from every event source.  Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.subscriptions.is_empty() {
            log::debug!("releasing {} input subscriptions", self.subscriptions.len());
            self.subscriptions.clear();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl Drop for InputAggregator {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (EventHub, Rc<VirtualSurface>, InputAggregator) {
        let hub = EventHub::new();
        let surface = Rc::new(VirtualSurface::new());
        let input = InputAggregator::new(&hub, surface.clone());
        (hub, surface, input)
    }

    fn pad(index: u32, axes: [f32; 5]) -> GamepadSnapshot {
        GamepadSnapshot::new(index, "test pad", axes.to_vec(), vec![false; 12])
    }

    #[test]
    fn keys_drive_axes() {
        let (hub, _, input) = setup();
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyD));
        hub.dispatch(&InputEvent::KeyDown(KeyCode::Space));
        assert_eq!(input.movement().as_vec3(), glam::Vec3::new(1.0, 1.0, -1.0));

        hub.dispatch(&InputEvent::KeyUp(KeyCode::KeyD));
        assert_eq!(input.movement().x, AxisIntent::Idle);
        // unbound keys are ignored
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyZ));
        assert_eq!(input.movement().as_vec3(), glam::Vec3::new(0.0, 1.0, -1.0));
    }

    #[test]
    fn releasing_opposite_key_idles_axis() {
        let (hub, _, input) = setup();
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyS));
        assert_eq!(input.movement().z.value(), 1.0);
        // S released while W is still physically held: last key-up wins
        hub.dispatch(&InputEvent::KeyUp(KeyCode::KeyS));
        assert_eq!(input.movement().z, AxisIntent::Idle);
    }

    #[test]
    fn mouse_motion_accumulates_until_cleared() {
        let (hub, _, input) = setup();
        hub.dispatch(&InputEvent::MouseMove { dx: 3.0, dy: -1.0 });
        hub.dispatch(&InputEvent::MouseMove { dx: 2.0, dy: 0.5 });
        assert_eq!(input.look().mouse_x, 5.0);
        assert_eq!(input.look().mouse_y, -0.5);
        input.clear_mouse_delta();
        assert_eq!(input.look(), LookIntent::default());
    }

    #[test]
    fn mouse_down_requests_capture_once() {
        let (hub, surface, _input) = setup();
        let flow = hub.dispatch(&InputEvent::MouseDown(MouseButton::Left));
        assert_eq!(flow, Flow::PreventDefault);
        hub.dispatch(&InputEvent::MouseDown(MouseButton::Left));
        assert_eq!(surface.capture_requests(), 1);
        assert!(surface.has_pointer_capture());
        assert_eq!(hub.dispatch(&InputEvent::ContextMenu), Flow::PreventDefault);
    }

    #[test]
    fn gamepad_overrides_keyboard_movement() {
        let (hub, _, input) = setup();
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyA));
        assert!(!input.merge_first_gamepad().unwrap());
        assert_eq!(input.movement().x.value(), -1.0);

        hub.dispatch(&InputEvent::GamepadConnected(pad(0, [0.5, 0.02, 0.0, 0.0, 0.0])));
        assert!(input.merge_first_gamepad().unwrap());
        let m = input.movement();
        assert_eq!(m.x, AxisIntent::Stick(0.5));
        assert_eq!(m.z, AxisIntent::Idle);
        assert_eq!(m.y, AxisIntent::Idle);
    }

    #[test]
    fn gamepad_state_updates_are_level_valued() {
        let (hub, _, input) = setup();
        hub.dispatch(&InputEvent::GamepadConnected(pad(1, [0.0; 5])));
        hub.dispatch(&InputEvent::GamepadState(pad(1, [0.0, 0.0, 0.0, 1.0, 0.0])));
        input.merge_first_gamepad().unwrap();
        assert_eq!(input.look().pad_x, -1.0);

        hub.dispatch(&InputEvent::GamepadState(pad(1, [0.0; 5])));
        input.merge_first_gamepad().unwrap();
        assert_eq!(input.look().pad_x, 0.0);

        hub.dispatch(&InputEvent::GamepadDisconnected { index: 1, id: "test pad".into() });
        assert_eq!(input.gamepad_count(), 0);
        assert!(input.poll_first_gamepad().unwrap().is_none());
    }

    #[test]
    fn malformed_pad_writes_nothing() {
        let (hub, _, input) = setup();
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        hub.dispatch(&InputEvent::GamepadConnected(GamepadSnapshot::new(
            0,
            "broken",
            vec![0.3],
            vec![],
        )));
        assert!(input.merge_first_gamepad().is_err());
        assert_eq!(input.movement().z.value(), -1.0);
    }

    #[test]
    fn dispose_detaches_and_is_idempotent() {
        let (hub, _, mut input) = setup();
        assert_eq!(hub.listener_count(), 9);
        input.dispose();
        input.dispose();
        assert!(input.is_disposed());
        assert_eq!(hub.listener_count(), 0);

        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        hub.dispatch(&InputEvent::MouseMove { dx: 4.0, dy: 4.0 });
        assert_eq!(input.movement(), MovementIntent::default());
        assert_eq!(input.look(), LookIntent::default());
    }

    #[test]
    fn drop_releases_listeners() {
        let hub = EventHub::new();
        {
            let _input = InputAggregator::new(&hub, Rc::new(VirtualSurface::new()));
            assert_eq!(hub.listener_count(), 9);
        }
        assert_eq!(hub.listener_count(), 0);
    }
}
