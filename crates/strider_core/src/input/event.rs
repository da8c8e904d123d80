//! Raw input events and the hub that fans them out to listeners.
//!
//! The host (window event loop, gamepad poller) turns its native events into
//! [`InputEvent`]s and calls [`EventHub::dispatch`].  Controls subscribe at
//! construction time and keep the returned [`Subscription`] handles; dropping
//! a handle unsubscribes.  Everything is single-threaded (`Rc`/`RefCell`),
//! matching the frame loop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::gamepad::GamepadSnapshot;
use super::{KeyCode, MouseButton};

/// A device event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Relative pointer motion in device units since the previous sample.
    MouseMove { dx: f32, dy: f32 },
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    ContextMenu,
    GamepadConnected(GamepadSnapshot),
    GamepadDisconnected { index: u32, id: String },
    /// Fresh axis/button readings for an already connected pad.
    GamepadState(GamepadSnapshot),
}

/// Discriminant of [`InputEvent`], used to pick listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    MouseMove,
    MouseDown,
    MouseUp,
    ContextMenu,
    GamepadConnected,
    GamepadDisconnected,
    GamepadState,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::MouseMove { .. } => EventKind::MouseMove,
            InputEvent::MouseDown(_) => EventKind::MouseDown,
            InputEvent::MouseUp(_) => EventKind::MouseUp,
            InputEvent::ContextMenu => EventKind::ContextMenu,
            InputEvent::GamepadConnected(_) => EventKind::GamepadConnected,
            InputEvent::GamepadDisconnected { .. } => EventKind::GamepadDisconnected,
            InputEvent::GamepadState(_) => EventKind::GamepadState,
        }
    }
}

/// What a listener wants the host to do with the event afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// Suppress the host's default handling (context menu, text selection…).
    PreventDefault,
}

type Listener = Rc<RefCell<dyn FnMut(&InputEvent) -> Flow>>;

struct Entry {
    id: u64,
    kind: EventKind,
    listener: Listener,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Shared dispatcher for [`InputEvent`]s.
///
/// Cloning yields another handle to the same hub.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`.
    ///
    /// The listener stays registered for as long as the returned handle
    /// lives (or until [`Subscription::release`] is called).
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&InputEvent) -> Flow + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry {
            id,
            kind,
            listener: Rc::new(RefCell::new(listener)),
        });
        Subscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver `event` to every listener registered for its kind, in
    /// subscription order.
    ///
    /// Returns [`Flow::PreventDefault`] if any listener asked for it.
    pub fn dispatch(&self, event: &InputEvent) -> Flow {
        let kind = event.kind();
        // snapshot the listeners so callbacks may (un)subscribe freely
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.listener.clone())
            .collect();

        let mut flow = Flow::Continue;
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut f) => {
                    if (&mut *f)(event) == Flow::PreventDefault {
                        flow = Flow::PreventDefault;
                    }
                }
                Err(_) => log::warn!("re-entrant {kind:?} dispatch skipped"),
            }
        }
        flow
    }

    /// Number of live listeners across all kinds.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    fn remove(inner: &RefCell<HubInner>, id: u64) {
        inner.borrow_mut().entries.retain(|e| e.id != id);
    }
}

/// Handle to a registered listener.  Unsubscribes on drop.
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Subscription {
    /// Unsubscribe now.  Equivalent to dropping the handle.
    pub fn release(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            EventHub::remove(&inner, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispatch_reaches_matching_kind_only() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = hub.subscribe(EventKind::ContextMenu, move |_| {
            h.set(h.get() + 1);
            Flow::PreventDefault
        });

        assert_eq!(hub.dispatch(&InputEvent::ContextMenu), Flow::PreventDefault);
        assert_eq!(
            hub.dispatch(&InputEvent::MouseMove { dx: 1.0, dy: 0.0 }),
            Flow::Continue
        );
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = hub.subscribe(EventKind::KeyDown, move |_| {
            h.set(h.get() + 1);
            Flow::Continue
        });
        assert_eq!(hub.listener_count(), 1);

        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));
        sub.release();
        hub.dispatch(&InputEvent::KeyDown(KeyCode::KeyW));

        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let sub = {
            let hub = EventHub::new();
            hub.subscribe(EventKind::KeyUp, |_| Flow::Continue)
        };
        drop(sub);
    }
}
