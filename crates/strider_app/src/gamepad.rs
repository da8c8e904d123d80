use anyhow::{anyhow, Result};
use gilrs::{Axis, Button, EventType, Gamepad, Gilrs};
use strider_core::input::{EventHub, GamepadSnapshot, InputEvent};

// Snapshot order of the axes: left stick, left trigger, right stick.
const AXES: [Axis; 5] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::LeftZ,
    Axis::RightStickX,
    Axis::RightStickY,
];

// Standard gamepad button order.
const BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// Pads that were plugged in before the backend started.
///
/// Some backends enumerate those without queuing a connect event, so they
/// are announced once on the first poll.
#[derive(Debug, Default)]
struct StartupPads {
    announced: bool,
}

impl StartupPads {
    fn announce(&mut self, hub: &EventHub, pads: impl IntoIterator<Item = GamepadSnapshot>) {
        if self.announced {
            return;
        }
        self.announced = true;
        for pad in pads {
            hub.dispatch(&InputEvent::GamepadConnected(pad));
        }
    }
}

/// Reads physical pads through gilrs and republishes them as hub events.
pub struct GamepadPoller {
    gilrs: Gilrs,
    startup: StartupPads,
}

impl GamepadPoller {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|err| anyhow!("gamepad backend unavailable: {err}"))?;
        Ok(Self {
            gilrs,
            startup: StartupPads::default(),
        })
    }

    /// Drain pending connection events, then publish a state snapshot for
    /// every connected pad.
    pub fn poll(&mut self, hub: &EventHub) {
        self.startup
            .announce(hub, self.gilrs.gamepads().map(|(_, pad)| snapshot(&pad)));

        while let Some(event) = self.gilrs.next_event() {
            let pad = self.gilrs.gamepad(event.id);
            match event.event {
                EventType::Connected => {
                    hub.dispatch(&InputEvent::GamepadConnected(snapshot(&pad)));
                }
                EventType::Disconnected => {
                    hub.dispatch(&InputEvent::GamepadDisconnected {
                        index: pad_index(&pad),
                        id: pad.name().to_string(),
                    });
                }
                _ => {}
            }
        }

        for (_, pad) in self.gilrs.gamepads() {
            hub.dispatch(&InputEvent::GamepadState(snapshot(&pad)));
        }
    }
}

fn pad_index(pad: &Gamepad<'_>) -> u32 {
    usize::from(pad.id()) as u32
}

// gilrs reports stick Y up-positive; snapshots use screen convention
fn snapshot(pad: &Gamepad<'_>) -> GamepadSnapshot {
    let axes = AXES
        .iter()
        .map(|&axis| {
            let v = pad.value(axis);
            match axis {
                Axis::LeftStickY | Axis::RightStickY => -v,
                _ => v,
            }
        })
        .collect();
    let buttons = BUTTONS.iter().map(|&button| pad.is_pressed(button)).collect();
    GamepadSnapshot::new(pad_index(pad), pad.name(), axes, buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use strider_core::input::{InputAggregator, VirtualSurface};

    fn pad(index: u32, look_x: f32) -> GamepadSnapshot {
        GamepadSnapshot::new(index, "pad", vec![0.0, 0.0, 0.0, look_x, 0.0], vec![false; 17])
    }

    #[test]
    fn pads_present_at_startup_are_registered() {
        let hub = EventHub::new();
        let input = InputAggregator::new(&hub, Rc::new(VirtualSurface::new()));
        let mut startup = StartupPads::default();

        startup.announce(&hub, vec![pad(0, 0.0)]);
        assert_eq!(input.gamepad_count(), 1);

        // state updates for the announced pad now land
        hub.dispatch(&InputEvent::GamepadState(pad(0, 1.0)));
        input.merge_first_gamepad().unwrap();
        assert_eq!(input.look().pad_x, -1.0);
    }

    #[test]
    fn startup_announcement_happens_once() {
        let hub = EventHub::new();
        let input = InputAggregator::new(&hub, Rc::new(VirtualSurface::new()));
        let mut startup = StartupPads::default();

        startup.announce(&hub, vec![pad(0, 0.0)]);
        hub.dispatch(&InputEvent::GamepadDisconnected { index: 0, id: "pad".into() });
        startup.announce(&hub, vec![pad(0, 0.0)]);
        assert_eq!(input.gamepad_count(), 0);
    }
}
