use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use strider_core::TimeClock;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::config::StriderConfig;
use crate::session::Session;
use crate::surface::WindowSurface;

struct Runner {
    config: StriderConfig,
    window: Option<Arc<Window>>,
    session: Option<Session>,
    clock: TimeClock,
    #[cfg(feature = "gamepad")]
    gamepads: Option<crate::gamepad::GamepadPoller>,
}

impl Runner {
    fn new(config: StriderConfig) -> Self {
        Self {
            config,
            window: None,
            session: None,
            clock: TimeClock::new(),
            #[cfg(feature = "gamepad")]
            gamepads: match crate::gamepad::GamepadPoller::new() {
                Ok(poller) => Some(poller),
                Err(err) => {
                    log::warn!("{err:#}");
                    None
                }
            },
        }
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let surface = Rc::new(WindowSurface::new(window.clone()));
        let session = Session::new(&self.config, surface);
        log::info!(
            "viewer ready: press {:?} to fly, click to capture the pointer",
            session.switch.toggle_key
        );

        self.window = Some(window);
        self.session = Some(session);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &mut self.session {
            session.focus_lost();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(session) = &mut self.session else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                session.dispose();
                event_loop.exit();
            }
            WindowEvent::Focused(false) => session.focus_lost(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => session.key(code, state == ElementState::Pressed),
            WindowEvent::MouseInput { state, button, .. } => {
                session.mouse_button(button, state == ElementState::Pressed)
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        // raw motion keeps arriving while the cursor is locked in place
        if let (DeviceEvent::MouseMotion { delta: (dx, dy) }, Some(session)) = (event, &mut self.session) {
            session.mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let (Some(session), Some(window)) = (&mut self.session, &self.window) else {
            return;
        };

        let time = self.clock.tick();
        log::trace!(
            "frame {} at {:.2}s ({:.0} fps)",
            time.frame_count,
            time.elapsed,
            time.fps()
        );

        #[cfg(feature = "gamepad")]
        if let Some(poller) = &mut self.gamepads {
            poller.poll(session.hub());
        }

        if session.frame(time.delta) {
            window.set_title(&session.window_title());
        }
    }
}

pub(crate) fn run_internal(config: StriderConfig) -> Result<()> {
    let mut runner = Runner::new(config);
    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    // Poll = spin the loop as fast as possible; no sleeping between frames.
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run_app(&mut runner)
        .context("event loop terminated with an error")
}
