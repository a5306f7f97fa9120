use std::sync::Arc;

use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    driver::SceneContext,
    error::{Result, RoomError},
    gfx::rendering::{RenderEngine, RenderSettings},
};

/// Pixels of trackpad scrolling that count as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// The desktop viewer: one window showing the room.
pub struct RoomApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    context: SceneContext,
    shift_held: bool,
    fatal: Option<RoomError>,
}

impl RoomApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let viewport = (config.window.width, config.window.height);
        let context = SceneContext::from_config(&config, viewport);

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                context,
                shift_held: false,
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes.
    pub fn run(self) -> Result<()> {
        let RoomApp {
            event_loop,
            mut app_state,
        } = self;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app_state)?;

        match app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RoomError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let PhysicalSize { width, height } = window.inner_size();
        let settings = RenderSettings {
            shadows: self.config.render.shadows,
            shadow_map_size: self.config.render.shadow_map_size,
            vsync: self.config.render.vsync,
        };
        let mut renderer =
            pollster::block_on(RenderEngine::new(window.clone(), width, height, settings))?;

        self.context.resize(width, height, &mut renderer);
        self.window = Some(window);
        self.render_engine = Some(renderer);
        info!("window opened at {width}x{height}");
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.state().shift_key();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.context.resize(width, height, render_engine);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(controls) = self.context.controls.as_mut() {
                    match state {
                        ElementState::Pressed => controls.pointer_down(button, self.shift_held),
                        ElementState::Released => controls.pointer_up(),
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                        y as f32 / PIXELS_PER_LINE
                    }
                };
                if let Some(controls) = self.context.controls.as_mut() {
                    controls.wheel(lines);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.context.frame_tick(render_engine) {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            let context = &mut self.context;
            if let Some(controls) = context.controls.as_mut() {
                controls.pointer_motion(dx as f32, dy as f32, &context.camera);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!("event loop exiting");
    }
}
