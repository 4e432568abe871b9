//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Startup failures are
//! recorded and surfaced by [`run`] once the event loop returns.

use std::sync::Arc;
use std::time::Instant;

use orrery_config::Config;
use orrery_input::{InputCollector, OrbitController, OrbitSettings, RawKeyEvent, parse_key_code};
use orrery_render::{
    RenderContext, RenderContextError, SurfaceError, TextureManager, TextureSetError,
    init_render_context_blocking,
};
use orrery_scene::SceneState;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::frame::{Stepper, update_frame};
use crate::game_loop::FrameLimiter;
use crate::renderer::{RendererError, SolarSystemRenderer, texture_requests};

/// Anything that ends the viewer with a failure exit code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Gpu(#[from] RenderContextError),

    #[error("texture loading failed: {0}")]
    Textures(#[from] TextureSetError),

    #[error(transparent)]
    Renderer(#[from] RendererError),

    #[error("GPU ran out of memory")]
    OutOfMemory,
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::PhysicalSize::new(
            config.window.width,
            config.window.height,
        ))
        .with_resizable(config.window.resizable)
}

/// Resolve the configured pause key, falling back to Space.
pub fn pause_key_from_config(config: &Config) -> KeyCode {
    parse_key_code(&config.input.pause_key).unwrap_or_else(|err| {
        warn!("{err}, using Space for pause");
        KeyCode::Space
    })
}

struct Graphics {
    window: Arc<Window>,
    gpu: RenderContext,
    renderer: SolarSystemRenderer,
}

/// Viewer state: window, GPU resources, scene and input.
pub struct AppState {
    config: Config,
    graphics: Option<Graphics>,
    scene: SceneState,
    input: InputCollector,
    controller: OrbitController,
    stepper: Stepper,
    limiter: FrameLimiter,
    failure: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut scene = SceneState::solar_system();
        scene.set_paused(config.simulation.start_paused);

        let controller = OrbitController::new(OrbitSettings {
            drag_sensitivity: config.input.drag_sensitivity,
            zoom_step: config.input.zoom_step,
            zoom_limits: config.zoom_limits(),
        });

        Self {
            input: InputCollector::new(pause_key_from_config(&config)),
            stepper: Stepper::from_mode(config.simulation.step_mode),
            limiter: FrameLimiter::new(config.render.target_fps, Instant::now()),
            controller,
            scene,
            graphics: None,
            failure: None,
            config,
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// The error that stopped the event loop, if any.
    pub fn take_failure(&mut self) -> Option<AppError> {
        self.failure.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics, AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        let gpu = init_render_context_blocking(Arc::clone(&window), self.config.render.vsync)?;

        let texture_dir = &self.config.assets.texture_dir;
        info!("Loading textures from {}", texture_dir.display());
        let mut textures = TextureManager::new(&gpu.device);
        textures.load_texture_set(&gpu.device, &gpu.queue, texture_dir, &texture_requests())?;

        let renderer = SolarSystemRenderer::new(&gpu, &self.config.render, &textures, &self.scene)?;
        Ok(Graphics {
            window,
            gpu,
            renderer,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let steps = self.stepper.steps_due(Instant::now());
        let outcome = update_frame(&mut self.scene, &mut self.controller, self.input.drain(), steps);
        if outcome.quit {
            info!("Quit requested");
            event_loop.exit();
            return;
        }

        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };
        match graphics.renderer.render(&graphics.gpu, &self.scene) {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => warn!("Surface lost, skipping frame"),
            Err(SurfaceError::OutOfMemory) => self.fail(event_loop, AppError::OutOfMemory),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = self.graphics.as_mut() {
                    graphics.gpu.resize(size.width, size.height);
                    let (width, height) = graphics.gpu.size();
                    graphics.renderer.resize(&graphics.gpu.device, width, height);
                    info!("Window resized to {width}x{height}");
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => self.input.on_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.on_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => self.input.on_mouse_wheel(delta),
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.on_key(RawKeyEvent::from(&event));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(graphics) = &self.graphics else {
            return;
        };
        let now = Instant::now();
        if self.limiter.is_due(now) {
            graphics.window.request_redraw();
            self.limiter.schedule_next(now);
        }
        let control_flow = match self.limiter.deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Poll,
        };
        event_loop.set_control_flow(control_flow);
    }
}

/// Open the window and run until it closes.
///
/// Returns the startup or runtime failure that ended the loop, if any.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.take_failure() {
        Some(err) => Err(err),
        None => {
            info!(steps = app.scene().steps(), "Viewer closed");
            Ok(())
        }
    }
}
