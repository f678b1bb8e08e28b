use std::{num::NonZeroU32, sync::Arc};

use softbuffer::{Context, Surface};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    error::{MatshowError, MatshowResult},
    playback::Playback,
    raster::blit_nearest,
};

/// Open a blocking window that cycles the playback loop, advancing one
/// frame per redraw, as fast as the display loop runs. Returns when the
/// user closes the window or presses Escape or Q.
#[tracing::instrument(skip(playback, title))]
pub fn show(playback: Playback, title: &str) -> MatshowResult<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| MatshowError::window(format!("failed to create event loop: {e}")))?;
    let mut app = ViewerApp {
        playback,
        title: title.to_owned(),
        gfx: None,
        failure: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| MatshowError::window(format!("event loop failed: {e}")))?;
    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Gfx {
    window: Arc<Window>,
    _context: Context<Arc<Window>>,
    surface: Surface<Arc<Window>, Arc<Window>>,
}

struct ViewerApp {
    playback: Playback,
    title: String,
    gfx: Option<Gfx>,
    failure: Option<MatshowError>,
}

impl ViewerApp {
    fn init_gfx(&self, event_loop: &ActiveEventLoop) -> MatshowResult<Gfx> {
        let frame = self.playback.current();
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(&self.title)
                    .with_inner_size(PhysicalSize::new(frame.width, frame.height)),
            )
            .map(Arc::new)
            .map_err(|e| MatshowError::window(format!("failed to create window: {e}")))?;
        let context = Context::new(window.clone())
            .map_err(|e| MatshowError::window(format!("failed to create draw context: {e}")))?;
        let mut surface = Surface::new(&context, window.clone())
            .map_err(|e| MatshowError::window(format!("failed to create draw surface: {e}")))?;

        resize_surface(&mut surface, window.inner_size())?;

        Ok(Gfx {
            window,
            _context: context,
            surface,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> MatshowResult<()> {
        let Some(gfx) = self.gfx.as_mut() else {
            return Ok(());
        };
        resize_surface(&mut gfx.surface, size)
    }

    fn redraw(&mut self) -> MatshowResult<()> {
        let Some(gfx) = self.gfx.as_mut() else {
            return Ok(());
        };
        let size = gfx.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        // the surface buffer must match the dimensions handed to the blit
        resize_surface(&mut gfx.surface, size)?;
        let frame = self.playback.advance();
        let mut buffer = gfx
            .surface
            .buffer_mut()
            .map_err(|e| MatshowError::window(format!("failed to acquire frame buffer: {e}")))?;
        blit_nearest(frame, &mut buffer, size.width, size.height);
        buffer
            .present()
            .map_err(|e| MatshowError::window(format!("failed to present frame: {e}")))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: MatshowError) {
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        match self.init_gfx(event_loop) {
            Ok(gfx) => self.gfx = Some(gfx),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape | KeyCode::KeyQ),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(size) {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = &self.gfx {
            gfx.window.request_redraw();
        }
    }
}

fn resize_surface(
    surface: &mut Surface<Arc<Window>, Arc<Window>>,
    size: PhysicalSize<u32>,
) -> MatshowResult<()> {
    surface
        .resize(
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        )
        .map_err(|e| MatshowError::window(format!("failed to size draw surface: {e}")))
}
