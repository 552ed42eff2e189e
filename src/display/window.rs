use std::{
    num::NonZeroU32,
    rc::Rc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    anaglyph::preset::FilterPreset,
    display::DisplaySurface,
    foundation::{
        core::FrameSize,
        error::{AnaglyphError, AnaglyphResult},
    },
    playback::player::Player,
    source::{MediaStream, adapter::FrameSourceAdapter},
};

const SEEK_STEP_SECS: f64 = 5.0;
const FALLBACK_REFRESH_MILLIHERTZ: u32 = 60_000;

fn display_err(e: impl std::fmt::Display) -> AnaglyphError {
    AnaglyphError::Other(anyhow::anyhow!("display: {e}"))
}

/// `softbuffer` surface on a `winit` window, fed from an RGBA back buffer.
pub struct WindowSurface {
    window: Rc<Window>,
    _context: softbuffer::Context<Rc<Window>>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    size: FrameSize,
    back: Vec<u8>,
}

impl WindowSurface {
    fn new(window: Rc<Window>) -> AnaglyphResult<Self> {
        let context = softbuffer::Context::new(Rc::clone(&window)).map_err(display_err)?;
        let surface = softbuffer::Surface::new(&context, Rc::clone(&window)).map_err(display_err)?;
        Ok(Self {
            window,
            _context: context,
            surface,
            size: FrameSize::ZERO,
            back: Vec::new(),
        })
    }
}

impl DisplaySurface for WindowSurface {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn resize(&mut self, size: FrameSize) -> AnaglyphResult<()> {
        self.size = size;
        self.back.resize(size.rgba_len(), 0);
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            self.surface.resize(w, h).map_err(display_err)?;
            let _ = self
                .window
                .request_inner_size(PhysicalSize::new(size.width, size.height));
        }
        Ok(())
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.back
    }

    fn present(&mut self) -> AnaglyphResult<()> {
        if self.size.is_empty() {
            return Ok(());
        }
        let mut buf = self.surface.buffer_mut().map_err(display_err)?;
        for (dst, px) in buf.iter_mut().zip(self.back.chunks_exact(4)) {
            *dst = u32::from(px[2]) | (u32::from(px[1]) << 8) | (u32::from(px[0]) << 16);
        }
        self.window.pre_present_notify();
        buf.present().map_err(display_err)
    }
}

struct WindowApp<S> {
    player: Player<S>,
    surface: Option<WindowSurface>,
    error: Option<AnaglyphError>,
    frame_interval: Duration,
    next_redraw: Option<Instant>,
}

/// One refresh period for a monitor reporting `millihertz`; 60 Hz when unknown.
fn refresh_interval(millihertz: Option<u32>) -> Duration {
    let millihertz = millihertz
        .filter(|&mhz| mhz > 0)
        .unwrap_or(FALLBACK_REFRESH_MILLIHERTZ);
    Duration::from_secs_f64(1000.0 / f64::from(millihertz))
}

impl<S: MediaStream> WindowApp<S> {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> AnaglyphResult<WindowSurface> {
        let size = FrameSourceAdapter::working_size(self.player.stream().native_size());
        let attrs = Window::default_attributes()
            .with_title("anaglyph")
            .with_inner_size(PhysicalSize::new(size.width.max(1), size.height.max(1)));
        let window = Rc::new(event_loop.create_window(attrs).map_err(display_err)?);
        self.frame_interval = refresh_interval(
            window
                .current_monitor()
                .and_then(|m| m.refresh_rate_millihertz()),
        );
        tracing::debug!(interval = ?self.frame_interval, "display refresh interval");
        let mut surface = WindowSurface::new(window)?;
        self.player.poll_metadata(&mut surface)?;
        Ok(surface)
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: Key<&str>) {
        match key {
            Key::Character("1") => self.player.select_preset(FilterPreset::RedCyan.id()),
            Key::Character("2") => self.player.select_preset(FilterPreset::GreenMagenta.id()),
            Key::Character("3") => self.player.select_preset(FilterPreset::BlueYellow.id()),
            Key::Named(NamedKey::Space) => {
                self.player.toggle();
            }
            Key::Named(NamedKey::ArrowLeft) => self.seek(-SEEK_STEP_SECS),
            Key::Named(NamedKey::ArrowRight) => self.seek(SEEK_STEP_SECS),
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            _ => return,
        }
        self.refresh_chrome();
    }

    fn seek(&mut self, delta: f64) {
        if let Err(e) = self.player.seek_by(delta) {
            tracing::warn!(error = %e, "seek failed");
        }
    }

    fn refresh_chrome(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let preset = self.player.selection().preset_id().to_string();
        let title = match self.player.status() {
            Some(status) => format!("anaglyph [{preset}] {:?}: {status}", self.player.state()),
            None => format!("anaglyph [{preset}] {:?}", self.player.state()),
        };
        surface.window.set_title(&title);
        // Redraw on every key so a paused frame is repainted with the chrome.
        surface.window.request_redraw();
    }
}

impl<S: MediaStream> ApplicationHandler for WindowApp<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        match self.open(event_loop) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.refresh_chrome();
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                let Some(surface) = self.surface.as_mut() else {
                    return;
                };
                let before = self.player.state();
                if self.player.on_refresh(surface).is_none() {
                    // Expose or key redraw while paused: repaint the last composite.
                    if let Err(e) = surface.present() {
                        tracing::warn!(error = %e, "present failed");
                    }
                }
                // `request_redraw` is not vblank-paced on every platform; wait one refresh period.
                if self.player.wants_refresh() {
                    let due = Instant::now() + self.frame_interval;
                    self.next_redraw = Some(due);
                    event_loop.set_control_flow(ControlFlow::WaitUntil(due));
                } else {
                    self.next_redraw = None;
                    event_loop.set_control_flow(ControlFlow::Wait);
                }
                if self.player.state() != before {
                    self.refresh_chrome();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.on_key(event_loop, event.logical_key.as_ref());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(due) = self.next_redraw else {
            return;
        };
        if Instant::now() < due {
            return;
        }
        self.next_redraw = None;
        if let Some(surface) = &self.surface {
            surface.window.request_redraw();
        }
    }
}

/// Open a window sized to one eye and run `player` until the window closes.
///
/// Keys: `1`/`2`/`3` select Red/Cyan, Green/Magenta, Blue/Yellow; `Space` toggles playback;
/// `Left`/`Right` seek by five seconds; `Esc` quits.
pub fn run_window<S: MediaStream>(player: Player<S>) -> AnaglyphResult<()> {
    let event_loop = EventLoop::new().map_err(display_err)?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = WindowApp {
        player,
        surface: None,
        error: None,
        frame_interval: refresh_interval(None),
        next_redraw: None,
    };
    event_loop.run_app(&mut app).map_err(display_err)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/window.rs"]
mod tests;
