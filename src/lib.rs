// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod channel;
pub mod config;
pub mod error;
pub mod heading;
pub mod projector;
pub mod provider;
pub mod render;
pub mod trig;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info, warn};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use canvas::{load_font, Canvas, Typeface};
use channel::UpdateChannel;
use render::Scene;
use trig::SineTable;

pub use config::{Color, CompassConfig};
pub use error::{CompassError, DecodeError};
pub use heading::{CompassState, HeadingAngle, HeadingStatus, HeadingUpdate, MarkDirty, Sector};
pub use provider::{HeadingSender, LocationError};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// A compass face plus the state it shows.
#[derive(Debug, Clone)]
pub struct Compass {
    config: CompassConfig,
    state: CompassState,
    trig: SineTable,
}

impl Compass {
    pub fn new(config: CompassConfig) -> Self {
        Self {
            config,
            state: CompassState::new(),
            trig: SineTable::new(),
        }
    }

    pub fn config(&self) -> &CompassConfig {
        &self.config
    }

    pub fn state(&self) -> &CompassState {
        &self.state
    }

    /// Applies a raw channel value outside the event loop.
    pub fn apply_raw<D: MarkDirty + ?Sized>(&mut self, raw: i16, surface: &D) -> CompassState {
        self.state.apply_raw(raw, surface)
    }

    /// The draw calls for the current state.
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        render::render(&mut scene, &self.state, &self.config, &self.trig);
        scene
    }

    pub fn show(&self) -> Result<(), CompassError> {
        self.run_window(None)
    }

    pub fn show_with_updates(&self, receiver: Receiver<Vec<u8>>) -> Result<(), CompassError> {
        self.run_window(Some(UpdateChannel::new(receiver)))
    }

    fn typeface(&self) -> Option<Typeface> {
        let Some(path) = &self.config.font_path else {
            warn!("no font configured, text will not be drawn");
            return None;
        };
        match load_font(path) {
            Ok(font) => Some(Typeface::new(
                font,
                self.config.sector_font_size,
                self.config.small_font_size,
            )),
            Err(err) => {
                warn!(%err, "text will not be drawn");
                None
            }
        }
    }

    fn run_window(&self, mut updates: Option<UpdateChannel>) -> Result<(), CompassError> {
        let width = self.config.display_width;
        let height = self.config.display_height;
        let scale = self.config.window_scale.max(1);

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                (width * scale) as f64,
                (height * scale) as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = Arc::new(window);
        let window_clone = window.clone();

        let typeface = self.typeface();
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(width, height, surface_texture)?;

        let mut state = self.state;
        let poll_interval = self.config.poll_interval;
        info!(width, height, scale, "compass window started");

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::WaitUntil(Instant::now() + poll_interval));
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        info!("compass window closed");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "surface resize failed");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let mut scene = Scene::new();
                        render::render(&mut scene, &state, &self.config, &self.trig);
                        let mut canvas = Canvas::new(
                            pixels.frame_mut(),
                            width as usize,
                            height as usize,
                            typeface.as_ref(),
                        );
                        scene.replay(&mut canvas);
                        if let Err(err) = pixels.render() {
                            error!(%err, "frame presentation failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if let Some(channel) = updates.as_mut() {
                        channel.pump(&mut state, window_clone.as_ref());
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

impl MarkDirty for Window {
    fn mark_dirty(&self) {
        self.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ignore;

    impl MarkDirty for Ignore {
        fn mark_dirty(&self) {}
    }

    #[test]
    fn test_new_compass_waits() {
        let compass = Compass::new(CompassConfig::default());
        assert_eq!(compass.state().status(), HeadingStatus::Waiting);
        assert!(compass.scene().texts().any(|t| t == "Waiting for Heading"));
    }

    #[test]
    fn test_apply_raw_updates_scene() {
        let mut compass = Compass::new(CompassConfig::default());
        compass.apply_raw(100, &Ignore);
        let texts: Vec<String> = compass.scene().texts().map(str::to_string).collect();
        assert!(texts.contains(&"E".to_string()));
        assert!(texts.contains(&"100°".to_string()));

        let after = compass.apply_raw(-100, &Ignore);
        assert_eq!(after.status(), HeadingStatus::Waiting);
        assert_eq!(compass.state().angle().degrees(), 0);
        assert!(compass.scene().texts().any(|t| t == "Waiting for Heading"));
    }
}
