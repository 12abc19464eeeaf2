//! Frame driver: window, input, framebuffer and presentation.

mod raster;
mod scaler;
mod texture;

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::config::ScreenConfig;
use gridcaster::renderer::{RenderMode, Screen, draw_list, sweep};
use gridcaster::{EngineConfig, GridMap, InputFlags, Player};

use scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
use texture::WallTextures;

pub struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    config: EngineConfig,
    map: GridMap,
    player: Player,
    textures: WallTextures,
    mode: RenderMode,
    show_map: bool,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal low-res buffer the columns are drawn into
    fb_small: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input and fixed-rate ticking
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    tick_accum: f32,
}

impl App {
    pub fn new(config: EngineConfig, map: GridMap) -> Self {
        let player = config.spawn_player();
        let textures = WallTextures::generate(config.texture.width, config.texture.height);
        let (fb_w, fb_h) = (config.screen.width as usize, config.screen.height as usize);
        Self {
            window: None,
            surface: None,
            mode: config.render.mode,
            config,
            map,
            player,
            textures,
            show_map: false,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb_small: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            tick_accum: 0.0,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(800.0, 600.0));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("failed to create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.rebuild_internal_fb_and_lut(size.width as usize, size.height as usize);

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                    if !repeat {
                        self.on_key_pressed(code, event_loop);
                    }
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                self.tick();
                if let Err(e) = self.redraw(id) {
                    tracing::error!("presenting frame failed: {e}");
                    event_loop.exit();
                    return;
                }
                self.report_fps();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::Resized(size) => {
                self.rebuild_internal_fb_and_lut(size.width as usize, size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    fn on_key_pressed(&mut self, code: KeyCode, event_loop: &ActiveEventLoop) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyM => {
                self.show_map = !self.show_map;
                tracing::debug!(show_map = self.show_map, "toggled debug map");
            }
            KeyCode::KeyT => {
                self.mode = self.mode.toggled();
                tracing::debug!(mode = ?self.mode, "toggled render mode");
            }
            _ => (),
        }
    }

    fn input(&self) -> InputFlags {
        let keys = &self.keys_down;
        let down = |a: KeyCode, b: KeyCode| keys.contains(&a) || keys.contains(&b);
        InputFlags {
            turn_left: down(KeyCode::KeyA, KeyCode::ArrowLeft),
            turn_right: down(KeyCode::KeyD, KeyCode::ArrowRight),
            forward: down(KeyCode::KeyW, KeyCode::ArrowUp),
            backward: down(KeyCode::KeyS, KeyCode::ArrowDown),
        }
    }

    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;

        // Whole reference ticks only, so per-tick rates behave the same at any frame rate
        self.tick_accum += dt.as_secs_f32() * self.config.motion.tick_hz;
        let input = self.input();
        while self.tick_accum >= 1.0 {
            self.player.update(input, 1.0, &self.config.motion, &self.map);
            self.tick_accum -= 1.0;
        }
    }

    fn render_internal(&mut self) {
        let (w, h) = (self.fb_w, self.fb_h);
        let screen = Screen {
            width: w as u32,
            height: h as u32,
        };
        let view = self.player.view(&self.config.camera);
        let palette = &self.config.render.palette;
        let tex_w = self.textures.width();
        let columns = draw_list(&self.map, &view, screen, self.mode, palette, tex_w);

        raster::fill_background(&mut self.fb_small, w, h);
        for instr in &columns {
            raster::draw_column(&mut self.fb_small, w, h, instr, &self.textures);
        }
        if self.show_map {
            // the debug map needs the hits themselves
            let slices = sweep(&self.map, &view, screen, tex_w);
            let player = self.player.pos;
            raster::draw_minimap(&mut self.fb_small, w, h, &self.map, player, &slices);
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<(), softbuffer::SoftBufferError> {
        let size = match &self.window {
            Some(w) if w.id() == id => w.inner_size(),
            _ => return Ok(()),
        };
        let (w, h) = (size.width, size.height);
        let (Some(dw), Some(dh)) = (NonZeroU32::new(w), NonZeroU32::new(h)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        if self.scale_lut.dst_size() != (dw.get() as usize, dh.get() as usize) {
            self.rebuild_internal_fb_and_lut(dw.get() as usize, dh.get() as usize);
        }

        self.render_internal();

        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.resize(dw, dh)?;
        let mut buf = surface.buffer_mut()?;
        blit_nearest_stretch(
            &mut buf,
            dw.get() as usize,
            &self.fb_small,
            self.fb_w,
            &self.scale_lut,
        );
        buf.present()
    }

    fn report_fps(&mut self) {
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            let (x, y, angle) = (self.player.pos.x, self.player.pos.y, self.player.angle);
            tracing::info!("FPS: {fps:.1}  player x = {x:.3}, y = {y:.3}, angle = {angle:.3}");
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }

    fn rebuild_internal_fb_and_lut(&mut self, dst_w: usize, dst_h: usize) {
        if dst_w == 0 || dst_h == 0 {
            return;
        }

        let (target_w, target_h) = internal_size(&self.config.screen, dst_w, dst_h);
        if target_w != self.fb_w || target_h != self.fb_h {
            self.fb_w = target_w;
            self.fb_h = target_h;
            self.fb_small = vec![0u32; self.fb_w * self.fb_h];
            tracing::debug!(
                width = self.fb_w,
                height = self.fb_h,
                "resized internal framebuffer"
            );
        }

        self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb_w, self.fb_h);
    }
}

/// Internal framebuffer size for a `dst_w` x `dst_h` window.
fn internal_size(screen: &ScreenConfig, dst_w: usize, dst_h: usize) -> (usize, usize) {
    // Keep internal height fixed (controls pixel size look)
    let target_h = screen.height as usize;
    let aspect = dst_w as f32 / dst_h as f32;

    // Derive width from aspect, never narrower than configured
    let mut target_w = (target_h as f32 * aspect).round() as usize;
    if target_w < screen.width as usize {
        target_w = screen.width as usize;
    }
    if target_w % 2 != 0 {
        target_w += 1;
    }
    (target_w, target_h)
}
