/*
 *  display/emulator_window.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Desktop emulator window: presents panel frames and feeds keyboard
 *  input back into the control surface
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use pixels::{Pixels, SurfaceTexture};
use winit::{
    dpi::PhysicalSize,
    event::{Event, VirtualKeyCode},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};
use winit_input_helper::WinitInputHelper;

use log::{error, info, warn};
use std::time::Instant;
use tokio::sync::watch;

use crate::display::rasterizer::Frame;
use crate::display::{DisplayMode, MatrixPanel, ScrollStyle};

/// Emulator window configuration
#[derive(Debug, Clone)]
pub struct EmulatorWindowConfig {
    /// Window pixels per logical surface pixel
    pub scale: u32,

    /// Logical surface width handed to the panel
    pub surface_width: u32,

    /// Logical surface height handed to the panel
    pub surface_height: u32,
}

impl Default for EmulatorWindowConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            surface_width: 1200,
            surface_height: 140,
        }
    }
}

struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
    current_fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
            current_fps: 0.0,
        }
    }

    fn tick(&mut self) -> f32 {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f32() >= 1.0 {
            self.current_fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_update = Instant::now();
        }

        self.current_fps
    }
}

/// Emulator window manager. Owns the panel and drives it from keyboard
/// input; frames arrive over the panel's watch channel.
pub struct EmulatorWindow {
    panel: MatrixPanel,
    frame_rx: watch::Receiver<Frame>,
    rt: tokio::runtime::Handle,
    config: EmulatorWindowConfig,
    fps_counter: FpsCounter,
}

impl EmulatorWindow {
    pub fn new(
        panel: MatrixPanel,
        rt: tokio::runtime::Handle,
        config: EmulatorWindowConfig,
    ) -> Self {
        let frame_rx = panel.subscribe_frames();
        Self {
            panel,
            frame_rx,
            rt,
            config,
            fps_counter: FpsCounter::new(),
        }
    }

    /// Run the emulator window event loop. Never returns on clean exit.
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut width = self.config.surface_width;
        let mut height = self.config.surface_height;
        let scale = self.config.scale.max(1);

        let event_loop = EventLoop::new();
        let mut input = WinitInputHelper::new();

        let window = WindowBuilder::new()
            .with_title("Matryx Emulator")
            .with_inner_size(PhysicalSize::new(width * scale, height * scale))
            .with_resizable(true)
            .build(&event_loop)?;

        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        let mut pixels = Pixels::new(width, height, surface_texture)?;

        self.rt
            .block_on(self.panel.notify_resized(width as f32, height as f32));
        self.rt
            .block_on(self.panel.set_scale_factor(window.scale_factor() as f32));

        println!("═══════════════════════════════════════════════════");
        println!("  Matryx Panel Emulator");
        println!("═══════════════════════════════════════════════════");
        println!("  Surface: {}x{} @ {}x scale", width, height, scale);
        println!();
        println!("  Keyboard Shortcuts:");
        println!("  ─────────────────────────────────────────────────");
        println!("    ESC / Q   - Quit");
        println!("    C         - Clock mode");
        println!("    T         - Text mode");
        println!("    S         - Toggle scrolling");
        println!("    W         - Wrap (marquee) scroll style");
        println!("    B         - Bounce scroll style");
        println!("    G         - Toggle idle dot grid");
        println!("    1-5       - Scroll speed");
        println!("═══════════════════════════════════════════════════");

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            if let Event::RedrawRequested(_) = event {
                let frame = self.frame_rx.borrow().clone();
                render_frame(pixels.frame_mut(), width, height, &frame);

                if let Err(err) = pixels.render() {
                    error!("pixels.render() failed: {}", err);
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                let fps = self.fps_counter.tick();
                if fps > 0.0 {
                    let snapshot = self.rt.block_on(self.panel.snapshot());
                    let needs_scroll = self.rt.block_on(self.panel.requires_scrolling());
                    window.set_title(&format!(
                        "Matryx Emulator - {:?}{} - {:.1} FPS",
                        snapshot.mode,
                        if needs_scroll { " (overflow)" } else { "" },
                        fps
                    ));
                }
            }

            if input.update(&event) {
                if input.key_pressed(VirtualKeyCode::Escape) || input.key_pressed(VirtualKeyCode::Q)
                {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if input.key_pressed(VirtualKeyCode::C) {
                    self.rt.block_on(self.panel.set_mode(DisplayMode::Clock));
                    println!("Clock mode");
                }

                if input.key_pressed(VirtualKeyCode::T) {
                    self.rt.block_on(self.panel.set_mode(DisplayMode::Text));
                    println!("Text mode");
                }

                if input.key_pressed(VirtualKeyCode::S) {
                    let enabled = !self.rt.block_on(self.panel.snapshot()).scroll_enabled;
                    self.rt.block_on(self.panel.set_scroll_enabled(enabled));
                    // mirror the core's decision, the way a scroll checkbox would
                    let needs = self.rt.block_on(self.panel.requires_scrolling());
                    println!(
                        "Scrolling: {} (text {} the panel)",
                        if enabled { "ON" } else { "OFF" },
                        if needs { "overflows" } else { "fits" }
                    );
                }

                if input.key_pressed(VirtualKeyCode::W) {
                    self.rt.block_on(self.panel.set_scroll_style(ScrollStyle::Wrap));
                    println!("Wrap scroll style");
                }

                if input.key_pressed(VirtualKeyCode::B) {
                    self.rt.block_on(self.panel.set_scroll_style(ScrollStyle::Bounce));
                    println!("Bounce scroll style");
                }

                if input.key_pressed(VirtualKeyCode::G) {
                    let idle = !self.rt.block_on(self.panel.snapshot()).idle_grid;
                    self.rt.block_on(self.panel.set_idle_grid(idle));
                    println!("Idle grid: {}", if idle { "ON" } else { "OFF" });
                }

                let speed_keys = [
                    (VirtualKeyCode::Key1, 1u8),
                    (VirtualKeyCode::Key2, 2),
                    (VirtualKeyCode::Key3, 3),
                    (VirtualKeyCode::Key4, 4),
                    (VirtualKeyCode::Key5, 5),
                ];
                for (key, level) in speed_keys {
                    if input.key_pressed(key) {
                        self.rt.block_on(self.panel.set_scroll_speed(level));
                        println!("Scroll speed {}", level);
                    }
                }

                if let Some(size) = input.window_resized() {
                    let new_width = (size.width / scale).max(1);
                    let new_height = (size.height / scale).max(1);
                    if pixels.resize_surface(size.width, size.height).is_err()
                        || pixels.resize_buffer(new_width, new_height).is_err()
                    {
                        warn!("resize to {}x{} failed", size.width, size.height);
                    } else {
                        width = new_width;
                        height = new_height;
                        self.rt.block_on(
                            self.panel.notify_resized(width as f32, height as f32),
                        );
                        info!("surface resized to {}x{}", width, height);
                    }
                }
            }

            // Redraw continuously; the watch channel hands us the latest frame
            window.request_redraw();
        });
    }
}

/// Blit a panel frame into the RGBA buffer: fill, then each dot as a
/// filled circle clipped to the grid rectangle.
fn render_frame(buffer: &mut [u8], width: u32, height: u32, frame: &Frame) {
    let fill = frame.fill.to_rgba();
    for pixel in buffer.chunks_exact_mut(4) {
        pixel.copy_from_slice(&fill);
    }

    let clip_left = frame.clip.x.max(0.0);
    let clip_top = frame.clip.y.max(0.0);
    let clip_right = (frame.clip.x + frame.clip.width).min(width as f32);
    let clip_bottom = (frame.clip.y + frame.clip.height).min(height as f32);

    for dot in &frame.dots {
        let radius = dot.diameter / 2.0;
        let cx = dot.x + radius;
        let cy = dot.y + radius;
        let rgba = dot.color.to_rgba();

        let x0 = dot.x.max(clip_left).floor().max(0.0) as u32;
        let y0 = dot.y.max(clip_top).floor().max(0.0) as u32;
        let x1 = (dot.x + dot.diameter).min(clip_right).ceil().max(0.0) as u32;
        let y1 = (dot.y + dot.diameter).min(clip_bottom).ceil().max(0.0) as u32;

        for py in y0..y1.min(height) {
            for px in x0..x1.min(width) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    let idx = ((py * width + px) * 4) as usize;
                    if idx + 4 <= buffer.len() {
                        buffer[idx..idx + 4].copy_from_slice(&rgba);
                    }
                }
            }
        }
    }
}
