/*
 *  display/panel.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel state, control surface, and the animation driver task
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

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::sync::Mutex as TokMutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::constants::{
    CLOCK_TICK_INTERVAL_MS, DEFAULT_CELL_SIZE, MATRIX_COLS, MATRIX_ROWS, SCROLL_BASE_INTERVAL_MS,
    SCROLL_SPEED_DEFAULT, SCROLL_SPEED_MAX, SCROLL_SPEED_MIN,
};
use crate::display::color::Rgb;
use crate::display::components::{clock_text, ScrollPhase};
use crate::display::error::PanelError;
use crate::display::layout::{text_pixel_width, GridGeometry};
use crate::display::rasterizer::{rasterize, Frame};
use crate::display::{DisplayMode, ScrollStyle};
use crate::matrix_font;

/// Everything the rasterizer and driver read: text, mode, scroll state,
/// colors, and the last surface dimensions reported by the host.
#[derive(Debug, Clone)]
pub struct PanelState {
    /// Display string, normalized to uppercase
    pub text: String,
    pub mode: DisplayMode,
    /// Scroll toggle; forced off while in clock mode
    pub scroll_enabled: bool,
    pub scroll_style: ScrollStyle,
    pub scroll_phase: ScrollPhase,
    /// Speed level 1..=5; only mutable while the driver runs
    pub speed_level: u8,
    pub pixel_color: Rgb,
    /// Unlit-dot color for the idle grid
    pub background_color: Rgb,
    /// Paint the full grid of unlit dots beneath the text
    pub idle_grid: bool,
    pub surface_width: f32,
    pub surface_height: f32,
    /// Device pixel ratio of the host surface
    pub scale_factor: f32,
    pub(crate) stop_flag: bool,
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            mode: DisplayMode::Text,
            scroll_enabled: false,
            scroll_style: ScrollStyle::Wrap,
            scroll_phase: ScrollPhase::default(),
            speed_level: SCROLL_SPEED_DEFAULT,
            pixel_color: Rgb::GREEN,
            background_color: Rgb::DARK_GRAY,
            idle_grid: true,
            surface_width: MATRIX_COLS as f32 * DEFAULT_CELL_SIZE,
            surface_height: MATRIX_ROWS as f32 * DEFAULT_CELL_SIZE,
            scale_factor: 1.0,
            stop_flag: true,
        }
    }

    /// Grid placement for the current surface. Never cached.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::compute(self.surface_width, self.surface_height, self.scale_factor)
    }

    /// True if the rendered text is wider than the grid.
    pub fn requires_scrolling(&self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        let geom = self.geometry();
        text_pixel_width(self.text.chars().count(), geom.cell_size) > geom.grid_width
    }

    fn tick_interval(&self) -> Duration {
        match self.mode {
            DisplayMode::Clock => Duration::from_millis(CLOCK_TICK_INTERVAL_MS),
            DisplayMode::Text => {
                // level 2 is the base rate; higher levels shorten the period
                Duration::from_millis(SCROLL_BASE_INTERVAL_MS * 2 / self.speed_level as u64)
            }
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

fn publish(frame_tx: &watch::Sender<Frame>, state: &PanelState) {
    frame_tx.send_replace(rasterize(state));
}

/// The simulated dot-matrix panel.
///
/// Owns the display state and the single animation task. The host shell
/// mutates state through the setters and receives rendered frames on the
/// watch channel from [`subscribe_frames`](MatrixPanel::subscribe_frames);
/// the channel keeps only the latest frame, so redraw requests coalesce
/// for free.
pub struct MatrixPanel {
    state: Arc<TokMutex<PanelState>>,
    frame_tx: Arc<watch::Sender<Frame>>,
    task_handle: Option<JoinHandle<()>>,
}

impl MatrixPanel {
    /// Build a panel with default state and publish the initial frame.
    ///
    /// Fails only if the built-in font table is unusable.
    pub fn new() -> Result<Self, PanelError> {
        matrix_font::validate()?;
        let state = PanelState::new();
        let (frame_tx, _) = watch::channel(rasterize(&state));
        Ok(Self {
            state: Arc::new(TokMutex::new(state)),
            frame_tx: Arc::new(frame_tx),
            task_handle: None,
        })
    }

    /// Subscribe to rendered frames. Each state change or driver tick that
    /// alters the picture replaces the channel's value.
    pub fn subscribe_frames(&self) -> watch::Receiver<Frame> {
        self.frame_tx.subscribe()
    }

    /// Replace the display text. Uppercased before storage; resets the
    /// scroll offset and, in text mode, re-evaluates the driver.
    pub async fn set_text(&mut self, text: &str) {
        let reevaluate = {
            let mut s = self.state.lock().await;
            s.text = text.to_uppercase();
            s.scroll_phase.offset = 0.0;
            publish(&self.frame_tx, &s);
            s.mode == DisplayMode::Text
        };
        if reevaluate {
            self.restart_if_needed().await;
        }
    }

    /// Set the lit-dot color.
    pub async fn set_color(&mut self, color: Rgb) {
        let mut s = self.state.lock().await;
        s.pixel_color = color;
        publish(&self.frame_tx, &s);
    }

    /// Set the unlit-dot color used by the idle grid.
    pub async fn set_background_color(&mut self, color: Rgb) {
        let mut s = self.state.lock().await;
        s.background_color = color;
        publish(&self.frame_tx, &s);
    }

    /// Toggle the idle grid of unlit dots.
    pub async fn set_idle_grid(&mut self, enabled: bool) {
        let mut s = self.state.lock().await;
        s.idle_grid = enabled;
        publish(&self.frame_tx, &s);
    }

    /// Switch between text and clock display. Redundant calls are no-ops.
    pub async fn set_mode(&mut self, mode: DisplayMode) {
        {
            let s = self.state.lock().await;
            if s.mode == mode {
                return;
            }
        }
        self.abort_task();
        match mode {
            DisplayMode::Clock => {
                info!("display mode -> Clock");
                {
                    let mut s = self.state.lock().await;
                    s.mode = DisplayMode::Clock;
                    s.scroll_enabled = false;
                    s.scroll_phase.reset();
                    s.text = clock_text(Local::now());
                    s.stop_flag = false;
                    publish(&self.frame_tx, &s);
                }
                self.spawn_task();
            }
            DisplayMode::Text => {
                info!("display mode -> Text");
                {
                    let mut s = self.state.lock().await;
                    s.mode = DisplayMode::Text;
                    s.stop_flag = true;
                    publish(&self.frame_tx, &s);
                }
                self.restart_if_needed().await;
            }
        }
    }

    /// Enable or disable scrolling. Only effective in text mode; a change
    /// zeroes the offset and re-evaluates the driver.
    pub async fn set_scroll_enabled(&mut self, enabled: bool) {
        let changed = {
            let mut s = self.state.lock().await;
            let allow = enabled && s.mode == DisplayMode::Text;
            if s.scroll_enabled == allow {
                false
            } else {
                s.scroll_enabled = allow;
                s.scroll_phase.offset = 0.0;
                publish(&self.frame_tx, &s);
                true
            }
        };
        if changed {
            self.restart_if_needed().await;
        }
    }

    /// Switch between wrap and bounce. Resets offset and direction.
    pub async fn set_scroll_style(&mut self, style: ScrollStyle) {
        let changed = {
            let mut s = self.state.lock().await;
            if s.scroll_style == style {
                false
            } else {
                s.scroll_style = style;
                s.scroll_phase.reset();
                publish(&self.frame_tx, &s);
                true
            }
        };
        if changed {
            self.restart_if_needed().await;
        }
    }

    /// Change the scroll speed level (1..=5, higher is faster).
    ///
    /// Takes effect only while the scroll driver is running: the driver is
    /// restarted at the new period with the offset left untouched.
    pub async fn set_scroll_speed(&mut self, level: u8) {
        if !(SCROLL_SPEED_MIN..=SCROLL_SPEED_MAX).contains(&level) {
            warn!("scroll speed level {} out of range, ignored", level);
            return;
        }
        let changed = {
            let mut s = self.state.lock().await;
            if s.stop_flag || s.mode != DisplayMode::Text {
                debug!("scroll driver idle, speed change ignored");
                false
            } else if s.speed_level == level {
                false
            } else {
                s.speed_level = level;
                true
            }
        };
        if changed {
            self.abort_task();
            self.spawn_task();
        }
    }

    /// Report a new surface size. Non-positive dimensions are ignored.
    ///
    /// Layout is recomputed on the next frame; in text mode with scrolling
    /// enabled the overflow condition is re-evaluated immediately, so a
    /// shrink can start the driver and a growth can stop it.
    pub async fn notify_resized(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            warn!("ignoring degenerate surface size {}x{}", width, height);
            return;
        }
        let reevaluate = {
            let mut s = self.state.lock().await;
            s.surface_width = width;
            s.surface_height = height;
            publish(&self.frame_tx, &s);
            s.mode == DisplayMode::Text && s.scroll_enabled
        };
        if reevaluate {
            self.restart_if_needed().await;
        }
    }

    /// Report the host's device pixel ratio, used for cell alignment.
    pub async fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor <= 0.0 {
            warn!("ignoring degenerate scale factor {}", scale_factor);
            return;
        }
        let reevaluate = {
            let mut s = self.state.lock().await;
            s.scale_factor = scale_factor;
            publish(&self.frame_tx, &s);
            s.mode == DisplayMode::Text && s.scroll_enabled
        };
        if reevaluate {
            self.restart_if_needed().await;
        }
    }

    /// Pure query: does the current text overflow the grid width?
    ///
    /// The shell polls this after text or layout changes to sync its
    /// scroll indicator.
    pub async fn requires_scrolling(&self) -> bool {
        self.state.lock().await.requires_scrolling()
    }

    /// True while the driver task is ticking (scroll or clock).
    pub async fn is_animating(&self) -> bool {
        !self.state.lock().await.stop_flag
    }

    /// Copy of the current state, for shells and tests.
    pub async fn snapshot(&self) -> PanelState {
        self.state.lock().await.clone()
    }

    /// Stop the driver, zero the offset, and start scrolling again only if
    /// text mode, the scroll toggle, and the overflow condition all agree.
    async fn restart_if_needed(&mut self) {
        self.abort_task();
        let should_run = {
            let mut s = self.state.lock().await;
            s.stop_flag = true;
            s.scroll_phase.offset = 0.0;
            let run =
                s.mode == DisplayMode::Text && s.scroll_enabled && s.requires_scrolling();
            if run {
                s.stop_flag = false;
            }
            run
        };
        if should_run {
            debug!("scroll driver starting");
            self.spawn_task();
        }
    }

    fn abort_task(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }

    /// Spawn the single animation task. One task serves both modes; it
    /// reads its period from state each cycle so a speed change needs no
    /// more than a respawn.
    fn spawn_task(&mut self) {
        if self.task_handle.is_some() {
            debug!("animation task already running");
            return;
        }
        let state = self.state.clone();
        let frame_tx = self.frame_tx.clone();

        let handle = tokio::spawn(async move {
            loop {
                let interval = {
                    let s = state.lock().await;
                    if s.stop_flag {
                        break;
                    }
                    s.tick_interval()
                };
                sleep(interval).await;

                let mut s = state.lock().await;
                if s.stop_flag {
                    break;
                }
                match s.mode {
                    DisplayMode::Clock => {
                        let text = clock_text(Local::now());
                        // unchanged time string publishes nothing
                        if s.text != text {
                            s.text = text;
                            publish(&frame_tx, &s);
                        }
                    }
                    DisplayMode::Text => {
                        let geom = s.geometry();
                        let text_width =
                            text_pixel_width(s.text.chars().count(), geom.cell_size);
                        if !s.scroll_enabled || text_width <= geom.grid_width {
                            // overflow gone: stop and rest at the centered position
                            s.stop_flag = true;
                            s.scroll_phase.offset = 0.0;
                            publish(&frame_tx, &s);
                            break;
                        }
                        let style = s.scroll_style;
                        let step = geom.cell_size;
                        s.scroll_phase.advance(style, text_width, geom.grid_width, step);
                        publish(&frame_tx, &s);
                    }
                }
            }
            debug!("animation task exiting");
        });
        self.task_handle = Some(handle);
    }
}

impl Drop for MatrixPanel {
    fn drop(&mut self) {
        self.abort_task();
    }
}
