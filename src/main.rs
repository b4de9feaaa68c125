/*
 *  main.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Desktop emulator entry point
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

use anyhow::Context;
use env_logger::Env;
use log::info;

use matryx::config;
use matryx::display::emulator_window::{EmulatorWindow, EmulatorWindowConfig};
use matryx::display::{MatrixPanel, Rgb};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;

    let log_level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!(
        "Matryx {} (built {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE
    );

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let mut panel = MatrixPanel::new().context("panel initialization failed")?;

    let panel_cfg = cfg.panel.clone().unwrap_or_default();
    rt.block_on(async {
        if let Some(color) = panel_cfg.pixel_color {
            panel.set_color(Rgb::from(color)).await;
        }
        if let Some(color) = panel_cfg.background_color {
            panel.set_background_color(Rgb::from(color)).await;
        }
        if let Some(idle_grid) = panel_cfg.idle_grid {
            panel.set_idle_grid(idle_grid).await;
        }
        if let Some(text) = &panel_cfg.text {
            panel.set_text(text).await;
        }
        if let Some(scroll) = panel_cfg.scroll {
            let (enabled, style) = scroll.to_panel();
            panel.set_scroll_style(style).await;
            panel.set_scroll_enabled(enabled).await;
        }
        // speed only sticks if the scroll driver came up above
        if let Some(speed) = panel_cfg.speed {
            panel.set_scroll_speed(speed).await;
        }
        if let Some(mode) = panel_cfg.mode {
            panel.set_mode(mode.into()).await;
        }
    });

    let emulator_cfg = cfg.emulator.clone().unwrap_or_default();
    let default_window = EmulatorWindowConfig::default();
    let window_config = EmulatorWindowConfig {
        scale: emulator_cfg.scale.unwrap_or(default_window.scale),
        surface_width: emulator_cfg.width.unwrap_or(default_window.surface_width),
        surface_height: emulator_cfg.height.unwrap_or(default_window.surface_height),
    };

    let window = EmulatorWindow::new(panel, rt.handle().clone(), window_config);
    window
        .run()
        .map_err(|e| anyhow::anyhow!("emulator window failed: {e}"))
}
