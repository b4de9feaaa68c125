/*
 *  display/rasterizer.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Turns panel state into an ordered draw list of circular dots
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

use crate::constants::{
    CHAR_COLS, CHAR_ROWS, CHAR_SPACING_COLS, DOT_DIAMETER_RATIO, MATRIX_COLS, MATRIX_ROWS,
};
use crate::display::color::Rgb;
use crate::display::layout::text_pixel_width;
use crate::display::panel::PanelState;
use crate::display::{DisplayMode, ScrollStyle};
use crate::matrix_font;

/// One filled circle to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
    pub color: Rgb,
}

/// Clip rectangle for the presentation layer. Dots may poke past the grid
/// edge mid-scroll; the consumer clips them against this rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A complete rendered frame: surface fill, grid clip bounds, and the
/// ordered dot list (idle grid first, lit glyph dots on top).
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub surface_width: f32,
    pub surface_height: f32,
    pub fill: Rgb,
    pub clip: ClipRect,
    pub dots: Vec<Dot>,
}

/// Rasterize the current state into a draw list.
///
/// Pure: reads the state snapshot, mutates nothing. Geometry is recomputed
/// here on every call so a resize is always reflected in the next frame.
pub fn rasterize(state: &PanelState) -> Frame {
    let geom = state.geometry();
    let cell = geom.cell_size;
    let dot_diameter = cell * DOT_DIAMETER_RATIO;
    let dot_inset = (cell - dot_diameter) / 2.0;
    let grid_right = geom.origin_x + geom.grid_width;

    let mut dots = Vec::new();

    if state.idle_grid {
        for row in 0..MATRIX_ROWS {
            for col in 0..MATRIX_COLS {
                dots.push(Dot {
                    x: geom.origin_x + col as f32 * cell + dot_inset,
                    y: geom.origin_y + row as f32 * cell + dot_inset,
                    diameter: dot_diameter,
                    color: state.background_color,
                });
            }
        }
    }

    if !state.text.is_empty() {
        let char_count = state.text.chars().count();
        let text_width = text_pixel_width(char_count, cell);
        let scrolling = state.mode == DisplayMode::Text
            && state.scroll_enabled
            && text_width > geom.grid_width;

        let x_start = if scrolling {
            match state.scroll_style {
                // marquee: text enters from the right edge
                ScrollStyle::Wrap => grid_right - state.scroll_phase.offset,
                // sweep: offset shifts the text left across its travel range
                ScrollStyle::Bounce => geom.origin_x - state.scroll_phase.offset,
            }
        } else {
            geom.origin_x + (geom.grid_width - text_width) / 2.0
        };

        // glyphs sit centered between the grid's margin rows
        let glyph_top = geom.origin_y + ((MATRIX_ROWS - CHAR_ROWS) / 2) as f32 * cell;
        let slot_width = (CHAR_COLS + CHAR_SPACING_COLS) as f32 * cell;
        let glyph_width = CHAR_COLS as f32 * cell;

        for (index, character) in state.text.chars().enumerate() {
            // the slot advances by `index` whether or not the glyph exists,
            // so unknown characters leave a uniform gap
            let Some(rows) = matrix_font::glyph(character) else {
                continue;
            };
            let char_start_x = x_start + index as f32 * slot_width;
            if char_start_x > grid_right || char_start_x + glyph_width < geom.origin_x {
                continue;
            }
            for row in 0..CHAR_ROWS {
                for col in 0..CHAR_COLS {
                    if !matrix_font::is_lit(rows, row, col) {
                        continue;
                    }
                    let x = char_start_x + col as f32 * cell + dot_inset;
                    if x + dot_diameter < geom.origin_x || x > grid_right {
                        continue;
                    }
                    dots.push(Dot {
                        x,
                        y: glyph_top + row as f32 * cell + dot_inset,
                        diameter: dot_diameter,
                        color: state.pixel_color,
                    });
                }
            }
        }
    }

    Frame {
        surface_width: state.surface_width,
        surface_height: state.surface_height,
        fill: Rgb::BLACK,
        clip: ClipRect {
            x: geom.origin_x,
            y: geom.origin_y,
            width: geom.grid_width,
            height: geom.grid_height,
        },
        dots,
    }
}
