/*
 *  display/layout.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Grid geometry: cell sizing and text measurement
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
    CHAR_COLS, CHAR_SPACING_COLS, MATRIX_COLS, MATRIX_ROWS, MAX_CELL_SIZE, MAX_HEIGHT_USAGE,
    MIN_CELL_SIZE,
};

/// Per-redraw grid placement: the cell size and the grid's bounding
/// rectangle centered within the surface.
///
/// Recomputed from the surface dimensions on every layout-affecting event;
/// nothing here is cached across resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Side of one square cell, in logical pixels
    pub cell_size: f32,

    /// Left edge of the grid within the surface
    pub origin_x: f32,

    /// Top edge of the grid within the surface
    pub origin_y: f32,

    /// Total grid width (`MATRIX_COLS * cell_size`)
    pub grid_width: f32,

    /// Total grid height (`MATRIX_ROWS * cell_size`)
    pub grid_height: f32,
}

impl GridGeometry {
    /// Compute geometry for a surface. `scale_factor` is the device pixel
    /// ratio reported by the host window system.
    pub fn compute(surface_width: f32, surface_height: f32, scale_factor: f32) -> Self {
        let cell_size = cell_size(surface_width, surface_height, scale_factor);
        let grid_width = MATRIX_COLS as f32 * cell_size;
        let grid_height = MATRIX_ROWS as f32 * cell_size;
        Self {
            cell_size,
            origin_x: (surface_width - grid_width) / 2.0,
            origin_y: (surface_height - grid_height) / 2.0,
            grid_width,
            grid_height,
        }
    }
}

/// Largest square cell that fits the fixed grid into the surface.
///
/// The height budget is capped at `MAX_HEIGHT_USAGE` of the surface, the
/// result is clamped to `[MIN_CELL_SIZE, MAX_CELL_SIZE]`, then snapped up
/// to the device pixel grid so the dots stay circular instead of smearing
/// into ellipses on fractional-DPI surfaces.
pub fn cell_size(surface_width: f32, surface_height: f32, scale_factor: f32) -> f32 {
    if surface_width <= 0.0 || surface_height <= 0.0 {
        return MIN_CELL_SIZE;
    }

    let usable_height = surface_height * MAX_HEIGHT_USAGE;
    let size_by_height = usable_height / MATRIX_ROWS as f32;
    let size_by_width = surface_width / MATRIX_COLS as f32;

    let chosen = size_by_height
        .min(size_by_width)
        .clamp(MIN_CELL_SIZE, MAX_CELL_SIZE);

    if scale_factor > 0.0 {
        (chosen * scale_factor).ceil() / scale_factor
    } else {
        chosen.ceil()
    }
}

/// Rendered width of a string in cells: one glyph-width slot per
/// character plus fixed inter-character spacing. Unknown characters still
/// occupy a slot, so measurement never depends on the font table.
pub fn text_width_cells(char_count: usize) -> f32 {
    if char_count == 0 {
        return 0.0;
    }
    let glyph_cols = char_count * CHAR_COLS;
    let spacing_cols = (char_count - 1) * CHAR_SPACING_COLS;
    (glyph_cols + spacing_cols) as f32
}

/// Rendered width of a string in logical pixels at the given cell size.
pub fn text_pixel_width(char_count: usize, cell_size: f32) -> f32 {
    text_width_cells(char_count) * cell_size
}
