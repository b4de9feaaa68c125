/*
 *  lib.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Simulated LED dot-matrix panel: renders text or a live clock as a
 *  fixed grid of circular dots, with optional wrap or bounce scrolling
 *  when the text overflows the panel width.
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

pub mod config;
pub mod constants;
pub mod display;
pub mod matrix_font;

pub use display::{
    ClipRect, DisplayMode, Dot, Frame, GridGeometry, MatrixPanel, PanelError, PanelState, Rgb,
    ScrollStyle,
};
