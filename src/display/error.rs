/*
 *  display/error.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the panel core
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

use std::error::Error;
use std::fmt;

/// Error type for panel construction.
///
/// The running core is total over its inputs (bad setter values are logged
/// no-ops), so errors only surface at startup when the font table itself
/// is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// Font table declares a zero-sized glyph grid
    DegenerateFont { rows: usize, cols: usize },

    /// A character advertised as supported has no bitmap
    MissingGlyph(char),

    /// A glyph bitmap has bits outside the declared column width
    MalformedGlyph(char),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::DegenerateFont { rows, cols } =>
                write!(f, "Degenerate font table: {}x{} glyph grid", cols, rows),
            PanelError::MissingGlyph(c) =>
                write!(f, "Font table is missing a bitmap for {:?}", c),
            PanelError::MalformedGlyph(c) =>
                write!(f, "Glyph bitmap for {:?} has bits outside the glyph width", c),
        }
    }
}

impl Error for PanelError {}
