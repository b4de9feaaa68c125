/*
 *  display/mod.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Simulated dot-matrix panel core
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

pub mod color;
pub mod components;
pub mod error;
pub mod layout;
pub mod panel;
pub mod rasterizer;

// Emulator window (only with emulator feature)
#[cfg(feature = "emulator")]
pub mod emulator_window;

// Re-exports for convenience
pub use color::Rgb;
pub use error::PanelError;
pub use layout::GridGeometry;
pub use panel::{MatrixPanel, PanelState};
pub use rasterizer::{ClipRect, Dot, Frame};

#[cfg(feature = "emulator")]
pub use emulator_window::{EmulatorWindow, EmulatorWindowConfig};

/// Display mode enum - what content the panel shows
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DisplayMode {
    /// Caller-supplied text
    Text,
    /// Current time, refreshed by the driver once per second
    Clock,
}

/// Scroll style for text that overflows the grid
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScrollStyle {
    /// Marquee: exit left, re-enter from the right
    Wrap,
    /// Reverse direction at each end of the travel range
    Bounce,
}
