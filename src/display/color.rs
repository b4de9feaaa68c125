/*
 *  display/color.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  RGB color type for panel dots
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

use serde::{Deserialize, Serialize};

/// True-color value for a simulated LED dot.
///
/// The simulated panel is full RGB even though most real dot panels are
/// single-color; the shell picks arbitrary foreground/background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Surface fill behind the grid.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Default lit-dot color, the classic LED green.
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    /// Default unlit-dot color for the idle grid.
    pub const DARK_GRAY: Rgb = Rgb::new(42, 42, 42);

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Perceived brightness (0-255), BT.601 weights.
    pub fn luminance(&self) -> u8 {
        let y = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        y.round().min(255.0) as u8
    }

    /// RGBA byte order used by the emulator framebuffer.
    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(v: [u8; 3]) -> Self {
        Rgb::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance() {
        assert_eq!(Rgb::BLACK.luminance(), 0);
        assert_eq!(Rgb::WHITE.luminance(), 255);
        assert!(Rgb::GREEN.luminance() > Rgb::DARK_GRAY.luminance());
    }

    #[test]
    fn test_array_round_trip() {
        let c: Rgb = [12, 200, 7].into();
        assert_eq!(c, Rgb::new(12, 200, 7));
        let a: [u8; 3] = c.into();
        assert_eq!(a, [12, 200, 7]);
    }

    #[test]
    fn test_rgba_order() {
        assert_eq!(Rgb::GREEN.to_rgba(), [0, 255, 0, 255]);
    }
}
