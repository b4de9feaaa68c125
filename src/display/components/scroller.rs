/*
 *  display/components/scroller.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scroll offset advancement for wrap and bounce styles
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

use crate::display::ScrollStyle;

const DIR_FORWARD: i8 = 1;
const DIR_REVERSE: i8 = -1;

/// Animation phase of the scroller: the current offset in logical pixels
/// and, for bounce, the travel direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPhase {
    /// Horizontal displacement, always >= 0
    pub offset: f32,

    /// +1 or -1, meaningful for bounce only
    pub direction: i8,
}

impl Default for ScrollPhase {
    fn default() -> Self {
        Self {
            offset: 0.0,
            direction: DIR_FORWARD,
        }
    }
}

impl ScrollPhase {
    /// Reset to the rest position with forward travel.
    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.direction = DIR_FORWARD;
    }

    /// Advance one tick. `step` is the per-tick displacement (one cell).
    pub fn advance(&mut self, style: ScrollStyle, text_width: f32, grid_width: f32, step: f32) {
        match style {
            ScrollStyle::Wrap => self.advance_wrap(text_width, grid_width, step),
            ScrollStyle::Bounce => self.advance_bounce(text_width, grid_width, step),
        }
    }

    /// Marquee: the text enters at the right edge, exits fully at the left,
    /// then re-enters. Offset lives in `[0, text_width + grid_width)`.
    fn advance_wrap(&mut self, text_width: f32, grid_width: f32, step: f32) {
        let wrap_width = text_width + grid_width;
        if wrap_width <= 0.0 {
            self.offset = 0.0;
            return;
        }
        self.offset += step;
        if self.offset >= wrap_width {
            self.offset %= wrap_width;
        }
    }

    /// Back-and-forth sweep over the overflow. The travel range is the
    /// absolute width difference, so text narrower than the grid sweeps
    /// within the slack rather than pinning at zero.
    fn advance_bounce(&mut self, text_width: f32, grid_width: f32, step: f32) {
        let range = (text_width - grid_width).abs();
        if range <= 0.0 {
            self.reset();
            return;
        }
        self.offset += self.direction as f32 * step;
        if self.offset >= range {
            self.offset = range;
            self.direction = DIR_REVERSE;
        } else if self.offset <= 0.0 {
            self.offset = 0.0;
            self.direction = DIR_FORWARD;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_advances_by_step() {
        let mut phase = ScrollPhase::default();
        phase.advance(ScrollStyle::Wrap, 1790.0, 1000.0, 10.0);
        assert_eq!(phase.offset, 10.0);
        phase.advance(ScrollStyle::Wrap, 1790.0, 1000.0, 10.0);
        assert_eq!(phase.offset, 20.0);
    }

    #[test]
    fn test_wrap_stays_in_bounds() {
        let text_width = 1790.0;
        let grid_width = 1000.0;
        let wrap_width = text_width + grid_width;
        let mut phase = ScrollPhase::default();
        let mut previous = phase.offset;
        for _ in 0..500 {
            phase.advance(ScrollStyle::Wrap, text_width, grid_width, 10.0);
            assert!(phase.offset >= 0.0 && phase.offset < wrap_width);
            // strictly increasing modulo the wrap bound
            let expected = (previous + 10.0) % wrap_width;
            assert!((phase.offset - expected).abs() < 1e-3);
            previous = phase.offset;
        }
    }

    #[test]
    fn test_bounce_flips_at_bounds() {
        // range = 1790 - 1000 = 790; step 100 reaches the far bound in 8 ticks
        let mut phase = ScrollPhase::default();
        for _ in 0..7 {
            phase.advance(ScrollStyle::Bounce, 1790.0, 1000.0, 100.0);
            assert_eq!(phase.direction, 1);
        }
        phase.advance(ScrollStyle::Bounce, 1790.0, 1000.0, 100.0);
        assert_eq!(phase.offset, 790.0);
        assert_eq!(phase.direction, -1);
        for _ in 0..7 {
            phase.advance(ScrollStyle::Bounce, 1790.0, 1000.0, 100.0);
            assert_eq!(phase.direction, -1);
        }
        phase.advance(ScrollStyle::Bounce, 1790.0, 1000.0, 100.0);
        assert_eq!(phase.offset, 0.0);
        assert_eq!(phase.direction, 1);
    }

    #[test]
    fn test_bounce_never_overshoots() {
        let mut phase = ScrollPhase::default();
        for _ in 0..1000 {
            phase.advance(ScrollStyle::Bounce, 1790.0, 1000.0, 130.0);
            assert!(phase.offset >= 0.0 && phase.offset <= 790.0);
        }
    }

    #[test]
    fn test_bounce_within_slack() {
        // text narrower than the grid: sweeps the 890px of slack
        let mut phase = ScrollPhase::default();
        for _ in 0..1000 {
            phase.advance(ScrollStyle::Bounce, 110.0, 1000.0, 100.0);
            assert!(phase.offset >= 0.0 && phase.offset <= 890.0);
        }
    }

    #[test]
    fn test_bounce_zero_range_rests() {
        let mut phase = ScrollPhase {
            offset: 0.0,
            direction: -1,
        };
        phase.advance(ScrollStyle::Bounce, 1000.0, 1000.0, 10.0);
        assert_eq!(phase.offset, 0.0);
        assert_eq!(phase.direction, 1);
    }
}
