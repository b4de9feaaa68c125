/*
 *  display/components/clock.rs
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock string formatting with blinking colon
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

use chrono::{DateTime, Local, Timelike};

/// Format a timestamp as the panel clock string.
///
/// `HH:MM`, with the colon blanked on even seconds so the separator blinks
/// once per second as the driver ticks.
pub fn clock_text(now: DateTime<Local>) -> String {
    let separator = if now.second() % 2 == 0 { ' ' } else { ':' };
    format!("{:02}{}{:02}", now.hour(), separator, now.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 1, 15, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_colon_on_odd_seconds() {
        assert_eq!(clock_text(at(9, 5, 1)), "09:05");
        assert_eq!(clock_text(at(23, 59, 59)), "23:59");
    }

    #[test]
    fn test_colon_blanked_on_even_seconds() {
        assert_eq!(clock_text(at(9, 5, 0)), "09 05");
        assert_eq!(clock_text(at(14, 30, 42)), "14 30");
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(clock_text(at(0, 0, 1)).len(), 5);
        assert_eq!(clock_text(at(0, 0, 2)).len(), 5);
    }
}
