//! Clock face — hour, minute and second hands rendered on the grouped lights.
//!
//! Each hand maps to a ring position; coinciding hands mix additively
//! (hour = red, minute = green, second = blue).

use chrono::Timelike;
use serde::Serialize;

use super::LedController;
use crate::color::{BLACK, format_color};
use crate::error::Result;
use crate::service::LightService;
use crate::wait::Sleeper;

/// Ring positions of the three hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockHands {
    pub hour: usize,
    pub minute: usize,
    pub second: usize,
    pub led_count: usize,
}

impl ClockHands {
    /// Hand positions for a time on a ring of `led_count` LEDs.
    ///
    /// `None` for an empty ring.
    pub fn compute(hours: u32, minutes: u32, seconds: u32, led_count: usize) -> Option<Self> {
        if led_count == 0 {
            return None;
        }
        Some(Self {
            hour: hour_index(hours, minutes, led_count),
            minute: ring_index(minutes, 60, led_count),
            second: ring_index(seconds, 60, led_count),
            led_count,
        })
    }

    /// Mixed color for ring position `i`.
    pub fn color_at(&self, i: usize) -> String {
        mix_colors(i == self.hour, i == self.minute, i == self.second)
    }
}

/// Additive mix: hour → red, minute → green, second → blue.
pub fn mix_colors(hour: bool, minute: bool, second: bool) -> String {
    let r = if hour { 0xFF } else { 0 };
    let g = if minute { 0xFF } else { 0 };
    let b = if second { 0xFF } else { 0 };
    format_color((r << 16) | (g << 8) | b)
}

/// Ring index for the hour hand on a 12-hour dial, advanced by the minutes.
pub fn hour_index(hours: u32, minutes: u32, led_count: usize) -> usize {
    let total_hours = (hours % 12) as f64 + minutes as f64 / 60.0;
    position_to_index(total_hours / 12.0, led_count)
}

/// Ring index for `value` out of `max_exclusive` (e.g. minutes of 60).
pub fn ring_index(value: u32, max_exclusive: u32, led_count: usize) -> usize {
    position_to_index(value as f64 / max_exclusive as f64, led_count)
}

fn position_to_index(ratio: f64, led_count: usize) -> usize {
    // f64::round rounds half away from zero; an empty ring maps to 0
    ((ratio * led_count as f64).round() as usize)
        .checked_rem(led_count)
        .unwrap_or(0)
}

impl<S: LightService, W: Sleeper> LedController<S, W> {
    /// Render a time on the currently grouped lights.
    ///
    /// Every grouped light gets exactly one write, in group order; positions
    /// with no hand are turned off. Returns `None` (and writes nothing) when
    /// no lights are grouped.
    pub fn show_time(&self, hours: u32, minutes: u32, seconds: u32) -> Result<Option<ClockHands>> {
        let leds = self.get_group_leds()?;
        let Some(hands) = ClockHands::compute(hours, minutes, seconds, leds.len()) else {
            return Ok(None);
        };
        for (i, led) in leds.iter().enumerate() {
            let color = hands.color_at(i);
            let on = color != BLACK;
            self.service.set_one(led.id, &color, on)?;
        }
        Ok(Some(hands))
    }

    /// [`show_time`](Self::show_time) with the local wall-clock time.
    pub fn show_time_now(&self) -> Result<Option<ClockHands>> {
        let now = chrono::Local::now();
        self.show_time(now.hour(), now.minute(), now.second())
    }
}
