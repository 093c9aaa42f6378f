//! `clock` subcommand — render a time (or the local time) as a clock face.

use std::fmt;
use std::time::{Duration, Instant};

use ledring_lib::LedringError;
use ledring_lib::wait::Sleeper;

use super::{CancelToken, CancellableSleeper, ClockHands, ClockOutput, Controller, Result, print_json};

/// Wall-clock time given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Parse `HH:MM` or `HH:MM:SS` (24-hour).
pub fn parse_time(s: &str) -> std::result::Result<ClockTime, String> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(format!("expected HH:MM or HH:MM:SS, got \"{s}\""));
    }
    let field = |i: usize, name: &str, max: u32| -> std::result::Result<u32, String> {
        let Some(raw) = parts.get(i) else {
            return Ok(0);
        };
        let value: u32 = raw
            .parse()
            .map_err(|_| format!("invalid {name} \"{raw}\""))?;
        if value > max {
            return Err(format!("{name} must be 0-{max}, got {value}"));
        }
        Ok(value)
    };
    Ok(ClockTime {
        hours: field(0, "hours", 23)?,
        minutes: field(1, "minutes", 59)?,
        seconds: field(2, "seconds", 59)?,
    })
}

fn report(time: Option<ClockTime>, hands: Option<ClockHands>, json: bool) -> Result<()> {
    if json {
        return print_json(&ClockOutput {
            time: time.map(|t| t.to_string()),
            hands,
        });
    }
    let label = time.map_or_else(|| "local time".to_string(), |t| t.to_string());
    match hands {
        Some(h) => println!(
            "{label}: hour {} / minute {} / second {} on {} LEDs",
            h.hour, h.minute, h.second, h.led_count
        ),
        None => println!("{label}: no grouped lights, nothing shown"),
    }
    Ok(())
}

pub(super) fn cmd_clock(ctl: &Controller, time: Option<ClockTime>, json: bool) -> Result<()> {
    let hands = match time {
        Some(t) => ctl.show_time(t.hours, t.minutes, t.seconds)?,
        None => ctl.show_time_now()?,
    };
    report(time, hands, json)
}

const TICK: Duration = Duration::from_secs(1);

/// Time left in the current tick after a render that took `elapsed`.
fn until_next_tick(elapsed: Duration) -> Duration {
    TICK.saturating_sub(elapsed)
}

/// Re-render the local time every second. Ctrl+C ends the loop normally.
pub(super) fn cmd_clock_watch(ctl: &Controller, token: &CancelToken, json: bool) -> Result<()> {
    let ticker = CancellableSleeper::new(token.clone());
    loop {
        let started = Instant::now();
        let hands = match ctl.show_time_now() {
            Err(LedringError::Interrupted) => return Ok(()),
            other => other?,
        };
        report(None, hands, json)?;
        if ticker.sleep(until_next_tick(started.elapsed())).is_err() {
            log::info!("clock stopped");
            return Ok(());
        }
    }
}
