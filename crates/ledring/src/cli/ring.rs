//! `off`, `spin` and `wheel` subcommands — whole-ring operations.

use std::time::Duration;

use super::{Controller, Result, RingActionOutput, print_json};

fn finish(ctl: &Controller, action: &'static str, json: bool) -> Result<()> {
    let ring = ctl.ring().ids().to_vec();
    if json {
        return print_json(&RingActionOutput { action, ring });
    }
    let ids: Vec<String> = ring.iter().map(u32::to_string).collect();
    println!("{action}: done (ring {})", ids.join(", "));
    Ok(())
}

pub(super) fn cmd_off(ctl: &Controller, json: bool) -> Result<()> {
    ctl.turn_off_all_leds()?;
    finish(ctl, "off", json)
}

pub(super) fn cmd_spin(
    ctl: &Controller,
    color: &str,
    turns: i32,
    delay_ms: u64,
    json: bool,
) -> Result<()> {
    log::info!("spinning {color} for {turns} turn(s), {delay_ms}ms per step");
    ctl.spinning_led(color, turns, Duration::from_millis(delay_ms))?;
    finish(ctl, "spin", json)
}

pub(super) fn cmd_wheel(ctl: &Controller, steps: i32, delay_ms: u64, json: bool) -> Result<()> {
    log::info!("rotating ring {steps} step(s), {delay_ms}ms apart");
    ctl.spinning_wheel(steps, Duration::from_millis(delay_ms))?;
    finish(ctl, "wheel", json)
}
