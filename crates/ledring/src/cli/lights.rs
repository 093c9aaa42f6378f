//! `lights`, `light`, `set`, `delete` and `demo` subcommands — single-light access.

use super::{
    Controller, LightStateJson, LightsOutput, Result, print_json, print_light_row,
};

pub(super) fn cmd_lights(ctl: &Controller, json: bool) -> Result<()> {
    let lights = ctl.get_group_leds()?;
    if json {
        return print_json(&LightsOutput {
            count: lights.len(),
            lights,
        });
    }

    if lights.is_empty() {
        println!("No grouped lights.");
        return Ok(());
    }
    println!("{:>5}  {:<8}  {:<3}  GROUP", "ID", "COLOR", "ON");
    for light in &lights {
        print_light_row(light);
    }
    Ok(())
}

pub(super) fn cmd_light(ctl: &Controller, id: u32, json: bool) -> Result<()> {
    let light = ctl.get_light(id)?;
    if json {
        return print_json(&light);
    }
    print_light_row(&light);
    Ok(())
}

/// `color` is already normalized.
pub(super) fn cmd_set(ctl: &Controller, id: u32, color: &str, json: bool) -> Result<()> {
    ctl.set_led(id, color)?;
    if json {
        return print_json(&LightStateJson {
            id,
            color: color.to_string(),
            on: true,
        });
    }
    println!("Light {id}: {color} (on)");
    Ok(())
}

pub(super) fn cmd_delete(ctl: &Controller, id: u32, json: bool) -> Result<()> {
    ctl.delete_light(id)?;
    if json {
        return print_json(&serde_json::json!({ "deleted": id }));
    }
    println!("Light {id}: deleted");
    Ok(())
}

pub(super) fn cmd_demo(ctl: &Controller, json: bool) -> Result<()> {
    let light = ctl.demo()?;
    if json {
        return print_json(&light);
    }
    println!("First light:");
    print_light_row(&light);
    Ok(())
}
