//! CLI subcommands — light queries, ring animations, clock face, configuration.

mod clock;
mod config_cmd;
mod lights;
mod ring;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use ledring_lib::color;
pub(super) use ledring_lib::config::Config;
pub(super) use ledring_lib::controller::{ClockHands, LedController};
pub(super) use ledring_lib::error::Result;
pub(super) use ledring_lib::light::Light;
pub(super) use ledring_lib::wait::{CancelToken, CancellableSleeper};
use ledring_lib::{HttpLightService, LedringError};

/// Controller wired to the HTTP service, as used by every remote subcommand.
pub(super) type Controller =
    LedController<HttpLightService<CancellableSleeper>, CancellableSleeper>;

/// Flags shared by every subcommand.
pub struct GlobalOpts {
    pub json: bool,
    pub config_path: Option<PathBuf>,
    pub group_id: Option<String>,
}

/// Load config from `custom_path` or the platform default, logging parse warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Load and validate the config, then build a controller.
///
/// No request is made here; the group id is resolved on the first call.
pub(super) fn connect(opts: &GlobalOpts, token: &CancelToken) -> Result<Controller> {
    let config = load_config(opts.config_path.as_deref());
    if let Err(errors) = config.validate() {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LedringError::Config(joined));
    }
    ledring_lib::connect(
        &config,
        opts.group_id.as_deref(),
        CancellableSleeper::new(token.clone()),
    )
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{text}");
    Ok(())
}

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {}", format_kv(key, value, w - 2));
}

/// One line per light: id, color, power, group.
pub(super) fn print_light_row(light: &Light) {
    println!(
        "{:>5}  {:<8}  {:<3}  {}",
        light.id,
        light.color,
        if light.on { "on" } else { "off" },
        light.group_name().unwrap_or("-")
    );
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct LightsOutput {
    pub count: usize,
    pub lights: Vec<Light>,
}

#[derive(Serialize)]
pub(super) struct LightStateJson {
    pub id: u32,
    pub color: String,
    pub on: bool,
}

#[derive(Serialize)]
pub(super) struct RingActionOutput {
    pub action: &'static str,
    pub ring: Vec<u32>,
}

#[derive(Serialize)]
pub(super) struct ClockOutput {
    /// `None` when the local time was used.
    pub time: Option<String>,
    /// `None` when no lights are grouped.
    pub hands: Option<ClockHands>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub credential: CredentialJson,
    pub problems: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct CredentialJson {
    /// Masked; only the first characters are shown.
    pub group_id: String,
    pub source: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the lights that belong to a group
    Lights,

    /// Show a single light
    Light {
        /// Light id
        id: u32,
    },

    /// Set a light's color and turn it on
    Set {
        /// Light id
        id: u32,
        /// Color as #rrggbb or a name (red, green, blue, ...)
        color: String,
    },

    /// Delete a light from the service
    Delete {
        /// Light id
        id: u32,
    },

    /// Turn every ring light off
    Off,

    /// Chase a single lit LED around the ring
    Spin {
        /// Color of the lit LED
        #[arg(long, default_value = "red")]
        color: String,
        /// Full turns around the ring (0 or less only clears the ring)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        turns: i32,
        /// Pause between steps, in milliseconds
        #[arg(long, default_value_t = 200)]
        delay_ms: u64,
    },

    /// Rotate the ring's current colors one position per step
    Wheel {
        /// Number of single-position rotations
        #[arg(long, default_value_t = 8, allow_negative_numbers = true)]
        steps: i32,
        /// Pause between steps, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },

    /// Show a time on the grouped lights as a clock face
    Clock {
        /// Time to show instead of the local time
        #[arg(long, value_name = "HH:MM[:SS]", value_parser = clock::parse_time)]
        time: Option<clock::ClockTime>,
        /// Re-render every second until Ctrl+C
        #[arg(long, conflicts_with = "time")]
        watch: bool,
    },

    /// Show the first light the service returns
    Demo,

    /// Show effective configuration and credential source
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

pub fn run(cmd: Command, opts: &GlobalOpts, token: CancelToken) -> Result<()> {
    let json = opts.json;
    match cmd {
        Command::Lights => lights::cmd_lights(&connect(opts, &token)?, json),
        Command::Light { id } => lights::cmd_light(&connect(opts, &token)?, id, json),
        Command::Demo => lights::cmd_demo(&connect(opts, &token)?, json),
        Command::Set { id, color } => {
            // Reject bad colors before touching config or network.
            let color = color::normalize_color(&color)?;
            lights::cmd_set(&connect(opts, &token)?, id, &color, json)
        }
        Command::Delete { id } => lights::cmd_delete(&connect(opts, &token)?, id, json),
        Command::Off => ring::cmd_off(&connect(opts, &token)?, json),
        Command::Spin {
            color,
            turns,
            delay_ms,
        } => {
            let color = color::normalize_color(&color)?;
            ring::cmd_spin(&connect(opts, &token)?, &color, turns, delay_ms, json)
        }
        Command::Wheel { steps, delay_ms } => {
            ring::cmd_wheel(&connect(opts, &token)?, steps, delay_ms, json)
        }
        Command::Clock { time, watch } => {
            let ctl = connect(opts, &token)?;
            if watch {
                clock::cmd_clock_watch(&ctl, &token, json)
            } else {
                clock::cmd_clock(&ctl, time, json)
            }
        }
        Command::Config { init: true } => config_cmd::cmd_config_init(opts),
        Command::Config { init: false } => config_cmd::cmd_config(opts),
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn kv_width_top_only() {
        let w = kv_width(&["Short:", "Longer key:"], &[]);
        // "Longer key:" = 11 + PADDING = 13
        assert_eq!(w, 13);
    }

    #[test]
    fn kv_width_indent_drives_width() {
        let w = kv_width(&["A:"], &["Very long indent key:"]);
        // "Very long indent key:" = 21 + PADDING + 2 = 25
        assert_eq!(w, 25);
    }

    #[test]
    fn values_align_across_levels() {
        let w = kv_width(&["Top:"], &["Indent:"]);
        let top = format_kv("Top:", "V", w);
        let indent = format!("  {}", format_kv("Indent:", "V", w - 2));
        assert_eq!(top.find('V'), indent.find('V'));
    }

    #[test]
    fn format_kv_exact_width() {
        // Key longer than width: no padding added
        assert_eq!(format_kv("ExactWidth:", "val", 10), "ExactWidth:val");
    }
}
