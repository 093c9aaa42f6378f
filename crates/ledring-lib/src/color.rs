//! Color parsing and formatting for light colors.
//!
//! The light service speaks `#rrggbb` (lower-case hex). Internally colors are
//! `0xRRGGBB` integers.

use crate::error::{LedringError, Result};

/// Wire form of "off".
pub const BLACK: &str = "#000000";

/// Parse a color string into `0xRRGGBB`.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#ff0000"`
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`, `"magenta"`
pub fn parse_color(s: &str) -> Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFF0000),
        "green" => return Ok(0x00FF00),
        "blue" => return Ok(0x0000FF),
        "white" => return Ok(0xFFFFFF),
        "orange" => return Ok(0xFF8000),
        "yellow" => return Ok(0xFFFF00),
        "purple" => return Ok(0x8000FF),
        "cyan" => return Ok(0x00FFFF),
        "magenta" => return Ok(0xFF00FF),
        "off" | "black" => return Ok(0x000000),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LedringError::Color(format!(
            "Invalid color: {s} (use #RRGGBB or a color name)"
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|_| LedringError::Color(format!("Invalid hex color: {s}")))
}

/// Format `0xRRGGBB` as `#rrggbb`. Bits above 24 are ignored.
pub fn format_color(val: u32) -> String {
    format!("#{:06x}", val & 0xFF_FFFF)
}

/// Parse and re-format, yielding the canonical `#rrggbb` form.
pub fn normalize_color(s: &str) -> Result<String> {
    parse_color(s).map(format_color)
}
