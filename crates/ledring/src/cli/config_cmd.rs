//! `config` subcommand — show effective configuration and credential source.

use ledring_lib::LedringError;

use super::{
    Config, ConfigOutput, CredentialJson, GlobalOpts, Result, kv, kv_indent, kv_width,
    load_config, print_json,
};

/// Keep the first four characters of a group id, hide the rest.
pub(super) fn mask_secret(value: &str) -> String {
    let shown: String = value.chars().take(4).collect();
    if shown.len() == value.len() {
        shown
    } else {
        format!("{shown}…")
    }
}

pub(super) fn cmd_config(opts: &GlobalOpts) -> Result<()> {
    let custom_path = opts.config_path.as_deref();
    let config = load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    let resolver = config.credential_resolver(opts.group_id.as_deref());
    let credential = resolver.credential();
    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };

    if opts.json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            credential: CredentialJson {
                group_id: mask_secret(&credential.group_id),
                source: credential.source.to_string(),
            },
            settings: config,
            problems,
        };
        return print_json(&output);
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &[
            "group_leds:",
            "base_url:",
            "group_header:",
            "set request:",
            "timeout:",
            "pacing:",
            "backoff:",
            "secret_paths:",
            "group_id:",
            "source:",
        ],
    );

    match &config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    let leds: Vec<String> = config.group_leds.iter().map(u32::to_string).collect();
    kv_indent("group_leds:", leds.join(", "), w);
    kv_indent("base_url:", &config.api.base_url, w);
    kv_indent("group_header:", &config.api.group_header, w);
    kv_indent(
        "set request:",
        format_args!(
            "{} {} (field \"{}\")",
            config.api.set_method,
            config.api.set_path,
            config.api.state_field.as_str()
        ),
        w,
    );
    kv_indent("timeout:", format_args!("{}s", config.api.timeout_secs), w);
    kv_indent("pacing:", format_args!("{}ms", config.timing.pacing_ms), w);
    kv_indent(
        "backoff:",
        format_args!(
            "{}ms x attempt, up to {} retries",
            config.timing.base_backoff_ms, config.timing.max_retries
        ),
        w,
    );
    let secrets: Vec<String> = config
        .secret_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    kv_indent("secret_paths:", secrets.join(", "), w);
    println!();

    println!("Credential:");
    kv_indent("group_id:", mask_secret(&credential.group_id), w);
    kv_indent("source:", &credential.source, w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}

/// Write the effective config (defaults merged with any existing file).
///
/// Refuses to touch a file that does not parse, so a typo never turns into
/// a file full of defaults.
pub(super) fn cmd_config_init(opts: &GlobalOpts) -> Result<()> {
    let path = match opts.config_path.clone().or_else(Config::path) {
        Some(p) => p,
        None => return Err(LedringError::Config("no config directory available".into())),
    };
    let (config, warnings) = Config::load_from(&path);
    if let Some(warning) = warnings.into_iter().next() {
        return Err(LedringError::Config(warning));
    }
    config.save_to(&path)?;
    log::info!("config written to {}", path.display());
    if opts.json {
        return print_json(&serde_json::json!({ "config_file": path.display().to_string() }));
    }
    println!("Config written to {}", path.display());
    Ok(())
}
