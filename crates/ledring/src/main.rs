//! ledring — drive a REST-controlled LED ring from the command line.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use ledring_lib::LedringError;
use ledring_lib::wait::CancelToken;

mod cli;

#[derive(Parser)]
#[command(
    name = "ledring",
    version,
    about = "Control an LED ring through a remote light service"
)]
struct Args {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Group id for every request (overrides config, environment and secret file)
    #[arg(long, global = true, value_name = "ID")]
    group_id: Option<String>,

    #[command(subcommand)]
    command: cli::Command,
}

/// Log filter for a `-v` count. `RUST_LOG` still wins when set.
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(args.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    // ── Ctrl+C handler ──
    let token = CancelToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }

    let opts = cli::GlobalOpts {
        json: args.json,
        config_path: args.config,
        group_id: args.group_id,
    };

    match cli::run(args.command, &opts, token) {
        Ok(()) => {}
        Err(LedringError::Interrupted) => {
            eprintln!("Interrupted");
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_filter(0), "warn");
        assert_eq!(log_filter(1), "info");
        assert_eq!(log_filter(2), "debug");
        assert_eq!(log_filter(9), "debug");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["ledring", "off", "--json", "-vv", "--group-id", "g1"]).unwrap();
        assert!(args.json);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.group_id.as_deref(), Some("g1"));
    }
}
