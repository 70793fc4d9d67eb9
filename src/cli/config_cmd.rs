//! Config CLI subcommands: show, defaults, validate.
//!
//! Configuration comes from `THREAD_ADVISOR_*` env vars, or from a TOML file
//! when `--file PATH` is given.

use crate::config::{self, AdvisorConfig};

use super::{flag_value, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};

/// Load config from `--file PATH` if present, else from the environment.
pub fn load_from_args(args: &[String]) -> Result<AdvisorConfig, String> {
    let mut file = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                file = Some(flag_value(args, i)?);
                i += 2;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    match file {
        Some(path) => AdvisorConfig::from_file(path).map_err(|e| e.to_string()),
        None => Ok(config::load()),
    }
}

/// Print effective config as key-value pairs to stdout.
pub fn run_show(args: &[String]) -> i32 {
    match load_from_args(args) {
        Ok(cfg) => {
            print_config(&cfg);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_USAGE
        }
    }
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    print_config(&AdvisorConfig::default());
}

/// Validate configuration for settings that make advice meaningless.
///
/// Returns 0 if valid, 1 if any warnings are found, 2 if it cannot be loaded.
pub fn run_validate(args: &[String]) -> i32 {
    let cfg = match load_from_args(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_USAGE;
        }
    };

    let warnings = cfg.validate();
    for warning in &warnings {
        eprintln!("WARNING: {}", warning);
    }

    if warnings.is_empty() {
        println!("Configuration is valid.");
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

fn print_config(cfg: &AdvisorConfig) {
    for (key, value) in cfg.effective() {
        println!("{}={}", key, value);
    }
}
