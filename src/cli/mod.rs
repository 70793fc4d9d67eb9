//! CLI subcommands for the `thread-advisor` binary.
//!
//! ## Usage
//!
//! ```bash
//! thread-advisor advise --io-ratio 0.8       # Recommend for a known ratio
//! thread-advisor simulate --io-ms 80 --cpu-ms 20
//! thread-advisor timer                       # Show the selected timer
//! thread-advisor config show                 # Show effective config
//! ```

pub mod advise_cmd;
pub mod config_cmd;
pub mod simulate_cmd;

pub use advise_cmd::run_advise;
pub use simulate_cmd::{run_simulate, run_timer};

/// Success.
pub const EXIT_OK: i32 = 0;
/// Runtime failure.
pub const EXIT_FAILURE: i32 = 1;
/// Bad arguments or configuration.
pub const EXIT_USAGE: i32 = 2;

/// Value following the flag at `args[i]`.
pub(crate) fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("Missing value for {}", args[i]))
}

/// Parse the value following the flag at `args[i]`.
pub(crate) fn parse_flag<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, String> {
    let raw = flag_value(args, i)?;
    raw.trim()
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", args[i], raw))
}
