//! thread-advisor entry point.
//!
//! ## CLI Subcommands
//!
//! - `thread-advisor advise --io-ratio P` - Recommend for a known I/O ratio
//! - `thread-advisor simulate` - Measure a synthetic workload end to end
//! - `thread-advisor timer` - Show which timer the probe selects
//! - `thread-advisor config show|defaults|validate` - Inspect configuration

use std::process::ExitCode;

use thread_advisor::cli::{self, config_cmd};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let rest = args.get(2..).unwrap_or(&[]);

    match command {
        "advise" => exit(cli::run_advise(rest)),
        "simulate" => exit(cli::run_simulate(rest)),
        "timer" => exit(cli::run_timer()),
        "config" => {
            let subcommand = rest.first().map(|s| s.as_str()).unwrap_or("show");
            let sub_args = rest.get(1..).unwrap_or(&[]);
            match subcommand {
                "show" => exit(config_cmd::run_show(sub_args)),
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                "validate" => exit(config_cmd::run_validate(sub_args)),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    exit(cli::EXIT_USAGE)
                }
            }
        }
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = args.get(2) {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("thread-advisor {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            exit(cli::EXIT_USAGE)
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "thread-advisor - worker thread count advisor v{}

USAGE:
    thread-advisor [COMMAND] [OPTIONS]

COMMANDS:
    advise       Recommend a thread count for a given I/O ratio
    simulate     Measure a synthetic sleep-then-spin workload
    timer        Show which timing strategy is available
    config       Inspect configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

EXAMPLES:
    thread-advisor advise --io-ratio 0.8
    thread-advisor advise --io-ratio 0.8 --stall-ms 120 --text
    thread-advisor simulate --io-ms 80 --cpu-ms 20 --text
    thread-advisor config validate --file advisor.toml

ENVIRONMENT:
    THREAD_ADVISOR_*     Advisor settings (see 'thread-advisor config defaults')
    THREAD_ADVISOR_LOG   Log filter (info, debug, thread_advisor=trace)
    THREAD_ADVISOR_LOG_FORMAT  json (default) or pretty
    THREAD_ADVISOR_LOG_FILE    Write logs to a file instead of stderr
    WORKER_MAX_THREADS   Host thread cap (first of THREAD_ADVISOR_ENV_CAP_VARS)

EXIT CODES:
    0  Success
    1  Failure / configuration warnings
    2  Usage or configuration error
",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "advise" => {
            eprintln!(
                "thread-advisor advise - Recommend for a known I/O ratio

USAGE:
    thread-advisor advise --io-ratio P [OPTIONS]

OPTIONS:
    --io-ratio P   Fraction of time spent waiting (clamped to 0..1)
    --stall-ms S   Average run-queue stall in milliseconds
    --text         Print a human-readable report instead of JSON
"
            );
        }
        "simulate" => {
            eprintln!(
                "thread-advisor simulate - Measure a synthetic workload

USAGE:
    thread-advisor simulate [OPTIONS]

OPTIONS:
    --io-ms N    Milliseconds to sleep (default: 50)
    --cpu-ms N   Milliseconds to spin (default: 50)
    --text       Print the text report instead of a JSON log line
"
            );
        }
        "timer" => {
            eprintln!(
                "thread-advisor timer - Show the timing strategy

DESCRIPTION:
    Prints 'schedstat' when per-thread scheduler statistics are readable,
    otherwise 'approximate'.
"
            );
        }
        "config" => {
            eprintln!(
                "thread-advisor config - Inspect configuration

USAGE:
    thread-advisor config <SUBCOMMAND> [OPTIONS]

SUBCOMMANDS:
    show           Show effective configuration
    validate       Check configuration for meaningless settings
    defaults       Show default configuration

OPTIONS:
    --file PATH    Read a TOML file instead of the environment
"
            );
        }
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'thread-advisor help' for general usage.",
                command
            );
        }
    }
}
