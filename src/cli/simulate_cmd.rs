//! `simulate` and `timer`: exercise the measurement path on this machine.

use std::time::{Duration, Instant};

use crate::config::{self, OutputFormat};
use crate::measure::{Timer, TimerKind};
use crate::telemetry::{init_logging, LogConfig};
use crate::ThreadAdvisor;

use super::{parse_flag, EXIT_OK, EXIT_USAGE};

const DEFAULT_IO_MS: u64 = 50;
const DEFAULT_CPU_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateArgs {
    pub io_ms: u64,
    pub cpu_ms: u64,
    pub text: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            io_ms: DEFAULT_IO_MS,
            cpu_ms: DEFAULT_CPU_MS,
            text: false,
        }
    }
}

impl SimulateArgs {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--io-ms" => {
                    parsed.io_ms = parse_flag(args, i)?;
                    i += 2;
                }
                "--cpu-ms" => {
                    parsed.cpu_ms = parse_flag(args, i)?;
                    i += 2;
                }
                "--text" => {
                    parsed.text = true;
                    i += 1;
                }
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }
        Ok(parsed)
    }
}

/// Busy-loop on the current thread for `duration`.
pub fn spin(duration: Duration) -> u64 {
    let start = Instant::now();
    let mut acc: u64 = 0;
    while start.elapsed() < duration {
        acc = std::hint::black_box(acc.wrapping_mul(31).wrapping_add(7));
    }
    acc
}

/// Synthetic unit of work: blocking wait followed by CPU work.
pub fn synthetic_work(io: Duration, cpu: Duration) -> u64 {
    std::thread::sleep(io);
    spin(cpu)
}

pub fn run_simulate(args: &[String]) -> i32 {
    let parsed = match SimulateArgs::parse(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: thread-advisor simulate [--io-ms N] [--cpu-ms N] [--text]");
            return EXIT_USAGE;
        }
    };

    let mut cfg = config::load();
    if parsed.text {
        cfg.output_format = OutputFormat::Text;
    }
    if cfg.output_format == OutputFormat::Json {
        // JSON advice is emitted through the tracing subscriber.
        if let Err(e) = init_logging(&LogConfig::from_env()) {
            eprintln!("Logging disabled: {}", e);
        }
    }

    let advisor = ThreadAdvisor::new(cfg);
    let io = Duration::from_millis(parsed.io_ms);
    let cpu = Duration::from_millis(parsed.cpu_ms);
    let (_, recommendation) = advisor.measure("simulate", || synthetic_work(io, cpu));

    if !parsed.text {
        println!("recommended_threads={}", recommendation.recommended_threads);
    }
    EXIT_OK
}

/// Print which timing strategy the runtime probe selects.
pub fn run_timer() -> i32 {
    let timer = TimerKind::probe();
    let detail = if timer.is_precise() {
        "reports on-CPU, idle and run-queue stall time"
    } else {
        "approximates I/O as wall time minus thread CPU time; no stall data"
    };
    println!("timer={}", timer.name());
    println!("{}", detail);
    EXIT_OK
}
