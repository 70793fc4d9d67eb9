//! `advise`: recommend a thread count for a known I/O ratio.

use crate::config;
use crate::report::{render_recommendation, NullSink};
use crate::ThreadAdvisor;

use super::{parse_flag, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};

#[derive(Debug, Clone, PartialEq)]
pub struct AdviseArgs {
    pub io_ratio: f64,
    pub stall_ms: Option<f64>,
    pub text: bool,
}

impl AdviseArgs {
    /// Parse arguments following the `advise` command.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut io_ratio = None;
        let mut stall_ms = None;
        let mut text = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--io-ratio" => {
                    io_ratio = Some(parse_flag::<f64>(args, i)?);
                    i += 2;
                }
                "--stall-ms" => {
                    stall_ms = Some(parse_flag::<f64>(args, i)?);
                    i += 2;
                }
                "--text" => {
                    text = true;
                    i += 1;
                }
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }

        let io_ratio = io_ratio.ok_or("Missing required --io-ratio")?;
        if !io_ratio.is_finite() {
            return Err(format!("Invalid value for --io-ratio: {}", io_ratio));
        }

        Ok(Self {
            io_ratio,
            stall_ms,
            text,
        })
    }
}

pub fn run_advise(args: &[String]) -> i32 {
    let parsed = match AdviseArgs::parse(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: thread-advisor advise --io-ratio P [--stall-ms S] [--text]");
            return EXIT_USAGE;
        }
    };

    let advisor = ThreadAdvisor::builder()
        .config(config::load())
        .sink(NullSink)
        .build();
    let recommendation = advisor.advise_ratio(parsed.io_ratio, parsed.stall_ms);

    if parsed.text {
        println!("{}", render_recommendation(&recommendation));
        return EXIT_OK;
    }

    match serde_json::to_string_pretty(&recommendation) {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}
