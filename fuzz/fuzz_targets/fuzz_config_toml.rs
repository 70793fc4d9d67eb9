//! Fuzz target for TOML config parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use thread_advisor::AdvisorConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(cfg) = AdvisorConfig::from_toml_str(text) {
            assert!(cfg.hard_max_threads >= 1);
            let _ = cfg.validate();
        }
    }
});
