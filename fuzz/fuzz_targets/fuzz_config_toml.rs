//! Fuzz target for config.toml parsing.

#![no_main]

use bn_core::InferenceConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Accepted configs survive a round trip through TOML
    if let Ok(config) = InferenceConfig::from_toml_str(text) {
        let rendered = config.to_toml().expect("valid config renders");
        let reparsed = InferenceConfig::from_toml_str(&rendered).expect("rendered config parses");
        assert_eq!(config, reparsed);
    }
});
