//! Fuzz target for `NAME=BOOL` evidence arguments.

#![no_main]

use bn_core::cli::{evidence_from_pairs, parse_evidence};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|items: Vec<String>| {
    let pairs: Vec<(String, bool)> = items
        .iter()
        .filter_map(|item| parse_evidence(item).ok())
        .collect();
    for (name, _) in &pairs {
        assert!(!name.is_empty());
    }
    let _ = evidence_from_pairs(&pairs);
});
