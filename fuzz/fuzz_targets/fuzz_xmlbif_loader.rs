//! Fuzz target for XMLBIF network loading.
//!
//! Arbitrary bytes must load or fail with an error, never panic. Networks
//! that do load are valid, so a marginal query on their first variable must
//! succeed.

#![no_main]

use bn_core::inference::enumerate_ask;
use bn_core::loader::load_reader;
use bn_core::Evidence;
use libfuzzer_sys::fuzz_target;

/// Keep enumeration cheap on large inputs.
const MAX_VARIABLES: usize = 12;

fuzz_target!(|data: &[u8]| {
    let Ok(network) = load_reader(data) else {
        return;
    };
    network.validate().expect("loaded networks are valid");

    if network.is_empty() || network.len() > MAX_VARIABLES {
        return;
    }
    let query = network.variables()[0].name().to_string();
    enumerate_ask(&query, &Evidence::new(), &network).expect("marginal of a valid network");
});
