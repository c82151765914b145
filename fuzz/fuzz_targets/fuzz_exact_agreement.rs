//! Fuzz target comparing enumeration with variable elimination.
//!
//! Builds a small network from structured input: variable `i` may only take
//! parents among the variables before it, so the model is always in
//! topological order.

#![no_main]

use arbitrary::Arbitrary;
use bn_core::inference::{elimination_weights, enumeration_weights};
use bn_core::{BayesianNetwork, Evidence, Variable};
use libfuzzer_sys::fuzz_target;

const MAX_VARIABLES: usize = 7;
const MAX_PARENTS: usize = 3;

#[derive(Debug, Arbitrary)]
struct Node {
    parent_mask: u8,
    rows: Vec<u16>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    nodes: Vec<Node>,
    query: u8,
    observed: Vec<(u8, bool)>,
}

fn name(index: usize) -> String {
    format!("V{index}")
}

fn build(nodes: &[Node]) -> Option<BayesianNetwork> {
    let mut network = BayesianNetwork::new("fuzz");
    for (i, node) in nodes.iter().take(MAX_VARIABLES).enumerate() {
        let parents: Vec<String> = (0..i)
            .filter(|&p| node.parent_mask & (1 << p) != 0)
            .take(MAX_PARENTS)
            .map(name)
            .collect();
        let needed = 1 << parents.len();
        if node.rows.len() < needed {
            return None;
        }
        let cpt = node.rows[..needed].iter().map(|&raw| {
            let p = f64::from(raw) / f64::from(u16::MAX);
            (p, 1.0 - p)
        });
        let variable = Variable::new(name(i)).with_parents(parents).with_cpt(cpt);
        network.add_variable(variable).ok()?;
    }
    (!network.is_empty()).then_some(network)
}

fuzz_target!(|input: Input| {
    let Some(network) = build(&input.nodes) else {
        return;
    };
    network.validate().expect("generated networks are valid");

    let query = name(usize::from(input.query) % network.len());
    let evidence: Evidence = input
        .observed
        .iter()
        .map(|&(index, value)| (name(usize::from(index) % network.len()), value))
        .collect();

    let exact = enumeration_weights(&query, &evidence, &network).expect("enumeration");
    let eliminated = elimination_weights(&query, &evidence, &network).expect("elimination");
    for (a, b) in exact.iter().zip(&eliminated) {
        assert!((a - b).abs() < 1e-9, "{query}: {exact:?} vs {eliminated:?}");
    }
});
