//! Boolean Bayesian network model.
//!
//! A [`BayesianNetwork`] is an ordered list of [`Variable`]s. Each variable
//! owns a conditional probability table with one `(P(true), P(false))` row per
//! assignment of its parents.
//!
//! # CPT indexing
//!
//! Parents are scanned in declaration order; the `i`-th of `k` parents adds
//! `2^(k-1-i)` to the row index when its value is `false` and nothing when it
//! is `true`:
//!
//! ```text
//! parents (A, B)     row
//! A=T, B=T            0
//! A=T, B=F            1
//! A=F, B=T            2
//! A=F, B=F            3
//! ```
//!
//! Model order matters: enumeration and the samplers walk variables in model
//! order and need every parent to be assigned before its children, while
//! variable elimination sums variables out in reverse model order.
//!
//! # Example
//!
//! ```rust
//! use bn_core::network::{BayesianNetwork, Variable};
//!
//! let mut net = BayesianNetwork::new("rain");
//! net.add_variable(Variable::new("A").with_cpt([(0.6, 0.4)])).unwrap();
//! net.add_variable(
//!     Variable::new("B")
//!         .with_parents(["A"])
//!         .with_cpt([(0.8, 0.2), (0.3, 0.7)]),
//! )
//! .unwrap();
//! net.validate().unwrap();
//!
//! let b = net.variable("B").unwrap();
//! assert_eq!(b.get_probability(true, &[false]).unwrap(), 0.3);
//! ```

use bn_common::{Error, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Partial assignment of observed variable values.
pub type Evidence = HashMap<String, bool>;

/// How far a CPT row may stray from summing to one.
pub const CPT_SUM_TOLERANCE: f64 = 1e-4;

/// One row of a conditional probability table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CptRow {
    pub p_true: f64,
    pub p_false: f64,
}

impl CptRow {
    pub fn new(p_true: f64, p_false: f64) -> Self {
        Self { p_true, p_false }
    }

    /// Probability of `value` in this row.
    pub fn get(&self, value: bool) -> f64 {
        if value {
            self.p_true
        } else {
            self.p_false
        }
    }
}

impl From<(f64, f64)> for CptRow {
    fn from((p_true, p_false): (f64, f64)) -> Self {
        Self { p_true, p_false }
    }
}

/// Row index of a parent assignment under the CPT indexing rule.
pub fn cpt_index(parent_values: &[bool]) -> usize {
    let k = parent_values.len();
    parent_values
        .iter()
        .enumerate()
        .filter(|&(_, &value)| !value)
        .map(|(i, _)| 1usize << (k - 1 - i))
        .sum()
}

/// A boolean random variable and its CPT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    name: String,
    outcomes: Vec<String>,
    parents: Vec<String>,
    children: Vec<String>,
    cpt: Vec<CptRow>,
}

impl Variable {
    /// Create a variable with no parents, no CPT and the default outcome labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: vec!["true".to_string(), "false".to_string()],
            parents: Vec::new(),
            children: Vec::new(),
            cpt: Vec::new(),
        }
    }

    /// Set the parent list.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Set the CPT from `(P(true), P(false))` pairs.
    pub fn with_cpt<I, R>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<CptRow>,
    {
        self.cpt = rows.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Replace the outcome labels (informational; the domain is always boolean).
    pub fn set_outcomes(&mut self, outcomes: Vec<String>) {
        self.outcomes = outcomes;
    }

    pub fn add_outcome(&mut self, outcome: impl Into<String>) {
        self.outcomes.push(outcome.into());
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn add_parent(&mut self, parent: impl Into<String>) {
        self.parents.push(parent.into());
    }

    /// Children recorded on this variable. Informational only; see
    /// [`BayesianNetwork::children_of`] for the derived list.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn add_child(&mut self, child: impl Into<String>) {
        let child = child.into();
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub fn cpt(&self) -> &[CptRow] {
        &self.cpt
    }

    pub fn set_cpt(&mut self, rows: Vec<CptRow>) {
        self.cpt = rows;
    }

    /// Whether this variable has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// P(self = `value` | parents = `parent_values`).
    ///
    /// `parent_values` follows the order of [`Variable::parents`]; an empty
    /// slice reads the prior row.
    pub fn get_probability(&self, value: bool, parent_values: &[bool]) -> Result<f64> {
        if parent_values.len() != self.parents.len() {
            return Err(Error::malformed_cpt(
                &self.name,
                format!(
                    "expected {} parent values, got {}",
                    self.parents.len(),
                    parent_values.len()
                ),
            ));
        }
        let index = cpt_index(parent_values);
        let row = self.cpt.get(index).ok_or_else(|| {
            Error::malformed_cpt(
                &self.name,
                format!("missing row {} of {}", index, self.cpt.len()),
            )
        })?;
        Ok(row.get(value))
    }

    /// Values of this variable's parents, read from a partial assignment.
    ///
    /// A parent missing from `state` means the caller walked the model out of
    /// topological order.
    pub fn parent_values(&self, state: &Evidence) -> Result<Vec<bool>> {
        self.parents
            .iter()
            .map(|parent| {
                state
                    .get(parent)
                    .copied()
                    .ok_or_else(|| Error::UnorderedNetwork {
                        variable: self.name.clone(),
                        parent: parent.clone(),
                    })
            })
            .collect()
    }

    /// P(self = `value` | parents as assigned in `state`).
    pub fn probability_given(&self, value: bool, state: &Evidence) -> Result<f64> {
        let parent_values = self.parent_values(state)?;
        self.get_probability(value, &parent_values)
    }

    /// Check the CPT shape and contents.
    pub fn validate_cpt(&self) -> Result<()> {
        let expected = 1usize
            .checked_shl(self.parents.len() as u32)
            .ok_or_else(|| Error::malformed_cpt(&self.name, "too many parents"))?;
        if self.cpt.len() != expected {
            return Err(Error::malformed_cpt(
                &self.name,
                format!("expected {} rows, got {}", expected, self.cpt.len()),
            ));
        }
        for (i, row) in self.cpt.iter().enumerate() {
            for p in [row.p_true, row.p_false] {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(Error::malformed_cpt(
                        &self.name,
                        format!("row {} has probability {} outside [0, 1]", i, p),
                    ));
                }
            }
            let sum = row.p_true + row.p_false;
            if (sum - 1.0).abs() > CPT_SUM_TOLERANCE {
                return Err(Error::malformed_cpt(
                    &self.name,
                    format!("row {} sums to {}", i, sum),
                ));
            }
        }
        Ok(())
    }
}

/// An ordered collection of boolean variables forming a DAG.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BayesianNetwork {
    name: String,
    variables: Vec<Variable>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl BayesianNetwork {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Append a variable to the end of the model order.
    pub fn add_variable(&mut self, variable: Variable) -> Result<()> {
        if self.positions.contains_key(variable.name()) {
            return Err(Error::DuplicateVariable {
                name: variable.name().to_string(),
            });
        }
        self.positions
            .insert(variable.name().to_string(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Position of `name` in model order.
    pub fn position(&self, name: &str) -> Result<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_variable(name))
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Result<&Variable> {
        let index = self.position(name)?;
        Ok(&self.variables[index])
    }

    /// Mutable lookup, for use while the network is being built.
    pub fn variable_mut(&mut self, name: &str) -> Result<&mut Variable> {
        let index = self.position(name)?;
        Ok(&mut self.variables[index])
    }

    /// All variables in model order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(Variable::name)
    }

    /// Record a `parent -> child` edge on both variables.
    pub fn connect(&mut self, parent: &str, child: &str) -> Result<()> {
        self.position(parent)?;
        self.variable_mut(child)?.add_parent(parent);
        self.variable_mut(parent)?.add_child(child);
        Ok(())
    }

    /// Children of `name`, derived from the parent lists, in model order.
    pub fn children_of(&self, name: &str) -> Result<Vec<&Variable>> {
        self.position(name)?;
        Ok(self
            .variables
            .iter()
            .filter(|v| v.parents().iter().any(|p| p == name))
            .collect())
    }

    /// Check `query` and the evidence names against the network and return
    /// the evidence to condition on.
    ///
    /// An evidence entry for the query itself is dropped, so every method
    /// computes P(query | rest of the evidence).
    pub fn conditioning_evidence(&self, query: &str, evidence: &Evidence) -> Result<Evidence> {
        self.position(query)?;
        let mut conditioned = Evidence::with_capacity(evidence.len());
        for (name, &value) in evidence {
            self.position(name)?;
            if name == query {
                warn!(query, value, "ignoring evidence on the query variable");
                continue;
            }
            conditioned.insert(name.clone(), value);
        }
        Ok(conditioned)
    }

    /// Check every structural invariant.
    ///
    /// - every parent names a variable in the network
    /// - every CPT has `2^parents` well-formed rows
    /// - the parent relation is acyclic
    /// - parents precede their children in model order
    pub fn validate(&self) -> Result<()> {
        for variable in &self.variables {
            for parent in variable.parents() {
                self.position(parent)?;
            }
            variable.validate_cpt()?;
        }

        self.topological_order()?;

        for (index, variable) in self.variables.iter().enumerate() {
            for parent in variable.parents() {
                if self.positions[parent.as_str()] > index {
                    return Err(Error::UnorderedNetwork {
                        variable: variable.name().to_string(),
                        parent: parent.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Reorder the model so parents precede children.
    ///
    /// The sort is stable: a network already in topological order is left
    /// untouched, and otherwise each variable keeps its relative position
    /// among the variables that are ready at the same time.
    pub fn sort_topologically(&mut self) -> Result<()> {
        let order = self.topological_order()?;
        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return Ok(());
        }
        debug!(network = %self.name, "reordering variables topologically");

        let mut slots: Vec<Option<Variable>> = self.variables.drain(..).map(Some).collect();
        self.variables = order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();
        self.positions = self
            .variables
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name().to_string(), i))
            .collect();
        Ok(())
    }

    /// Stable Kahn traversal: repeatedly take the earliest variable whose
    /// parents have all been placed.
    fn topological_order(&self) -> Result<Vec<usize>> {
        let mut placed: HashSet<&str> = HashSet::with_capacity(self.variables.len());
        let mut order = Vec::with_capacity(self.variables.len());
        let mut remaining: Vec<usize> = (0..self.variables.len()).collect();

        while !remaining.is_empty() {
            let ready = remaining.iter().position(|&index| {
                self.variables[index]
                    .parents()
                    .iter()
                    .all(|p| placed.contains(p.as_str()))
            });
            match ready {
                Some(slot) => {
                    let index = remaining.remove(slot);
                    placed.insert(self.variables[index].name());
                    order.push(index);
                }
                None => {
                    let stuck = &self.variables[remaining[0]];
                    if let Some(missing) = stuck.parents().iter().find(|p| !self.contains(p)) {
                        return Err(Error::unknown_variable(missing));
                    }
                    return Err(Error::CyclicNetwork {
                        variable: stuck.name().to_string(),
                    });
                }
            }
        }
        Ok(order)
    }
}
