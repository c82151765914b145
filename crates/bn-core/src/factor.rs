//! Factors for variable elimination.
//!
//! A [`Factor`] tabulates a function of its *hidden* variables: the variables
//! in its scope that are neither observed nor already summed out. Each table
//! row pairs one assignment of the hidden variables with a probability, and
//! the table holds every assignment exactly once.
//!
//! Rows are matched with [`consistent`] rather than by position, so tables
//! can be combined regardless of how their hidden variables are ordered.

use crate::network::{Evidence, Variable};
use bn_common::{Error, Result};
use bn_math::boolean_assignments;
use serde::Serialize;
use std::collections::BTreeMap;

/// Assignment of values to a set of variables.
pub type Assignment = BTreeMap<String, bool>;

/// One row of a factor table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRow {
    pub assignment: Assignment,
    pub probability: f64,
}

/// A tabulated partial joint over a set of hidden variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    variable: Option<String>,
    parents: Vec<String>,
    hidden: Vec<String>,
    table: Vec<FactorRow>,
}

impl Factor {
    /// The network variable this factor was built from, if any.
    ///
    /// Products of two factors have no single originating variable.
    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn table(&self) -> &[FactorRow] {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Probability of the row consistent with `assignment`.
    ///
    /// `assignment` is expected to cover every hidden variable of this factor,
    /// in which case exactly one row matches.
    pub fn value_at(&self, assignment: &Assignment) -> f64 {
        self.table
            .iter()
            .find(|row| consistent(assignment, &row.assignment))
            .map_or(0.0, |row| row.probability)
    }

    /// Probability of the row that sets `variable` to `value`.
    ///
    /// Meant for single-variable factors such as the final elimination result.
    pub fn probability_of(&self, variable: &str, value: bool) -> Option<f64> {
        self.table
            .iter()
            .find(|row| row.assignment.get(variable) == Some(&value))
            .map(|row| row.probability)
    }
}

/// All assignments of `hidden`, keyed by name.
fn hidden_assignments(hidden: &[String]) -> impl Iterator<Item = Assignment> + '_ {
    boolean_assignments(hidden.len())
        .map(move |values| hidden.iter().cloned().zip(values).collect())
}

fn resolve(name: &str, row: &Assignment, evidence: &Evidence) -> Result<bool> {
    evidence
        .get(name)
        .or_else(|| row.get(name))
        .copied()
        .ok_or_else(|| Error::unknown_variable(name))
}

/// Build the factor for one network variable under `evidence`.
///
/// Hidden variables are the variable itself and each of its parents, minus
/// whatever is observed. Observed values are substituted when reading the CPT.
pub fn make_factor(variable: &Variable, evidence: &Evidence) -> Result<Factor> {
    let mut hidden: Vec<String> = Vec::with_capacity(variable.parents().len() + 1);
    for name in std::iter::once(variable.name()).chain(variable.parents().iter().map(String::as_str)) {
        if !evidence.contains_key(name) && !hidden.iter().any(|h| h == name) {
            hidden.push(name.to_string());
        }
    }

    let mut table = Vec::with_capacity(1 << hidden.len());
    for assignment in hidden_assignments(&hidden) {
        let value = resolve(variable.name(), &assignment, evidence)?;
        let parent_values = variable
            .parents()
            .iter()
            .map(|p| resolve(p, &assignment, evidence))
            .collect::<Result<Vec<bool>>>()?;
        let probability = variable.get_probability(value, &parent_values)?;
        table.push(FactorRow {
            assignment,
            probability,
        });
    }

    Ok(Factor {
        variable: Some(variable.name().to_string()),
        parents: variable.parents().to_vec(),
        hidden,
        table,
    })
}

/// Point-wise product over the union of both factors' hidden variables.
pub fn point_wise_product(f1: &Factor, f2: &Factor) -> Factor {
    let mut hidden = f1.hidden.clone();
    for name in &f2.hidden {
        if !hidden.contains(name) {
            hidden.push(name.clone());
        }
    }

    let table = hidden_assignments(&hidden)
        .map(|assignment| {
            let probability = f1.value_at(&assignment) * f2.value_at(&assignment);
            FactorRow {
                assignment,
                probability,
            }
        })
        .collect();

    Factor {
        variable: None,
        parents: Vec::new(),
        hidden,
        table,
    }
}

/// Eliminate `variable` by summing over both of its values.
///
/// Summing out a variable the factor does not mention returns an equivalent
/// factor.
pub fn sum_out(variable: &str, factor: &Factor) -> Factor {
    let hidden: Vec<String> = factor
        .hidden
        .iter()
        .filter(|h| h.as_str() != variable)
        .cloned()
        .collect();

    let table = hidden_assignments(&hidden)
        .map(|assignment| {
            let probability = factor
                .table
                .iter()
                .filter(|row| consistent(&row.assignment, &assignment))
                .map(|row| row.probability)
                .sum();
            FactorRow {
                assignment,
                probability,
            }
        })
        .collect();

    Factor {
        variable: factor.variable.clone(),
        parents: factor.parents.clone(),
        hidden,
        table,
    }
}

/// Two assignments are consistent when they agree on every shared variable.
///
/// Variables present in only one side are ignored, so the predicate does not
/// care which argument is the larger assignment.
pub fn consistent(a: &Assignment, b: &Assignment) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .all(|(name, value)| large.get(name).map_or(true, |other| other == value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(&str, bool)]) -> Assignment {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn a() -> Variable {
        Variable::new("A").with_cpt([(0.6, 0.4)])
    }

    fn b() -> Variable {
        Variable::new("B")
            .with_parents(["A"])
            .with_cpt([(0.8, 0.2), (0.3, 0.7)])
    }

    #[test]
    fn test_make_factor_without_evidence() {
        let f = make_factor(&b(), &Evidence::new()).unwrap();
        assert_eq!(f.variable(), Some("B"));
        assert_eq!(f.hidden(), ["B".to_string(), "A".to_string()]);
        assert_eq!(f.len(), 4);
        assert_eq!(f.value_at(&assignment(&[("A", true), ("B", true)])), 0.8);
        assert_eq!(f.value_at(&assignment(&[("A", false), ("B", false)])), 0.7);
    }

    #[test]
    fn test_make_factor_substitutes_evidence() {
        let evidence: Evidence = [("A".to_string(), false)].into_iter().collect();
        let f = make_factor(&b(), &evidence).unwrap();
        assert_eq!(f.hidden(), ["B".to_string()]);
        assert_eq!(f.probability_of("B", true), Some(0.3));
        assert_eq!(f.probability_of("B", false), Some(0.7));
    }

    #[test]
    fn test_make_factor_fully_observed() {
        let evidence: Evidence = [("A".to_string(), true), ("B".to_string(), false)]
            .into_iter()
            .collect();
        let f = make_factor(&b(), &evidence).unwrap();
        assert!(f.hidden().is_empty());
        assert_eq!(f.len(), 1);
        assert_eq!(f.table()[0].probability, 0.2);
    }

    #[test]
    fn test_product_is_joint() {
        let fa = make_factor(&a(), &Evidence::new()).unwrap();
        let fb = make_factor(&b(), &Evidence::new()).unwrap();
        let joint = point_wise_product(&fa, &fb);
        assert_eq!(joint.len(), 4);
        assert!(joint.variable().is_none());
        let p = joint.value_at(&assignment(&[("A", false), ("B", true)]));
        assert!((p - 0.4 * 0.3).abs() < 1e-12);
        let total: f64 = joint.table().iter().map(|r| r.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum_out_gives_marginal() {
        let fa = make_factor(&a(), &Evidence::new()).unwrap();
        let fb = make_factor(&b(), &Evidence::new()).unwrap();
        let marginal = sum_out("A", &point_wise_product(&fa, &fb));
        assert_eq!(marginal.hidden(), ["B".to_string()]);
        assert!((marginal.probability_of("B", true).unwrap() - 0.6).abs() < 1e-12);
        assert!((marginal.probability_of("B", false).unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_sum_out_absent_variable_is_identity() {
        let fb = make_factor(&b(), &Evidence::new()).unwrap();
        let same = sum_out("Z", &fb);
        assert_eq!(same.hidden(), fb.hidden());
        for row in fb.table() {
            assert_eq!(same.value_at(&row.assignment), row.probability);
        }
    }

    #[test]
    fn test_consistent() {
        let big = assignment(&[("A", true), ("B", false), ("C", true)]);
        let agree = assignment(&[("A", true)]);
        let clash = assignment(&[("B", true)]);
        let disjoint = assignment(&[("D", false)]);

        assert!(consistent(&big, &agree));
        assert!(consistent(&agree, &big));
        assert!(!consistent(&big, &clash));
        assert!(!consistent(&clash, &big));
        assert!(consistent(&big, &disjoint));
        assert!(consistent(&Assignment::new(), &big));
    }
}
