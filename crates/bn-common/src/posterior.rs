//! The result of a single inference call.

use serde::{Deserialize, Serialize};

/// Posterior over the two outcomes of a query variable.
///
/// Approximate methods can end with nothing to normalize (every sample was
/// rejected, or every weight was zero). That outcome is reported as
/// [`Posterior::InsufficientSamples`] rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Posterior {
    /// A normalized distribution `[P(x=true | e), P(x=false | e)]`.
    Distribution { p_true: f64, p_false: f64 },
    /// The normalizing total was exactly zero.
    InsufficientSamples,
}

impl Posterior {
    /// Build a distribution from an already-normalized pair.
    pub fn from_pair(pair: [f64; 2]) -> Self {
        Posterior::Distribution {
            p_true: pair[0],
            p_false: pair[1],
        }
    }

    /// The `[p_true, p_false]` pair, if one was produced.
    pub fn as_pair(&self) -> Option<[f64; 2]> {
        match *self {
            Posterior::Distribution { p_true, p_false } => Some([p_true, p_false]),
            Posterior::InsufficientSamples => None,
        }
    }

    pub fn p_true(&self) -> Option<f64> {
        self.as_pair().map(|p| p[0])
    }

    pub fn p_false(&self) -> Option<f64> {
        self.as_pair().map(|p| p[1])
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Posterior::InsufficientSamples)
    }
}

impl std::fmt::Display for Posterior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Posterior::Distribution { p_true, p_false } => write!(f, "[{:?}, {:?}]", p_true, p_false),
            Posterior::InsufficientSamples => write!(f, "insufficient samples"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pair() {
        assert_eq!(Posterior::from_pair([0.6, 0.4]).to_string(), "[0.6, 0.4]");
        assert_eq!(Posterior::from_pair([1.0, 0.0]).to_string(), "[1.0, 0.0]");
    }

    #[test]
    fn display_insufficient() {
        assert_eq!(
            Posterior::InsufficientSamples.to_string(),
            "insufficient samples"
        );
    }

    #[test]
    fn accessors() {
        let p = Posterior::from_pair([0.75, 0.25]);
        assert_eq!(p.p_true(), Some(0.75));
        assert_eq!(p.p_false(), Some(0.25));
        assert!(!p.is_insufficient());
        assert_eq!(Posterior::InsufficientSamples.as_pair(), None);
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_string(&Posterior::from_pair([0.8, 0.2])).unwrap();
        assert!(json.contains(r#""status":"distribution""#));
        assert!(json.contains(r#""p_true":0.8"#));

        let json = serde_json::to_string(&Posterior::InsufficientSamples).unwrap();
        assert_eq!(json, r#"{"status":"insufficient_samples"}"#);
    }
}
