//! Exact inference: enumeration and variable elimination.

pub mod elimination;
pub mod enumeration;

pub use elimination::{elimination_ask, elimination_weights};
pub use enumeration::{enumerate_all, enumerate_ask, enumeration_weights};
