//! Core math modules.

pub mod assignments;
pub mod normalize;
pub mod stable;
