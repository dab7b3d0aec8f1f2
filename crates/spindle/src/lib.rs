#![forbid(unsafe_code)]

//! Interval bookkeeping and ordering search for wire-bundle lanes.
//!
//! `range` answers "which bundles compete for the same vertical band", `permute` picks the
//! left-to-right track order inside one band. Both are domain-free so they can be tested in
//! isolation from drawings and descriptions.

pub mod permute;
pub mod range;

pub use permute::{
    PermutationSearch, SearchOutcome, SearchStatus, find_best_permutation,
};
pub use range::{Range, RangeSet};
