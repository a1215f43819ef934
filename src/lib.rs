#![allow(clippy::cognitive_complexity, clippy::cast_precision_loss)]
#![deny(clippy::unwrap_in_result, clippy::unwrap_used, clippy::expect_used)]
#![warn(
    rust_2018_idioms,
    rust_2021_compatibility,
    arithmetic_overflow,
    nonstandard_style,
    clippy::disallowed_types,
    clippy::nursery,
    // clippy::pedantic
)]
//! Domain-agnostic informed search.
//!
//! Implement [`Problem`] (and [`ReversibleProblem`] for the bidirectional
//! strategies), then pull solutions out of any strategy in [`search`]. Every
//! strategy is a lazy, fused iterator; running out of solutions simply ends it.

pub mod common;
#[cfg(feature = "logging")]
pub mod logging;
pub mod node;
pub mod problem;
pub mod problems;
pub mod search;
#[cfg(test)]
mod testing;

pub use common::{SearchError, SearchResult, Side};
pub use node::{Node, NodeArena, NodeId, Solution, Transition};
pub use problem::{AnnotatedProblem, Problem, ReversibleProblem, Successors};
pub use search::{SearchMode, Strategy};
