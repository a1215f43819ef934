//! Ready-made problem domains
mod graph;

pub use graph::{Edge, GraphProblem};
