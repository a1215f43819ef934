mod beam;
mod best_first;
mod bidirectional;
mod bidirectional_threads;
mod iterative_deepening;
mod widening_beam;

pub use beam::{beam_search, BeamSearch};
pub use best_first::{best_first_search, BestFirstSearch};
pub use bidirectional::{bidirectional_search, BidirectionalSearch};
pub use bidirectional_threads::{
    bidirectional_search_threaded, BidirectionalThreadedSearch,
};
pub use iterative_deepening::{
    iterative_deepening_best_first_search, IterativeDeepeningSearch,
};
pub use widening_beam::{widening_beam_search, WideningBeamSearch};
