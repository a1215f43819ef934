use std::iter::FusedIterator;

use tracing::debug;

use super::best_first::BestFirstSearch;
use crate::{node::Solution, problem::Problem};

/// Repeated cost-bounded [`best_first_search`](super::best_first_search).
///
/// The first bound is the root's `node_value`. When an attempt finds nothing,
/// the next bound is the cheapest child the previous attempt pruned, so every
/// attempt admits at least one more node than the last. An attempt that does
/// find solutions is drained and ends the sequence.
pub fn iterative_deepening_best_first_search<P: Problem>(
    problem: &P,
    graph: bool,
    max_cost_limit: Option<f64>,
) -> IterativeDeepeningSearch<'_, P> {
    IterativeDeepeningSearch::new(problem, graph, max_cost_limit)
}

pub struct IterativeDeepeningSearch<'p, P: Problem> {
    problem: &'p P,
    graph: bool,
    max_cost_limit: Option<f64>,
    attempt: Option<BestFirstSearch<'p, P>>,
    cost_limit: f64,
    attempts: usize,
    found: bool,
}

impl<'p, P: Problem> IterativeDeepeningSearch<'p, P> {
    pub fn new(problem: &'p P, graph: bool, max_cost_limit: Option<f64>) -> Self {
        let cost_limit = problem.node_value(&problem.initial_node());
        let mut search = Self {
            problem,
            graph,
            max_cost_limit,
            attempt: None,
            cost_limit,
            attempts: 0,
            found: false,
        };
        search.start(cost_limit);
        search
    }

    /// Bound of the current (or last) attempt
    pub const fn cost_limit(&self) -> f64 {
        self.cost_limit
    }

    /// Number of bounded searches started so far
    pub const fn attempts(&self) -> usize {
        self.attempts
    }

    fn start(&mut self, cost_limit: f64) {
        if self.max_cost_limit.is_some_and(|max| cost_limit > max) {
            debug!(cost_limit, max = ?self.max_cost_limit, "cost limit exceeds maximum");
            self.attempt = None;
            return;
        }
        self.attempts += 1;
        self.cost_limit = cost_limit;
        debug!(attempt = self.attempts, cost_limit, "starting bounded best-first search");
        self.attempt =
            Some(BestFirstSearch::new(self.problem, self.graph, Some(cost_limit)));
    }
}

impl<P: Problem> Iterator for IterativeDeepeningSearch<'_, P> {
    type Item = Solution<P::State, P::Action>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let attempt = self.attempt.as_mut()?;
            if let Some(solution) = attempt.next() {
                self.found = true;
                return Some(solution);
            }
            let next_limit = attempt.min_pruned_cost();
            debug!(
                cost_limit = self.cost_limit,
                expansions = attempt.expansions(),
                ?next_limit,
                "bounded search exhausted"
            );
            match next_limit {
                Some(limit) if !self.found => self.start(limit),
                _ => self.attempt = None,
            }
        }
    }
}

impl<P: Problem> FusedIterator for IterativeDeepeningSearch<'_, P> {}
