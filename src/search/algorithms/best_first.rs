use std::iter::FusedIterator;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    common::MinFHeap,
    node::{Node, NodeArena, NodeId, Solution},
    problem::Problem,
};

/// Best-first search over `node_value`, lowest first, ties in FIFO order.
///
/// In graph mode a generated child is dropped when its state was already
/// reached at the same or a lower cost. With a `cost_limit`, children costing
/// more than the limit are pruned before they are queued.
pub fn best_first_search<P: Problem>(
    problem: &P,
    graph: bool,
    cost_limit: Option<f64>,
) -> BestFirstSearch<'_, P> {
    BestFirstSearch::new(problem, graph, cost_limit)
}

pub struct BestFirstSearch<'p, P: Problem> {
    problem: &'p P,
    graph: bool,
    cost_limit: Option<f64>,
    arena: NodeArena<P::State, P::Action>,
    frontier: MinFHeap<NodeId>,
    closed: FxHashMap<P::State, f64>,
    min_pruned: Option<f64>,
    expansions: usize,
}

impl<'p, P: Problem> BestFirstSearch<'p, P> {
    pub fn new(problem: &'p P, graph: bool, cost_limit: Option<f64>) -> Self {
        let mut search = Self {
            problem,
            graph,
            cost_limit,
            arena: NodeArena::new(),
            frontier: MinFHeap::new(),
            closed: FxHashMap::default(),
            min_pruned: None,
            expansions: 0,
        };
        let root = problem.initial_node();
        if graph {
            search.closed.insert(root.state.clone(), root.cost);
        }
        search.queue(root);
        search
    }

    /// Smallest cost among the children pruned by `cost_limit` so far
    pub const fn min_pruned_cost(&self) -> Option<f64> {
        self.min_pruned
    }

    /// Number of nodes expanded so far
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// Number of nodes created so far (queued or already expanded)
    pub fn generated(&self) -> usize {
        self.arena.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    fn queue(&mut self, node: Node<P::State, P::Action>) {
        let value = self.problem.node_value(&node);
        let id = self.arena.insert(node);
        self.frontier.push(value, id);
    }

    fn admit(&mut self, child: &Node<P::State, P::Action>) -> bool {
        // duplicates are not pruned nodes, they must not move the next bound
        if self.graph
            && self.closed.get(&child.state).is_some_and(|&seen| seen <= child.cost)
        {
            return false;
        }
        if let Some(limit) = self.cost_limit {
            if child.cost > limit {
                self.min_pruned = Some(
                    self.min_pruned.map_or(child.cost, |c| c.min(child.cost)),
                );
                return false;
            }
        }
        if self.graph {
            self.closed.insert(child.state.clone(), child.cost);
        }
        true
    }

    fn expand(&mut self, id: NodeId) {
        let problem = self.problem;
        let parent = self.arena.get(id);
        let depth = parent.depth;
        self.expansions += 1;
        for transition in problem.successors(parent) {
            let child = Node::child(id, depth, transition);
            if self.admit(&child) {
                self.queue(child);
            }
        }
    }
}

impl<P: Problem> Iterator for BestFirstSearch<'_, P> {
    type Item = Solution<P::State, P::Action>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((value, id)) = self.frontier.pop() {
            if self.problem.goal_test(self.arena.get(id)) {
                trace!(value, expansions = self.expansions, "goal reached");
                return Some(self.arena.solution(id));
            }
            self.expand(id);
        }
        None
    }
}

impl<P: Problem> FusedIterator for BestFirstSearch<'_, P> {}
