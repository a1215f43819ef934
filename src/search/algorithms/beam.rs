use std::iter::FusedIterator;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{
    common::F64,
    node::{Node, NodeArena, NodeId, Solution},
    problem::Problem,
};

/// Layered search that keeps only the `beam_width` best children per layer.
///
/// Every node of a layer is goal-tested before the layer is expanded. The
/// children of the whole layer are ranked by `node_value` (ties keep
/// generation order) and cut down to `beam_width`; the rest are gone for good.
/// A width of zero admits nothing and the search is exhausted immediately.
pub fn beam_search<P: Problem>(
    problem: &P,
    beam_width: usize,
    graph: bool,
) -> BeamSearch<'_, P> {
    BeamSearch::new(problem, beam_width, graph)
}

pub struct BeamSearch<'p, P: Problem> {
    problem: &'p P,
    beam_width: usize,
    graph: bool,
    arena: NodeArena<P::State, P::Action>,
    closed: FxHashMap<P::State, f64>,
    layer: Vec<NodeId>,
    /// next node of `layer` to goal-test
    cursor: usize,
    depth: usize,
    truncated: bool,
}

impl<'p, P: Problem> BeamSearch<'p, P> {
    pub fn new(problem: &'p P, beam_width: usize, graph: bool) -> Self {
        let mut search = Self {
            problem,
            beam_width,
            graph,
            arena: NodeArena::new(),
            closed: FxHashMap::default(),
            layer: Vec::new(),
            cursor: 0,
            depth: 0,
            truncated: false,
        };
        if beam_width == 0 {
            warn!("beam width of 0 admits no nodes, search is exhausted");
            return search;
        }
        let root = problem.initial_node();
        if graph {
            search.closed.insert(root.state.clone(), root.cost);
        }
        let id = search.arena.insert(root);
        search.layer.push(id);
        search
    }

    pub const fn beam_width(&self) -> usize {
        self.beam_width
    }

    /// Whether any layer had to drop candidates to fit the beam
    pub const fn truncated(&self) -> bool {
        self.truncated
    }

    /// Depth of the layer currently being processed
    pub const fn depth(&self) -> usize {
        self.depth
    }

    fn admit(&mut self, child: &Node<P::State, P::Action>) -> bool {
        if !self.graph {
            return true;
        }
        if self.closed.get(&child.state).is_some_and(|&seen| seen <= child.cost) {
            return false;
        }
        self.closed.insert(child.state.clone(), child.cost);
        true
    }

    /// Expand every node of the current layer and keep the best children
    fn advance(&mut self) {
        let problem = self.problem;
        let mut candidates: Vec<(F64, NodeId)> = Vec::new();
        for id in std::mem::take(&mut self.layer) {
            let parent = self.arena.get(id);
            let depth = parent.depth;
            for transition in problem.successors(parent) {
                let child = Node::child(id, depth, transition);
                if self.admit(&child) {
                    let value = F64(problem.node_value(&child));
                    candidates.push((value, self.arena.insert(child)));
                }
            }
        }
        let generated = candidates.len();
        // stable, equal values stay in generation order
        candidates.sort_by_key(|&(value, _)| value);
        if candidates.len() > self.beam_width {
            self.truncated = true;
            candidates.truncate(self.beam_width);
        }
        self.depth += 1;
        self.cursor = 0;
        self.layer = candidates.into_iter().map(|(_, id)| id).collect();
        debug!(
            depth = self.depth,
            generated,
            kept = self.layer.len(),
            beam_width = self.beam_width,
            "beam layer"
        );
    }
}

impl<P: Problem> Iterator for BeamSearch<'_, P> {
    type Item = Solution<P::State, P::Action>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.layer.is_empty() {
            while let Some(&id) = self.layer.get(self.cursor) {
                self.cursor += 1;
                if self.problem.goal_test(self.arena.get(id)) {
                    return Some(self.arena.solution(id));
                }
            }
            self.advance();
        }
        None
    }
}

impl<P: Problem> FusedIterator for BeamSearch<'_, P> {}
