use std::{hash::Hash, iter::FusedIterator, time::Instant};

use human_repr::{HumanDuration, HumanThroughput};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use tracing::{info, trace};

use crate::{
    common::{MinFHeap, Side},
    node::{Node, NodeArena, NodeId, Solution},
    problem::ReversibleProblem,
};

/// Cheapest known connection between the two halves of a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Meeting {
    pub(super) cost: f64,
    pub(super) forward: NodeId,
    pub(super) backward: NodeId,
}

impl Meeting {
    /// `id` was published by `side`, `other` by the opposite side
    pub(super) const fn new(side: Side, id: NodeId, other: NodeId, cost: f64) -> Self {
        match side {
            Side::Forward => Self { cost, forward: id, backward: other },
            Side::Backward => Self { cost, forward: other, backward: id },
        }
    }
}

/// One direction of a bidirectional search: a uniform-cost frontier with its
/// own arena and the best cost found so far for every reached state
#[derive(Debug)]
pub(super) struct Half<S, A> {
    pub(super) side: Side,
    pub(super) arena: NodeArena<S, A>,
    frontier: MinFHeap<NodeId>,
    best: FxHashMap<S, (f64, NodeId)>,
    pub(super) expansions: usize,
}

impl<S: Clone + Eq + Hash, A> Half<S, A> {
    pub(super) fn new(side: Side, root: Node<S, A>) -> Self {
        let mut half = Self {
            side,
            arena: NodeArena::new(),
            frontier: MinFHeap::new(),
            best: FxHashMap::default(),
            expansions: 0,
        };
        let (state, cost) = (root.state.clone(), root.cost);
        let id = half.arena.insert(root);
        half.best.insert(state, (cost, id));
        half.frontier.push(cost, id);
        half
    }

    /// The root is always the first node of the arena
    pub(super) fn root(&self) -> NodeId {
        NodeId::from_index(0)
    }

    /// Best cost and node for `state` reached from this side
    pub(super) fn best(&self, state: &S) -> Option<(f64, NodeId)> {
        self.best.get(state).copied()
    }

    fn is_stale(&self, id: NodeId) -> bool {
        let node = self.arena.get(id);
        self.best.get(&node.state).map_or(true, |&(_, best)| best != id)
    }

    /// Smallest priority on the frontier, `+inf` once it is empty
    pub(super) fn peek_min(&mut self) -> f64 {
        while let Some((cost, &id)) = self.frontier.peek() {
            if !self.is_stale(id) {
                return cost;
            }
            self.frontier.pop();
        }
        f64::INFINITY
    }

    pub(super) fn pop_fresh(&mut self) -> Option<NodeId> {
        while let Some((_, id)) = self.frontier.pop() {
            if !self.is_stale(id) {
                return Some(id);
            }
        }
        None
    }

    /// Expand `id` in this side's direction, pushing every node that improved
    /// the best cost of its state onto `improved`
    pub(super) fn expand<P>(&mut self, problem: &P, id: NodeId, improved: &mut Vec<NodeId>)
    where
        P: ReversibleProblem<State = S, Action = A>,
    {
        self.expansions += 1;
        let parent = self.arena.get(id);
        let depth = parent.depth;
        let children = match self.side {
            Side::Forward => problem.successors(parent),
            Side::Backward => problem.predecessors(parent),
        };
        for transition in children {
            if self
                .best
                .get(&transition.state)
                .is_some_and(|&(seen, _)| seen <= transition.cost)
            {
                continue;
            }
            let child = Node::child(id, depth, transition);
            let (state, cost) = (child.state.clone(), child.cost);
            let child_id = self.arena.insert(child);
            self.best.insert(state, (cost, child_id));
            self.frontier.push(cost, child_id);
            improved.push(child_id);
        }
    }
}

/// Stitch the forward path to the meeting node onto the reversed backward
/// path from it.
///
/// Backward nodes are re-costed as forward costs and take over the action of
/// the node they were expanded from. Parent ids in the result are indices
/// into the returned path, the two arenas share no id space.
pub(super) fn join_path<S: Clone, A: Clone>(
    forward: &NodeArena<S, A>,
    backward: &NodeArena<S, A>,
    meeting: Meeting,
) -> Solution<S, A> {
    let mut path = forward.path(meeting.forward);
    let g_forward = forward.get(meeting.forward).cost;
    let g_backward = backward.get(meeting.backward).cost;
    for (prev, next) in backward
        .ancestors(meeting.backward)
        .map(|id| backward.get(id))
        .tuple_windows()
    {
        let depth = path.len();
        path.push(Node {
            state: next.state.clone(),
            parent: None,
            action: prev.action.clone(),
            cost: g_forward + (g_backward - next.cost),
            depth,
        });
    }
    for (index, node) in path.iter_mut().enumerate() {
        node.parent = index.checked_sub(1).map(NodeId::from_index);
    }
    Solution::from_path(path)
}

/// Front-to-end bidirectional uniform-cost search.
///
/// Expands whichever side has the cheaper frontier minimum and stops once the
/// two minima add up to at least the best meeting cost. Yields at most one,
/// cost-optimal, solution. The goal is `problem.goal()`, `goal_test` is not
/// consulted.
pub fn bidirectional_search<P: ReversibleProblem>(problem: &P) -> BidirectionalSearch<'_, P> {
    BidirectionalSearch::new(problem)
}

pub struct BidirectionalSearch<'p, P: ReversibleProblem> {
    problem: &'p P,
    forward: Half<P::State, P::Action>,
    backward: Half<P::State, P::Action>,
    best: Option<Meeting>,
    finished: bool,
}

impl<'p, P: ReversibleProblem> BidirectionalSearch<'p, P> {
    pub fn new(problem: &'p P) -> Self {
        let forward = Half::new(Side::Forward, problem.initial_node());
        let backward = Half::new(Side::Backward, problem.goal_node());
        let mut search = Self { problem, forward, backward, best: None, finished: false };
        let goal = search.backward.root();
        search.check_meetings(Side::Backward, &[goal]);
        search
    }

    /// Nodes expanded so far on `side`
    pub const fn expansions(&self, side: Side) -> usize {
        match side {
            Side::Forward => self.forward.expansions,
            Side::Backward => self.backward.expansions,
        }
    }

    /// Cost of the best meeting found so far
    pub fn best_cost(&self) -> Option<f64> {
        self.best.map(|m| m.cost)
    }

    fn bound(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |m| m.cost)
    }

    fn check_meetings(&mut self, side: Side, improved: &[NodeId]) {
        let (this, other) = match side {
            Side::Forward => (&self.forward, &self.backward),
            Side::Backward => (&self.backward, &self.forward),
        };
        for &id in improved {
            let node = this.arena.get(id);
            let Some((other_cost, other_id)) = other.best(&node.state) else {
                continue;
            };
            let cost = node.cost + other_cost;
            if cost < self.bound() {
                trace!(%side, state = ?node.state, cost, "meeting improved");
                self.best = Some(Meeting::new(side, id, other_id, cost));
            }
        }
    }

    fn run(&mut self) {
        let t_start = Instant::now();
        let mut improved = Vec::new();
        loop {
            let (min_f, min_b) = (self.forward.peek_min(), self.backward.peek_min());
            if min_f + min_b >= self.bound() {
                break;
            }
            let side = if min_f <= min_b { Side::Forward } else { Side::Backward };
            let half = match side {
                Side::Forward => &mut self.forward,
                Side::Backward => &mut self.backward,
            };
            let Some(id) = half.pop_fresh() else { break };
            improved.clear();
            half.expand(self.problem, id, &mut improved);
            self.check_meetings(side, &improved);
        }
        let expansions = self.forward.expansions + self.backward.expansions;
        let rate = expansions as f64 / t_start.elapsed().as_secs_f64();
        info!(
            "Bidirectional search took: {:.2}, {:.2}, cost: {:?}",
            t_start.elapsed().human_duration(),
            rate.human_throughput(" nodes"),
            self.best_cost()
        );
    }
}

impl<P: ReversibleProblem> Iterator for BidirectionalSearch<'_, P> {
    type Item = Solution<P::State, P::Action>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.run();
        self.finished = true;
        self.best
            .map(|meeting| join_path(&self.forward.arena, &self.backward.arena, meeting))
    }
}

impl<P: ReversibleProblem> FusedIterator for BidirectionalSearch<'_, P> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use crate::{
        problem::{AnnotatedProblem, Problem},
        problems::GraphProblem,
        search::best_first_search,
        testing::random_graph,
    };

    #[test]
    fn matches_uniform_cost_search_on_random_graphs() {
        for num_nodes in (50..100).step_by(2) {
            let g = random_graph(num_nodes, u64::from(num_nodes));
            let expected = best_first_search(&g, true, None).next().map(|s| s.cost());
            let mut search = bidirectional_search(&g);
            let found = search.next();
            assert_eq!(found.as_ref().map(Solution::cost), expected, "{num_nodes} nodes");
            if let Some(sol) = found {
                let states = sol.states().copied().collect::<Vec<_>>();
                assert_eq!(states.first(), Some(g.initial()));
                assert_eq!(states.last(), Some(g.goal()));
                assert_eq!(g.path_cost(&states), Some(sol.cost()));
            }
            assert!(search.next().is_none());
        }
    }

    #[test]
    fn joined_path_is_consistent() {
        // 0 -1- 1 -2- 2 -3- 3 -4- 4
        let g = GraphProblem::from_edges(
            [(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 4, 4.0)],
            0,
            4,
        );
        let sol = bidirectional_search(&g).next().unwrap();
        let path = sol.path();
        assert_eq!(sol.cost(), 10.0);
        assert_eq!(
            path.iter().map(|n| n.cost).collect::<Vec<_>>(),
            vec![0.0, 1.0, 3.0, 6.0, 10.0]
        );
        assert_eq!(
            sol.actions().copied().collect::<Vec<_>>(),
            vec![(0, 1), (1, 2), (2, 3), (3, 4)]
        );
        for (index, node) in path.iter().enumerate() {
            assert_eq!(node.depth, index);
            assert_eq!(node.parent.map(NodeId::index), index.checked_sub(1));
        }
    }

    #[test]
    fn start_equals_goal() {
        let g = GraphProblem::from_edges([(3, 4, 1.0)], 3, 3);
        let p = AnnotatedProblem::new(g);
        let mut search = bidirectional_search(&p);
        let sol = search.next().unwrap();
        assert_eq!(sol.cost(), 0.0);
        assert_eq!(sol.path().len(), 1);
        assert_eq!(p.nodes_expanded(), 0);
        assert!(search.next().is_none());
    }

    #[test]
    fn unreachable_goal_exhausts() {
        let g = GraphProblem::from_edges([(0, 1, 1.0), (1, 2, 1.0), (3, 4, 1.0)], 0, 4);
        let mut search = bidirectional_search(&g);
        assert!(search.next().is_none());
        assert!(search.best_cost().is_none());
        assert!(search.next().is_none());
    }

    #[test]
    fn prefers_cheap_detour_over_short_path() {
        let g = GraphProblem::from_edges(
            [(0, 5, 10.0), (0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 5, 1.0)],
            0,
            5,
        );
        let mut search = bidirectional_search(&g);
        let sol = search.next().unwrap();
        assert_eq!(sol.cost(), 4.0);
        assert_eq!(sol.states().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 5]);
        assert!(search.expansions(Side::Forward) > 0);
        assert!(search.expansions(Side::Backward) > 0);
    }
}
