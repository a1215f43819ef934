//! Problems shared by the unit tests
#![allow(clippy::unwrap_used)]
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    node::{Node, Transition},
    problem::{Problem, ReversibleProblem, Successors},
    problems::GraphProblem,
};

/// Every state has two identical children one step further along
#[derive(Debug, Clone)]
pub struct EasyProblem {
    initial: i64,
    goal: i64,
}

impl EasyProblem {
    pub const fn new(initial: i64, goal: i64) -> Self {
        Self { initial, goal }
    }
}

fn twins<'a>(node: &Node<i64, &'static str>) -> Successors<'a, i64, &'static str> {
    let child = Transition::new(node.state + 1, "expand", node.cost + 1.0);
    Box::new([child.clone(), child].into_iter())
}

impl Problem for EasyProblem {
    type State = i64;
    type Action = &'static str;

    fn initial(&self) -> &i64 {
        &self.initial
    }

    fn goal(&self) -> &i64 {
        &self.goal
    }

    fn successors<'a>(
        &'a self,
        node: &Node<i64, &'static str>,
    ) -> Successors<'a, i64, &'static str> {
        twins(node)
    }
}

/// Like [`EasyProblem`] with a perfect distance-to-goal heuristic
#[derive(Debug, Clone)]
pub struct HeuristicEasyProblem(EasyProblem);

impl HeuristicEasyProblem {
    pub const fn new(initial: i64, goal: i64) -> Self {
        Self(EasyProblem::new(initial, goal))
    }
}

impl Problem for HeuristicEasyProblem {
    type State = i64;
    type Action = &'static str;

    fn initial(&self) -> &i64 {
        self.0.initial()
    }

    fn goal(&self) -> &i64 {
        self.0.goal()
    }

    fn successors<'a>(
        &'a self,
        node: &Node<i64, &'static str>,
    ) -> Successors<'a, i64, &'static str> {
        twins(node)
    }

    fn node_value(&self, node: &Node<i64, &'static str>) -> f64 {
        (self.0.goal - node.state).abs() as f64
    }
}

/// A line from -15 to 15 whose heuristic points away from the goal
#[derive(Debug, Clone)]
pub struct HeuristicHardProblem {
    initial: i64,
    goal: i64,
}

impl HeuristicHardProblem {
    pub const fn new(initial: i64, goal: i64) -> Self {
        Self { initial, goal }
    }
}

impl Problem for HeuristicHardProblem {
    type State = i64;
    type Action = &'static str;

    fn initial(&self) -> &i64 {
        &self.initial
    }

    fn goal(&self) -> &i64 {
        &self.goal
    }

    fn successors<'a>(
        &'a self,
        node: &Node<i64, &'static str>,
    ) -> Successors<'a, i64, &'static str> {
        let (state, cost) = (node.state, node.cost);
        let up = (state < 15).then(|| Transition::new(state + 1, "up", cost + 1.0));
        let down =
            (state > -15).then(|| Transition::new(state - 1, "down", cost + 1.0));
        Box::new(up.into_iter().chain(down))
    }

    fn node_value(&self, node: &Node<i64, &'static str>) -> f64 {
        -((self.goal - node.state).abs() as f64)
    }
}

/// Graph that panics as soon as it is expanded in either direction
#[derive(Debug, Clone)]
pub struct BrokenGraph(pub GraphProblem);

impl Problem for BrokenGraph {
    type State = u32;
    type Action = (u32, u32);

    fn initial(&self) -> &u32 {
        self.0.initial()
    }

    fn goal(&self) -> &u32 {
        self.0.goal()
    }

    fn successors<'a>(
        &'a self,
        _node: &Node<u32, (u32, u32)>,
    ) -> Successors<'a, u32, (u32, u32)> {
        panic!("adjacency unavailable")
    }
}

impl ReversibleProblem for BrokenGraph {
    fn predecessors<'a>(
        &'a self,
        _node: &Node<u32, (u32, u32)>,
    ) -> Successors<'a, u32, (u32, u32)> {
        panic!("adjacency unavailable")
    }
}

/// Random graph over `num_nodes` vertices: each pair is joined with
/// probability 1/10 by an edge of integral weight in `10..15`. The search runs
/// from the first vertex that received an edge to the last one.
pub fn random_graph(num_nodes: u32, seed: u64) -> GraphProblem {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = GraphProblem::default();
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if rng.gen_bool(0.1) {
                let weight = f64::from(rng.gen_range(10u32..15));
                graph.add_edge(i, j, weight);
            }
        }
    }
    let vertices = graph.vertices();
    let (first, last) = (*vertices.first().unwrap(), *vertices.last().unwrap());
    graph.set_endpoints(first, last);
    graph
}
