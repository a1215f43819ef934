//! Shortest paths over a weighted, undirected graph
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::{
    node::{Node, Transition},
    problem::{Problem, ReversibleProblem, Successors},
};

/// Edge label: `(from, to)` in the direction of travel
pub type Edge = (u32, u32);

#[derive(Debug, Clone, Default)]
pub struct GraphProblem {
    adjacency: FxHashMap<u32, Vec<(u32, f64)>>,
    /// vertices in order of first appearance
    order: Vec<u32>,
    initial: u32,
    goal: u32,
}

impl GraphProblem {
    pub fn new(initial: u32, goal: u32) -> Self {
        Self { initial, goal, ..Default::default() }
    }

    /// Build a graph from `(a, b, weight)` triples.
    pub fn from_edges(
        edges: impl IntoIterator<Item = (u32, u32, f64)>,
        initial: u32,
        goal: u32,
    ) -> Self {
        let mut graph = Self::new(initial, goal);
        for (a, b, w) in edges {
            graph.add_edge(a, b, w);
        }
        graph
    }

    /// Add an undirected edge, replacing the weight of an existing one
    pub fn add_edge(&mut self, a: u32, b: u32, weight: f64) {
        self.link(a, b, weight);
        if a != b {
            self.link(b, a, weight);
        }
    }

    fn link(&mut self, from: u32, to: u32, weight: f64) {
        if !self.adjacency.contains_key(&from) {
            self.order.push(from);
        }
        let edges = self.adjacency.entry(from).or_default();
        match edges.iter_mut().find(|(n, _)| *n == to) {
            Some(edge) => edge.1 = weight,
            None => edges.push((to, weight)),
        }
    }

    pub fn set_endpoints(&mut self, initial: u32, goal: u32) {
        self.initial = initial;
        self.goal = goal;
    }

    /// Vertices in the order they were first added
    pub fn vertices(&self) -> &[u32] {
        &self.order
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn neighbours(&self, vertex: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.adjacency.get(&vertex).into_iter().flatten().copied()
    }

    pub fn weight(&self, a: u32, b: u32) -> Option<f64> {
        self.neighbours(a).find_map(|(n, w)| (n == b).then_some(w))
    }

    /// Sum of edge weights along `path`, `None` if two consecutive vertices
    /// aren't adjacent
    pub fn path_cost(&self, path: &[u32]) -> Option<f64> {
        path.iter()
            .tuple_windows()
            .map(|(&a, &b)| self.weight(a, b))
            .sum()
    }
}

impl Problem for GraphProblem {
    type State = u32;
    type Action = Edge;

    fn initial(&self) -> &u32 {
        &self.initial
    }

    fn goal(&self) -> &u32 {
        &self.goal
    }

    fn successors<'a>(&'a self, node: &Node<u32, Edge>) -> Successors<'a, u32, Edge> {
        let (from, cost) = (node.state, node.cost);
        Box::new(
            self.neighbours(from)
                .map(move |(to, w)| Transition::new(to, (from, to), cost + w)),
        )
    }
}

impl ReversibleProblem for GraphProblem {
    fn predecessors<'a>(&'a self, node: &Node<u32, Edge>) -> Successors<'a, u32, Edge> {
        let (to, cost) = (node.state, node.cost);
        Box::new(
            self.neighbours(to)
                .map(move |(from, w)| Transition::new(from, (from, to), cost + w)),
        )
    }
}
