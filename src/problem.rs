//! The capability contract search strategies consume
use std::{
    fmt::Debug,
    hash::Hash,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::node::{Node, Transition};

pub type Successors<'a, S, A> = Box<dyn Iterator<Item = Transition<S, A>> + 'a>;

/// A state-space search problem.
///
/// Only `initial`, `goal` and `successors` are required. The defaults make
/// `goal_test` compare states and `node_value` rank nodes by path cost, which
/// turns best-first search into uniform-cost search.
pub trait Problem {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Debug;

    fn initial(&self) -> &Self::State;

    fn goal(&self) -> &Self::State;

    /// Children of `node`, generated lazily
    fn successors<'a>(
        &'a self,
        node: &Node<Self::State, Self::Action>,
    ) -> Successors<'a, Self::State, Self::Action>;

    fn goal_test(&self, node: &Node<Self::State, Self::Action>) -> bool {
        node.state == *self.goal()
    }

    /// Ranking used to order frontiers, lower is better
    fn node_value(&self, node: &Node<Self::State, Self::Action>) -> f64 {
        node.cost
    }

    fn initial_node(&self) -> Node<Self::State, Self::Action> {
        Node::root(self.initial().clone())
    }

    fn goal_node(&self) -> Node<Self::State, Self::Action> {
        Node::root(self.goal().clone())
    }
}

/// A problem that can also be expanded backwards from its goal.
///
/// `predecessors(node)` yields the states that have a transition *into*
/// `node.state`, with `cost` accumulated from the goal.
pub trait ReversibleProblem: Problem {
    fn predecessors<'a>(
        &'a self,
        node: &Node<Self::State, Self::Action>,
    ) -> Successors<'a, Self::State, Self::Action>;
}

/// Wraps a problem and counts generated nodes and goal tests
#[derive(Debug)]
pub struct AnnotatedProblem<P> {
    problem: P,
    nodes_expanded: AtomicUsize,
    goal_tests: AtomicUsize,
}

impl<P> AnnotatedProblem<P> {
    pub const fn new(problem: P) -> Self {
        Self {
            problem,
            nodes_expanded: AtomicUsize::new(0),
            goal_tests: AtomicUsize::new(0),
        }
    }

    /// Number of child nodes generated through `successors`/`predecessors`
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded.load(Ordering::Relaxed)
    }

    pub fn goal_tests(&self) -> usize {
        self.goal_tests.load(Ordering::Relaxed)
    }

    pub const fn inner(&self) -> &P {
        &self.problem
    }

    pub fn into_inner(self) -> P {
        self.problem
    }

    fn count<'a, S: 'a, A: 'a>(
        &'a self,
        children: Successors<'a, S, A>,
    ) -> Successors<'a, S, A> {
        Box::new(children.inspect(move |_| {
            self.nodes_expanded.fetch_add(1, Ordering::Relaxed);
        }))
    }
}

impl<P: Problem> Problem for AnnotatedProblem<P> {
    type State = P::State;
    type Action = P::Action;

    fn initial(&self) -> &Self::State {
        self.problem.initial()
    }

    fn goal(&self) -> &Self::State {
        self.problem.goal()
    }

    fn successors<'a>(
        &'a self,
        node: &Node<Self::State, Self::Action>,
    ) -> Successors<'a, Self::State, Self::Action> {
        self.count(self.problem.successors(node))
    }

    fn goal_test(&self, node: &Node<Self::State, Self::Action>) -> bool {
        self.goal_tests.fetch_add(1, Ordering::Relaxed);
        self.problem.goal_test(node)
    }

    fn node_value(&self, node: &Node<Self::State, Self::Action>) -> f64 {
        self.problem.node_value(node)
    }

    fn initial_node(&self) -> Node<Self::State, Self::Action> {
        self.problem.initial_node()
    }

    fn goal_node(&self) -> Node<Self::State, Self::Action> {
        self.problem.goal_node()
    }
}

impl<P: ReversibleProblem> ReversibleProblem for AnnotatedProblem<P> {
    fn predecessors<'a>(
        &'a self,
        node: &Node<Self::State, Self::Action>,
    ) -> Successors<'a, Self::State, Self::Action> {
        self.count(self.problem.predecessors(node))
    }
}
