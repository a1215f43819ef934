//! Search tree nodes, the arena that owns them and extracted solutions
use std::fmt::Debug;

use itertools::Itertools;

/// Index of a [`Node`] inside the [`NodeArena`] of the search that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Child produced by a problem's successor (or predecessor) function.
///
/// `cost` is the accumulated path cost of the child, not the step cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, A> {
    pub state: S,
    pub action: A,
    pub cost: f64,
}

impl<S, A> Transition<S, A> {
    pub const fn new(state: S, action: A, cost: f64) -> Self {
        Self { state, action, cost }
    }
}

/// Immutable element of a search tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node<S, A> {
    pub state: S,
    pub parent: Option<NodeId>,
    pub action: Option<A>,
    pub cost: f64,
    pub depth: usize,
}

impl<S, A> Node<S, A> {
    pub const fn root(state: S) -> Self {
        Self { state, parent: None, action: None, cost: 0.0, depth: 0 }
    }

    pub(crate) fn child(
        parent_id: NodeId,
        parent_depth: usize,
        transition: Transition<S, A>,
    ) -> Self {
        Self {
            state: transition.state,
            parent: Some(parent_id),
            action: Some(transition.action),
            cost: transition.cost,
            depth: parent_depth + 1,
        }
    }

    pub const fn cost(&self) -> f64 {
        self.cost
    }

    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Append-only node storage; parents are referenced by index
#[derive(Debug, Clone)]
pub struct NodeArena<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A> Default for NodeArena<S, A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<S, A> NodeArena<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node<S, A>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids from `id` up to (and including) its root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&id| self.get(id).parent)
    }
}

impl<S: Clone, A: Clone> NodeArena<S, A> {
    /// Root-to-`id` path, cloned out of the arena
    pub fn path(&self, id: NodeId) -> Vec<Node<S, A>> {
        let mut path = self.ancestors(id).map(|id| self.get(id).clone()).collect_vec();
        path.reverse();
        path
    }

    pub fn solution(&self, id: NodeId) -> Solution<S, A> {
        Solution::from_path(self.path(id))
    }
}

/// A goal node together with the path that reached it
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<S, A> {
    path: Vec<Node<S, A>>,
}

impl<S, A> Solution<S, A> {
    /// `path` must be non-empty and ordered root first
    pub(crate) fn from_path(path: Vec<Node<S, A>>) -> Self {
        debug_assert!(!path.is_empty(), "solution path can't be empty");
        Self { path }
    }

    pub fn node(&self) -> &Node<S, A> {
        self.path.last().unwrap_or_else(|| unreachable!())
    }

    pub fn state(&self) -> &S {
        &self.node().state
    }

    pub fn cost(&self) -> f64 {
        self.node().cost
    }

    pub fn depth(&self) -> usize {
        self.node().depth
    }

    pub fn path(&self) -> &[Node<S, A>] {
        &self.path
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.path.iter().map(|node| &node.state)
    }

    pub fn actions(&self) -> impl Iterator<Item = &A> {
        self.path.iter().filter_map(|node| node.action.as_ref())
    }
}
