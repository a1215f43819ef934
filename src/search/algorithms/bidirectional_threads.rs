use std::{
    any::Any,
    fmt::Debug,
    hash::Hash,
    iter::FusedIterator,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Instant,
};

use human_repr::{HumanDuration, HumanThroughput};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;
use tracing::{debug, info, trace};

use super::bidirectional::{join_path, Half, Meeting};
use crate::{
    common::{SearchError, SearchResult, Side},
    node::{NodeId, Solution},
    problem::ReversibleProblem,
};

/// Everything both workers read and write, guarded by one lock
struct Shared<S> {
    /// best published cost per state and side
    meetings: FxHashMap<S, [Option<(f64, NodeId)>; 2]>,
    best: Option<Meeting>,
    frontier_min: [f64; 2],
}

impl<S: Clone + Eq + Hash + Debug> Shared<S> {
    /// Shared region with both roots already published, so neither worker can
    /// run out of frontier before the other side's root is visible
    fn new<A>(halves: &[Half<S, A>]) -> Self {
        let mut shared =
            Self { meetings: FxHashMap::default(), best: None, frontier_min: [0.0; 2] };
        for half in halves {
            let root = half.root();
            shared.publish(half, &[root], half.arena.get(root).cost);
        }
        shared
    }

    fn bound(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |m| m.cost)
    }

    /// Record `improved` nodes of `half` and its current frontier minimum.
    ///
    /// Returns whether the search is complete.
    fn publish<A>(&mut self, half: &Half<S, A>, improved: &[NodeId], frontier_min: f64) -> bool {
        let side = half.side;
        for &id in improved {
            let node = half.arena.get(id);
            let slots = self.meetings.entry(node.state.clone()).or_default();
            slots[side.index()] = Some((node.cost, id));
            let Some((other_cost, other_id)) = slots[side.other().index()] else {
                continue;
            };
            let cost = node.cost + other_cost;
            if cost < self.bound() {
                trace!(%side, state = ?node.state, cost, "meeting improved");
                self.best = Some(Meeting::new(side, id, other_id, cost));
            }
        }
        self.frontier_min[side.index()] = frontier_min;
        self.frontier_min[0] + self.frontier_min[1] >= self.bound()
    }
}

/// Raises the stop flag when a worker leaves, including by unwinding
struct StopOnDrop<'a>(&'a AtomicBool);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

fn worker<P>(
    problem: &P,
    mut half: Half<P::State, P::Action>,
    shared: &Mutex<Shared<P::State>>,
    stop: &AtomicBool,
) -> Half<P::State, P::Action>
where
    P: ReversibleProblem,
{
    let _guard = StopOnDrop(stop);
    let mut improved = Vec::new();
    while !stop.load(Ordering::Acquire) {
        let frontier_min = half.peek_min();
        if shared.lock().publish(&half, &improved, frontier_min) {
            debug!(side = %half.side, expansions = half.expansions, "termination condition met");
            break;
        }
        improved.clear();
        let Some(id) = half.pop_fresh() else { break };
        half.expand(problem, id, &mut improved);
    }
    half
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned())
}

/// [`bidirectional_search`](super::bidirectional_search) with the forward and
/// backward halves running on two scoped threads.
///
/// The halves share a meeting table and the best meeting under one mutex.
/// Each worker publishes its frontier minimum after every expansion, and the
/// first one to see `min_f + min_b >= U` stops both. A panic in either worker
/// is returned as [`SearchError::WorkerPanicked`].
pub fn bidirectional_search_threaded<P>(problem: &P) -> BidirectionalThreadedSearch<'_, P>
where
    P: ReversibleProblem + Sync,
    P::State: Send + Sync,
    P::Action: Send,
{
    BidirectionalThreadedSearch::new(problem)
}

pub struct BidirectionalThreadedSearch<'p, P> {
    problem: &'p P,
    finished: bool,
}

impl<'p, P> BidirectionalThreadedSearch<'p, P>
where
    P: ReversibleProblem + Sync,
    P::State: Send + Sync,
    P::Action: Send,
{
    pub const fn new(problem: &'p P) -> Self {
        Self { problem, finished: false }
    }

    fn run(&self) -> SearchResult<Option<Solution<P::State, P::Action>>> {
        let t_start = Instant::now();
        let problem = self.problem;
        let halves = Side::iter()
            .zip([problem.initial_node(), problem.goal_node()])
            .map(|(side, root)| Half::new(side, root))
            .collect::<Vec<_>>();
        let shared = Mutex::new(Shared::new(&halves));
        let stop = AtomicBool::new(false);
        let joined = thread::scope(|s| {
            let handles = halves
                .into_iter()
                .map(|half| {
                    let side = half.side;
                    let (shared, stop) = (&shared, &stop);
                    (side, s.spawn(move || worker(problem, half, shared, stop)))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|(side, handle)| {
                    handle.join().map_err(|payload| SearchError::WorkerPanicked {
                        side,
                        reason: panic_reason(payload.as_ref()),
                    })
                })
                .collect::<Vec<_>>()
        });
        let halves = joined.into_iter().collect::<SearchResult<Vec<_>>>()?;
        let [forward, backward] = <[_; 2]>::try_from(halves)
            .map_err(|_| SearchError::from("expected one worker per side".to_owned()))?;
        let best = shared.into_inner().best;
        let expansions = forward.expansions + backward.expansions;
        let rate = expansions as f64 / t_start.elapsed().as_secs_f64();
        info!(
            "Threaded bidirectional search took: {:.2}, {:.2}, cost: {:?}",
            t_start.elapsed().human_duration(),
            rate.human_throughput(" nodes"),
            best.map(|m| m.cost)
        );
        Ok(best.map(|meeting| join_path(&forward.arena, &backward.arena, meeting)))
    }
}

impl<P> Iterator for BidirectionalThreadedSearch<'_, P>
where
    P: ReversibleProblem + Sync,
    P::State: Send + Sync,
    P::Action: Send,
{
    type Item = SearchResult<Solution<P::State, P::Action>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.run().transpose()
    }
}

impl<P> FusedIterator for BidirectionalThreadedSearch<'_, P>
where
    P: ReversibleProblem + Sync,
    P::State: Send + Sync,
    P::Action: Send,
{
}
