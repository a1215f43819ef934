use std::iter::FusedIterator;

use tracing::debug;

use super::beam::BeamSearch;
use crate::{node::Solution, problem::Problem};

/// [`beam_search`](super::beam_search) from width 1, doubling the width after
/// every attempt that found nothing.
///
/// Widening stops once the next width would exceed `max_beam_width`, or when a
/// failed attempt never had to drop a candidate: a wider beam would search the
/// exact same space again.
pub fn widening_beam_search<P: Problem>(
    problem: &P,
    graph: bool,
    max_beam_width: Option<usize>,
) -> WideningBeamSearch<'_, P> {
    WideningBeamSearch::new(problem, graph, max_beam_width)
}

pub struct WideningBeamSearch<'p, P: Problem> {
    problem: &'p P,
    graph: bool,
    max_beam_width: Option<usize>,
    attempt: Option<BeamSearch<'p, P>>,
    beam_width: usize,
    found: bool,
}

impl<'p, P: Problem> WideningBeamSearch<'p, P> {
    pub fn new(problem: &'p P, graph: bool, max_beam_width: Option<usize>) -> Self {
        let mut search = Self {
            problem,
            graph,
            max_beam_width,
            attempt: None,
            beam_width: 0,
            found: false,
        };
        search.start(1);
        search
    }

    /// Width of the current (or last) attempt, 0 if none was started
    pub const fn beam_width(&self) -> usize {
        self.beam_width
    }

    fn start(&mut self, beam_width: usize) {
        if self.max_beam_width.is_some_and(|max| beam_width > max) {
            debug!(beam_width, max = ?self.max_beam_width, "beam width exceeds maximum");
            self.attempt = None;
            return;
        }
        self.beam_width = beam_width;
        debug!(beam_width, "starting beam search");
        self.attempt = Some(BeamSearch::new(self.problem, beam_width, self.graph));
    }
}

impl<P: Problem> Iterator for WideningBeamSearch<'_, P> {
    type Item = Solution<P::State, P::Action>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let attempt = self.attempt.as_mut()?;
            if let Some(solution) = attempt.next() {
                self.found = true;
                return Some(solution);
            }
            let truncated = attempt.truncated();
            debug!(
                beam_width = self.beam_width,
                depth = attempt.depth(),
                truncated,
                "beam search exhausted"
            );
            match self.beam_width.checked_mul(2) {
                Some(width) if truncated && !self.found => self.start(width),
                _ => self.attempt = None,
            }
        }
    }
}

impl<P: Problem> FusedIterator for WideningBeamSearch<'_, P> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use crate::{
        problem::AnnotatedProblem,
        problems::GraphProblem,
        testing::{EasyProblem, HeuristicHardProblem},
    };

    #[test]
    fn easy_problem_succeeds_at_width_one() {
        for goal in 1..10usize {
            let p = AnnotatedProblem::new(EasyProblem::new(0, goal as i64));
            let mut search = widening_beam_search(&p, true, None);
            let sol = search.next().unwrap();
            assert_eq!(*sol.state(), goal as i64);
            assert_eq!(search.beam_width(), 1);
            assert_eq!(p.nodes_expanded(), goal * 2);
            assert_eq!(p.goal_tests(), goal + 1);
        }
    }

    #[test]
    fn misleading_heuristic_needs_a_wider_beam() {
        for goal in 1..10 {
            let p = HeuristicHardProblem::new(0, goal);
            let mut search = widening_beam_search(&p, true, None);
            let sol = search.next().unwrap();
            assert_eq!(*sol.state(), goal);
            assert!(search.beam_width() > 1);
        }
    }

    #[test]
    fn max_beam_width_too_small_exhausts() {
        let p = HeuristicHardProblem::new(0, 10);
        let mut search = widening_beam_search(&p, true, Some(1));
        assert!(search.next().is_none());
        assert!(search.next().is_none());
        assert_eq!(search.beam_width(), 1);
    }

    #[test]
    fn stops_widening_once_nothing_was_dropped() {
        let g = GraphProblem::from_edges(
            [(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0), (4, 5, 1.0)],
            0,
            5,
        );
        let mut search = widening_beam_search(&g, true, None);
        assert!(search.next().is_none());
        // 1 and 2 drop candidates, 4 holds the whole first layer
        assert_eq!(search.beam_width(), 4);
    }
}
