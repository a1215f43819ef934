//! Search strategies and the [`SearchMode`] dispatcher
mod algorithms;
mod mode;

pub use algorithms::*;
pub use mode::{SearchMode, Strategy};

use crate::{
    common::{SearchError, SearchResult},
    node::Solution,
    problem::{Problem, ReversibleProblem},
};

pub type Solutions<'p, S, A> = Box<dyn Iterator<Item = SearchResult<Solution<S, A>>> + 'p>;

fn infallible<'p, S: 'p, A: 'p>(
    solutions: impl Iterator<Item = Solution<S, A>> + 'p,
) -> Solutions<'p, S, A> {
    Box::new(solutions.map(Ok::<_, SearchError>))
}

/// Run a forward-only strategy configured by `mode` on `problem`.
///
/// Accepts any [`Problem`]; the bidirectional modes need predecessors and are
/// rejected with [`SearchError::InvalidMode`], use [`search`] for those.
pub fn search_forward<'p, P: Problem>(
    problem: &'p P,
    mode: &SearchMode,
) -> SearchResult<Solutions<'p, P::State, P::Action>> {
    mode.validate()?;
    tracing::debug!(strategy = %mode.strategy(), "{mode}");
    let solutions = match *mode {
        SearchMode::BestFirst { graph, cost_limit } => {
            infallible(best_first_search(problem, graph, cost_limit))
        }
        SearchMode::IterativeDeepening { graph, max_cost_limit } => infallible(
            iterative_deepening_best_first_search(problem, graph, max_cost_limit),
        ),
        SearchMode::BeamSearch { beam_width, graph } => {
            infallible(beam_search(problem, beam_width, graph))
        }
        SearchMode::WideningBeamSearch { graph, max_beam_width } => {
            infallible(widening_beam_search(problem, graph, max_beam_width))
        }
        SearchMode::Bidirectional | SearchMode::BidirectionalThreaded => {
            return Err(SearchError::InvalidMode(format!(
                "{} needs a reversible problem",
                mode.name()
            )));
        }
    };
    Ok(solutions)
}

/// Run the strategy configured by `mode` on `problem`.
///
/// Fails only if `mode` does not validate, search errors are reported through
/// the returned iterator.
pub fn search<'p, P>(
    problem: &'p P,
    mode: &SearchMode,
) -> SearchResult<Solutions<'p, P::State, P::Action>>
where
    P: ReversibleProblem + Sync,
    P::State: Send + Sync,
    P::Action: Send,
{
    if !matches!(mode, SearchMode::Bidirectional | SearchMode::BidirectionalThreaded) {
        return search_forward(problem, mode);
    }
    mode.validate()?;
    tracing::debug!(strategy = %mode.strategy(), "{mode}");
    let solutions: Solutions<'p, _, _> = if matches!(mode, SearchMode::Bidirectional) {
        infallible(bidirectional_search(problem))
    } else {
        Box::new(bidirectional_search_threaded(problem))
    };
    Ok(solutions)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        problems::GraphProblem,
        testing::{random_graph, EasyProblem},
    };

    fn mode_for(strategy: Strategy) -> SearchMode {
        match strategy {
            Strategy::BestFirst => SearchMode::default(),
            Strategy::IterativeDeepening => {
                SearchMode::IterativeDeepening { graph: true, max_cost_limit: None }
            }
            Strategy::BeamSearch => SearchMode::BeamSearch { beam_width: 1024, graph: true },
            Strategy::WideningBeamSearch => {
                SearchMode::WideningBeamSearch { graph: true, max_beam_width: None }
            }
            Strategy::Bidirectional => SearchMode::Bidirectional,
            Strategy::BidirectionalThreaded => SearchMode::BidirectionalThreaded,
        }
    }

    #[test]
    fn every_strategy_solves_a_small_graph() {
        let g = GraphProblem::from_edges(
            [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 4, 2.0), (4, 3, 2.0)],
            0,
            3,
        );
        for strategy in Strategy::iter() {
            let mode = mode_for(strategy);
            let sol = search(&g, &mode).unwrap().next().unwrap().unwrap();
            assert_eq!(*sol.state(), 3, "{strategy}");
            assert_eq!(
                g.path_cost(&sol.states().copied().collect::<Vec<_>>()),
                Some(sol.cost()),
                "{strategy}"
            );
        }
    }

    #[test]
    fn optimal_strategies_agree_on_cost() {
        let g = random_graph(60, 7);
        let costs = [Strategy::BestFirst, Strategy::Bidirectional, Strategy::BidirectionalThreaded]
            .into_iter()
            .map(|strategy| {
                search(&g, &mode_for(strategy))
                    .unwrap()
                    .next()
                    .transpose()
                    .unwrap()
                    .map(|sol| sol.cost())
            })
            .collect::<Vec<_>>();
        assert!(costs.windows(2).all(|w| w[0] == w[1]), "{costs:?}");
    }

    #[test]
    fn invalid_mode_is_rejected_before_searching() {
        let g = GraphProblem::from_edges([(0, 1, 1.0)], 0, 1);
        let mode = SearchMode::BeamSearch { beam_width: 0, graph: true };
        assert!(matches!(search(&g, &mode), Err(SearchError::InvalidMode(_))));
    }

    #[test]
    fn forward_strategies_need_no_predecessors() {
        let p = EasyProblem::new(0, 6);
        let forward = Strategy::iter()
            .filter(|s| !matches!(s, Strategy::Bidirectional | Strategy::BidirectionalThreaded));
        for strategy in forward {
            let sol = search_forward(&p, &mode_for(strategy)).unwrap().next().unwrap().unwrap();
            assert_eq!(*sol.state(), 6, "{strategy}");
            assert_eq!(sol.cost(), 6.0, "{strategy}");
        }
    }

    #[test]
    fn forward_search_rejects_bidirectional_modes() {
        let p = EasyProblem::new(0, 3);
        for mode in [SearchMode::Bidirectional, SearchMode::BidirectionalThreaded] {
            assert!(matches!(search_forward(&p, &mode), Err(SearchError::InvalidMode(_))));
        }
    }
}
