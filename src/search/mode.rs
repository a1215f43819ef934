use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumIter, VariantNames};
use tracing::warn;

use crate::common::{SearchError, SearchResult};

const fn default_graph() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(Strategy))]
#[strum_discriminants(derive(EnumIter, VariantNames, Display))]
#[strum_discriminants(strum(serialize_all = "title_case"))]
#[serde(rename_all = "snake_case", tag = "strategy", deny_unknown_fields)]
pub enum SearchMode {
    #[serde(alias = "bfs")]
    #[strum_discriminants(strum(serialize = "Best-first Search"))]
    BestFirst {
        #[serde(default = "default_graph")]
        graph: bool,
        #[serde(default)]
        cost_limit: Option<f64>,
    },

    #[serde(alias = "ida")]
    #[strum_discriminants(strum(serialize = "Iterative Deepening Best-first Search"))]
    IterativeDeepening {
        #[serde(default = "default_graph")]
        graph: bool,
        #[serde(default)]
        max_cost_limit: Option<f64>,
    },

    #[serde(alias = "beam")]
    #[strum_discriminants(strum(serialize = "Beam Search"))]
    BeamSearch {
        beam_width: usize,
        #[serde(default = "default_graph")]
        graph: bool,
    },

    #[serde(alias = "wbs")]
    #[strum_discriminants(strum(serialize = "Widening Beam Search"))]
    WideningBeamSearch {
        #[serde(default = "default_graph")]
        graph: bool,
        #[serde(default)]
        max_beam_width: Option<usize>,
    },

    #[serde(alias = "bidir")]
    #[strum_discriminants(strum(serialize = "Bidirectional Search"))]
    Bidirectional,

    #[serde(alias = "bidir_threads")]
    #[strum_discriminants(strum(serialize = "Threaded Bidirectional Search"))]
    BidirectionalThreaded,
}

fn check_limit(name: &str, limit: Option<f64>) -> SearchResult<()> {
    match limit {
        Some(limit) if limit.is_nan() || limit < 0.0 => Err(SearchError::InvalidMode(
            format!("{name} must be a non-negative number, got {limit}"),
        )),
        _ => Ok(()),
    }
}

impl SearchMode {
    pub fn name(&self) -> String {
        match self {
            Self::BestFirst { cost_limit: Some(limit), .. } => format!("BFS({limit})"),
            Self::BestFirst { cost_limit: None, .. } => "BFS".to_string(),
            Self::IterativeDeepening { .. } => "IDA".to_string(),
            Self::BeamSearch { beam_width, .. } => format!("BS({beam_width})"),
            Self::WideningBeamSearch { max_beam_width: Some(max), .. } => {
                format!("WBS({max})")
            }
            Self::WideningBeamSearch { max_beam_width: None, .. } => "WBS".to_string(),
            Self::Bidirectional => "Bidir".to_string(),
            Self::BidirectionalThreaded => "Bidir(threads)".to_string(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.into()
    }

    /// Reject configurations no strategy can run with
    pub fn validate(&self) -> SearchResult<()> {
        match *self {
            Self::BestFirst { cost_limit, .. } => check_limit("cost_limit", cost_limit),
            Self::IterativeDeepening { max_cost_limit, .. } => {
                check_limit("max_cost_limit", max_cost_limit)
            }
            Self::BeamSearch { beam_width: 0, .. } => {
                warn!("rejecting beam search with a beam width of 0");
                Err(SearchError::InvalidMode("beam_width must be at least 1".to_string()))
            }
            Self::WideningBeamSearch { max_beam_width: Some(0), .. } => {
                warn!("rejecting widening beam search with a maximum beam width of 0");
                Err(SearchError::InvalidMode(
                    "max_beam_width must be at least 1".to_string(),
                ))
            }
            Self::BeamSearch { .. }
            | Self::WideningBeamSearch { .. }
            | Self::Bidirectional
            | Self::BidirectionalThreaded => Ok(()),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let search = |graph: bool| if graph { "graph search" } else { "tree search" };
        match self {
            Self::BestFirst { graph, cost_limit } => {
                write!(f, "Best-first {}", search(*graph))?;
                if let Some(limit) = cost_limit {
                    write!(f, ", cost limit: {limit}")?;
                }
                Ok(())
            }
            Self::IterativeDeepening { graph, max_cost_limit } => {
                write!(f, "Iterative deepening best-first {}", search(*graph))?;
                if let Some(limit) = max_cost_limit {
                    write!(f, ", cost limit at most {limit}")?;
                }
                Ok(())
            }
            Self::BeamSearch { beam_width, graph } => {
                write!(f, "Beam {}, beam width: {beam_width}", search(*graph))
            }
            Self::WideningBeamSearch { graph, max_beam_width } => {
                write!(f, "Widening beam {}", search(*graph))?;
                if let Some(max) = max_beam_width {
                    write!(f, ", beam width at most {max}")?;
                }
                Ok(())
            }
            Self::Bidirectional => write!(f, "Front-to-end bidirectional search"),
            Self::BidirectionalThreaded => {
                write!(f, "Front-to-end bidirectional search, one thread per direction")
            }
        }
    }
}

impl std::default::Default for SearchMode {
    fn default() -> Self {
        Self::BestFirst { graph: true, cost_limit: None }
    }
}
