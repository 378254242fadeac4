//! Scoring pipeline: query normalization, per-spread criteria matching, weighted
//! aggregation, fallback selection and localized explanation.

pub mod aggregate;
pub mod config;
pub mod explain;
pub mod fallback;
pub mod matcher;
pub mod query;
pub mod router;
pub mod service;

pub use aggregate::{RankedList, ScoredCandidate, ScoringAggregator};
pub use config::{ScoreWeights, ScoringConfig, ScoringConfigError};
pub use explain::{Explanation, ExplanationError};
pub use fallback::{select_fallback, SelectionState};
pub use matcher::{CriteriaMatch, MatchedSignal, PartialScores};
pub use query::{ConfigurationError, Query, QueryError, MAX_QUESTION_CHARS};
pub use router::{spread_router, RecommendRequest};
pub use service::{
    Alternative, BestMatch, CancellationToken, Confidence, RecommendationError,
    RecommendationResult, RecommendationService,
};

#[cfg(test)]
mod tests;
