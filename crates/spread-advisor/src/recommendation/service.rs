use super::aggregate::{Ranked, ScoredCandidate, ScoringAggregator};
use super::config::ScoringConfig;
use super::explain::{explain, ExplanationContext};
use super::fallback::{select_fallback, SelectionState};
use super::matcher;
use super::query::{Query, QueryError};
use crate::catalog::{Catalog, CatalogHandle, CatalogLoadError, Locale, SpreadId};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Coarse label derived from the best match's total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const HIGH_THRESHOLD: f64 = 0.6;
    pub const MEDIUM_THRESHOLD: f64 = 0.35;

    pub fn from_score(score: f64, fallback_used: bool) -> Self {
        if fallback_used {
            Confidence::Low
        } else if score >= Self::HIGH_THRESHOLD {
            Confidence::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Cooperative cancellation flag, checked between catalog entries.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("recommendation was cancelled")]
    Cancelled,
    #[error("spread catalog is empty")]
    EmptyCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatch {
    pub spread_id: SpreadId,
    pub score: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub spread_id: SpreadId,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub best_match: BestMatch,
    pub alternatives: Vec<Alternative>,
    pub explanation: String,
    pub fallback_used: bool,
    pub locale: Locale,
    pub locale_fallback: bool,
    /// Best match first, then alternatives, with their partial scores.
    pub ranked_candidates: Vec<ScoredCandidate>,
}

/// Scores a query against the current catalog snapshot.
#[derive(Debug)]
pub struct RecommendationService {
    catalog: Arc<CatalogHandle>,
    config: ScoringConfig,
}

impl RecommendationService {
    pub fn new(catalog: Arc<CatalogHandle>, config: ScoringConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.current()
    }

    pub fn catalog_handle(&self) -> &Arc<CatalogHandle> {
        &self.catalog
    }

    /// Rebuild the catalog from its source. In-flight requests keep the old snapshot.
    pub fn reload_catalog(&self) -> Result<Arc<Catalog>, CatalogLoadError> {
        self.catalog.reload()
    }

    pub fn recommend(&self, query: &Query) -> Result<RecommendationResult, RecommendationError> {
        self.recommend_with_cancel(query, &CancellationToken::default())
    }

    pub fn recommend_with_cancel(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<RecommendationResult, RecommendationError> {
        query.validate()?;

        let catalog = self.catalog.current();
        if catalog.is_empty() {
            return Err(RecommendationError::EmptyCatalog);
        }

        let aggregator = ScoringAggregator::new(&self.config);
        let mut entries = Vec::with_capacity(catalog.len());
        for spread in catalog.iter() {
            if cancel.is_cancelled() {
                debug!(spread_id = %spread.id, "recommendation cancelled mid-scan");
                return Err(RecommendationError::Cancelled);
            }
            let matched = matcher::score(spread, query, self.config.keyword_saturation);
            entries.push(aggregator.rank_entry(spread, matched));
        }

        let ranked = aggregator.aggregate(entries, query.preferences().complexity_level());
        let state = SelectionState::of(&ranked);

        let (best, alternatives): (Ranked<'_>, Vec<Ranked<'_>>) = match state {
            SelectionState::Matched => {
                let mut entries = ranked.into_entries().into_iter();
                let best = entries.next().ok_or(RecommendationError::EmptyCatalog)?;
                let alternatives = entries.take(self.config.top_n.saturating_sub(1)).collect();
                (best, alternatives)
            }
            SelectionState::NoMatch => {
                let spread =
                    select_fallback(&catalog, query).ok_or(RecommendationError::EmptyCatalog)?;
                let matched = matcher::score(spread, query, self.config.keyword_saturation);
                (aggregator.rank_entry(spread, matched), Vec::new())
            }
        };

        let fallback_used = state == SelectionState::NoMatch;
        let explanation = explain(
            &ExplanationContext {
                spread: best.spread,
                candidate: &best.candidate,
                fallback_used,
                weak_match_threshold: self.config.weak_match_threshold,
            },
            query.locale(),
        );
        let locale_fallback = query.locale_fallback() || explanation.locale_fallback;
        let confidence = Confidence::from_score(best.candidate.total, fallback_used);

        info!(
            spread_id = %best.spread.id,
            score = best.candidate.total,
            ?confidence,
            fallback_used,
            alternatives = alternatives.len(),
            locale = %query.locale(),
            "spread recommended"
        );

        let result = RecommendationResult {
            best_match: BestMatch {
                spread_id: best.candidate.spread_id.clone(),
                score: best.candidate.total,
                confidence,
            },
            alternatives: alternatives
                .iter()
                .map(|entry| Alternative {
                    spread_id: entry.candidate.spread_id.clone(),
                    score: entry.candidate.total,
                })
                .collect(),
            explanation: explanation.text,
            fallback_used,
            locale: query.locale(),
            locale_fallback,
            ranked_candidates: std::iter::once(best.candidate)
                .chain(alternatives.into_iter().map(|entry| entry.candidate))
                .collect(),
        };

        Ok(result)
    }
}
