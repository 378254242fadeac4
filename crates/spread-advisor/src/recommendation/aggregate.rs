use super::config::ScoringConfig;
use super::matcher::{CriteriaMatch, MatchedSignal, PartialScores};
use crate::catalog::{Complexity, SpreadDescriptor, SpreadId};
use serde::Serialize;
use std::cmp::Ordering;

/// One spread's scores, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub spread_id: SpreadId,
    pub card_count: u8,
    pub total: f64,
    pub scores: PartialScores,
    pub signals: Vec<MatchedSignal>,
}

/// A scored candidate still tied to the descriptor it came from.
#[derive(Debug, Clone)]
pub struct Ranked<'a> {
    pub spread: &'a SpreadDescriptor,
    pub candidate: ScoredCandidate,
}

/// Eligible candidates, best first.
#[derive(Debug, Clone, Default)]
pub struct RankedList<'a> {
    entries: Vec<Ranked<'a>>,
}

impl<'a> RankedList<'a> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn best(&self) -> Option<&Ranked<'a>> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ranked<'a>> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<Ranked<'a>> {
        self.entries
    }
}

/// Combines partial scores with the configured weights and orders candidates.
#[derive(Debug, Clone, Copy)]
pub struct ScoringAggregator<'c> {
    config: &'c ScoringConfig,
}

impl<'c> ScoringAggregator<'c> {
    pub fn new(config: &'c ScoringConfig) -> Self {
        Self { config }
    }

    pub fn total_score(&self, scores: &PartialScores) -> f64 {
        let weights = &self.config.weights;
        let total = weights.keyword * scores.keyword
            + weights.emotional_state * scores.emotional_state
            + weights.preference * scores.preference;
        total.clamp(0.0, 1.0)
    }

    pub fn rank_entry<'a>(&self, spread: &'a SpreadDescriptor, matched: CriteriaMatch) -> Ranked<'a> {
        let total = self.total_score(&matched.scores);
        Ranked {
            spread,
            candidate: ScoredCandidate {
                spread_id: spread.id.clone(),
                card_count: spread.card_count,
                total,
                scores: matched.scores,
                signals: matched.signals,
            },
        }
    }

    pub fn is_eligible(&self, candidate: &ScoredCandidate) -> bool {
        candidate.total >= self.config.min_confidence
    }

    /// Drop ineligible candidates, then sort by total descending. Ties prefer fewer
    /// cards for simple requests and more cards for complex ones, then the id.
    pub fn aggregate<'a>(
        &self,
        entries: Vec<Ranked<'a>>,
        complexity: Option<Complexity>,
    ) -> RankedList<'a> {
        let mut entries: Vec<Ranked<'a>> = entries
            .into_iter()
            .filter(|entry| self.is_eligible(&entry.candidate))
            .collect();
        entries.sort_by(|left, right| rank_order(&left.candidate, &right.candidate, complexity));
        RankedList { entries }
    }
}

pub fn rank_order(
    left: &ScoredCandidate,
    right: &ScoredCandidate,
    complexity: Option<Complexity>,
) -> Ordering {
    right
        .total
        .total_cmp(&left.total)
        .then_with(|| match complexity {
            Some(Complexity::Simple) => left.card_count.cmp(&right.card_count),
            Some(Complexity::Complex | Complexity::Extended) => {
                right.card_count.cmp(&left.card_count)
            }
            Some(Complexity::Medium) | None => Ordering::Equal,
        })
        .then_with(|| left.spread_id.cmp(&right.spread_id))
}
