//! Per-spread partial scores: keyword, emotional-state and preference agreement.
//!
//! Every function here is pure over its inputs and returns values in `[0, 1]`.

use super::query::{NormalizedQuestion, Query};
use crate::catalog::{
    Affinity, EmotionalState, Pattern, PreferenceDimension, PreferenceProfile, PreferenceValue,
    SpreadDescriptor,
};
use crate::catalog::preferences::PreferenceKind;
use crate::catalog::text::{contains_phrase, is_connective};
use serde::Serialize;

pub const MULTI_WORD_WEIGHT: f64 = 1.5;
pub const SINGLE_WORD_WEIGHT: f64 = 1.0;
/// Share of a phrase's weight granted when only some of its content words appear.
pub const PARTIAL_CREDIT: f64 = 0.5;
/// Minimum fraction of content words required for partial credit.
pub const PARTIAL_COVERAGE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialScores {
    pub keyword: f64,
    pub emotional_state: f64,
    pub preference: f64,
}

/// Evidence recorded while scoring; feeds the explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchedSignal {
    Keyword {
        phrase: String,
        partial: bool,
    },
    EmotionalState {
        tag: String,
        state: String,
    },
    Preference {
        dimension: PreferenceDimension,
        requested: String,
        offered: String,
        affinity: Affinity,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaMatch {
    pub scores: PartialScores,
    pub signals: Vec<MatchedSignal>,
}

pub fn score(spread: &SpreadDescriptor, query: &Query, keyword_saturation: f64) -> CriteriaMatch {
    let criteria = &spread.criteria;
    let mut signals = Vec::new();

    let keyword = keyword_score(
        &criteria.question_patterns,
        query.normalized(),
        keyword_saturation,
        &mut signals,
    );
    let emotional_state =
        emotional_state_score(&criteria.emotional_states, query.emotional_states(), &mut signals);
    let preference = preference_score(&criteria.prefer_when, query.preferences(), &mut signals);

    CriteriaMatch {
        scores: PartialScores {
            keyword,
            emotional_state,
            preference,
        },
        signals,
    }
}

/// Accumulated phrase credit divided by `min(pattern count, saturation)`, capped at one.
///
/// Partial matches that rest only on connectives ("or") corroborate other evidence; a
/// spread whose sole evidence is connective overlap scores zero.
pub fn keyword_score(
    patterns: &[Pattern],
    question: &NormalizedQuestion,
    saturation: f64,
    signals: &mut Vec<MatchedSignal>,
) -> f64 {
    if patterns.is_empty() || question.text.is_empty() {
        return 0.0;
    }

    let mut credit = 0.0;
    let mut anchored = false;
    let mut matched = Vec::new();
    for pattern in patterns {
        let weight = if pattern.is_multi_word() {
            MULTI_WORD_WEIGHT
        } else {
            SINGLE_WORD_WEIGHT
        };

        if contains_phrase(&question.text, &pattern.normalized) {
            credit += weight;
            anchored = true;
            matched.push(MatchedSignal::Keyword {
                phrase: pattern.raw.clone(),
                partial: false,
            });
            continue;
        }

        if let Some(overlap) = partial_overlap(pattern, question) {
            credit += weight * overlap.coverage * PARTIAL_CREDIT;
            anchored |= overlap.anchored;
            matched.push(MatchedSignal::Keyword {
                phrase: pattern.raw.clone(),
                partial: true,
            });
        }
    }

    let denominator = (patterns.len() as f64).min(saturation);
    if !anchored || denominator <= 0.0 {
        return 0.0;
    }
    signals.append(&mut matched);
    (credit / denominator).clamp(0.0, 1.0)
}

struct Overlap {
    coverage: f64,
    /// At least one present token is not a connective.
    anchored: bool,
}

fn partial_overlap(pattern: &Pattern, question: &NormalizedQuestion) -> Option<Overlap> {
    if !pattern.is_multi_word() || pattern.content_tokens.is_empty() {
        return None;
    }
    let mut present = 0usize;
    let mut anchored = false;
    for token in &pattern.content_tokens {
        if question.tokens.contains(token.as_str()) {
            present += 1;
            anchored |= !is_connective(token);
        }
    }
    let coverage = present as f64 / pattern.content_tokens.len() as f64;
    (present > 0 && coverage >= PARTIAL_COVERAGE).then_some(Overlap { coverage, anchored })
}

/// Share of requested tags that match one of the spread's states.
pub fn emotional_state_score(
    offered: &[EmotionalState],
    requested: &[EmotionalState],
    signals: &mut Vec<MatchedSignal>,
) -> f64 {
    if requested.is_empty() || offered.is_empty() {
        return 0.0;
    }

    let mut matched = 0usize;
    for tag in requested {
        if let Some(state) = offered.iter().find(|state| states_agree(state, tag)) {
            matched += 1;
            signals.push(MatchedSignal::EmotionalState {
                tag: tag.raw.clone(),
                state: state.raw.clone(),
            });
        }
    }

    matched as f64 / requested.len() as f64
}

fn states_agree(offered: &EmotionalState, requested: &EmotionalState) -> bool {
    offered.normalized == requested.normalized
        || contains_phrase(&offered.normalized, &requested.normalized)
        || contains_phrase(&requested.normalized, &offered.normalized)
}

/// Mean affinity over the dimensions the query actually requested.
pub fn preference_score(
    offered: &PreferenceProfile,
    requested: &PreferenceProfile,
    signals: &mut Vec<MatchedSignal>,
) -> f64 {
    let mut tally = Tally::default();

    tally.compare(
        PreferenceDimension::CardCount,
        &requested.card_count,
        &offered.card_count,
        signals,
    );
    tally.compare(
        PreferenceDimension::Complexity,
        &requested.complexity,
        &offered.complexity,
        signals,
    );
    tally.compare(
        PreferenceDimension::Experience,
        &requested.experience,
        &offered.experience,
        signals,
    );
    tally.compare(
        PreferenceDimension::Timeframe,
        &requested.timeframe,
        &offered.timeframe,
        signals,
    );

    tally.mean()
}

#[derive(Default)]
struct Tally {
    total: f64,
    requested: u32,
}

impl Tally {
    fn compare<T: PreferenceKind>(
        &mut self,
        dimension: PreferenceDimension,
        requested: &Option<PreferenceValue<T>>,
        offered: &Option<PreferenceValue<T>>,
        signals: &mut Vec<MatchedSignal>,
    ) {
        let Some(requested) = requested else {
            return;
        };
        self.requested += 1;

        let Some(offered) = offered else {
            return;
        };
        let affinity = requested.affinity(offered);
        self.total += affinity.score();
        if affinity != Affinity::Mismatch {
            signals.push(MatchedSignal::Preference {
                dimension,
                requested: requested.raw.clone(),
                offered: offered.raw.clone(),
                affinity,
            });
        }
    }

    fn mean(&self) -> f64 {
        if self.requested == 0 {
            0.0
        } else {
            self.total / f64::from(self.requested)
        }
    }
}
