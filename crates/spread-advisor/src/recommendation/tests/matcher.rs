use super::common::*;
use crate::catalog::{Affinity, EmotionalState, Pattern, PreferenceDimension, PreferenceProfile};
use crate::recommendation::matcher::{
    emotional_state_score, keyword_score, preference_score, score, MatchedSignal,
};
use crate::recommendation::query::{NormalizedQuestion, Query};

fn patterns(raw: &[&str]) -> Vec<Pattern> {
    raw.iter().filter_map(|p| Pattern::new(p)).collect()
}

fn states(raw: &[&str]) -> Vec<EmotionalState> {
    raw.iter().filter_map(|s| EmotionalState::new(s)).collect()
}

fn keyword(raw_patterns: &[&str], question: &str) -> (f64, Vec<MatchedSignal>) {
    let mut signals = Vec::new();
    let value = keyword_score(
        &patterns(raw_patterns),
        &NormalizedQuestion::new(question),
        2.0,
        &mut signals,
    );
    (value, signals)
}

#[test]
fn whole_word_pattern_scores_full_credit() {
    let (value, signals) = keyword(&["career"], "Is a career change right for me?");
    assert_eq!(value, 1.0);
    assert_eq!(
        signals,
        vec![MatchedSignal::Keyword {
            phrase: "career".to_string(),
            partial: false,
        }]
    );
}

#[test]
fn patterns_match_on_word_boundaries_only() {
    let (value, signals) = keyword(&["car"], "Where is my career going?");
    assert_eq!(value, 0.0);
    assert!(signals.is_empty());
}

#[test]
fn multi_word_patterns_earn_partial_credit_for_most_content_words() {
    let (value, signals) = keyword(&["stay or go", "love"], "Should I stay or leave?");
    assert!((value - 0.25).abs() < 1e-9, "got {value}");
    assert!(matches!(
        signals.as_slice(),
        [MatchedSignal::Keyword { partial: true, .. }]
    ));

    let (value, _) = keyword(&["stay or go", "love"], "Should I stay?");
    assert_eq!(value, 0.0);
}

#[test]
fn keyword_credit_saturates() {
    let (value, signals) = keyword(
        &["job", "career", "promotion", "salary", "boss"],
        "my boss offered a promotion",
    );
    assert_eq!(value, 1.0);
    assert_eq!(signals.len(), 2);
}

#[test]
fn adding_a_matching_phrase_never_lowers_keyword_score() {
    let raw = ["career change", "new job", "relocation", "promotion", "salary"];
    let questions = [
        "thinking about relocation",
        "thinking about relocation for a new role",
        "thinking about relocation for a new job",
    ];

    let scores: Vec<f64> = questions
        .iter()
        .map(|question| keyword(&raw, question).0)
        .collect();
    assert!(
        scores.windows(2).all(|pair| pair[0] < pair[1]),
        "scores did not grow: {scores:?}"
    );
    assert_eq!(scores[0], 0.5);
    assert!((scores[1] - 0.6875).abs() < 1e-9, "got {}", scores[1]);
    assert_eq!(scores[2], 1.0);
}

#[test]
fn connective_overlap_alone_earns_no_keyword_credit() {
    let raw = ["this or that", "stay or go"];
    for question in ["zzz or qqq", "pizza or pasta?"] {
        let (value, signals) = keyword(&raw, question);
        assert_eq!(value, 0.0, "{question}");
        assert!(signals.is_empty(), "{question}: {signals:?}");
    }
}

#[test]
fn connective_overlap_corroborates_anchored_matches() {
    let (value, signals) = keyword(&["this or that", "stay or go"], "Should I stay or leave?");
    assert!((value - 0.625).abs() < 1e-9, "got {value}");
    assert_eq!(signals.len(), 2);
    assert!(signals
        .iter()
        .all(|signal| matches!(signal, MatchedSignal::Keyword { partial: true, .. })));
}

#[test]
fn emotional_states_match_near_exact_tags() {
    let mut signals = Vec::new();
    let value = emotional_state_score(
        &states(&["seeking clarity on decision", "need comparison"]),
        &states(&["Seeking clarity", "angry"]),
        &mut signals,
    );
    assert_eq!(value, 0.5);
    assert_eq!(
        signals,
        vec![MatchedSignal::EmotionalState {
            tag: "Seeking clarity".to_string(),
            state: "seeking clarity on decision".to_string(),
        }]
    );

    let value = emotional_state_score(&states(&["feeling stuck"]), &[], &mut Vec::new());
    assert_eq!(value, 0.0);
}

#[test]
fn preference_score_averages_requested_dimensions_only() {
    let offered = PreferenceProfile::from_raw(
        Some("3-5"),
        Some("simple"),
        Some("any"),
        Some("present to near future (weeks to months)"),
    );

    let requested = PreferenceProfile::from_raw(Some("3-5"), Some("complex"), None, None);
    let mut signals = Vec::new();
    assert_eq!(preference_score(&offered, &requested, &mut signals), 0.5);
    assert_eq!(signals.len(), 1);
    assert!(matches!(
        &signals[0],
        MatchedSignal::Preference {
            dimension: PreferenceDimension::CardCount,
            affinity: Affinity::Exact,
            ..
        }
    ));

    let requested = PreferenceProfile::from_raw(Some("4"), None, None, None);
    assert_eq!(preference_score(&offered, &requested, &mut Vec::new()), 0.5);

    let requested = PreferenceProfile::from_raw(None, None, Some("beginner"), Some("this month"));
    assert_eq!(preference_score(&offered, &requested, &mut Vec::new()), 0.5);

    assert_eq!(
        preference_score(&offered, &PreferenceProfile::default(), &mut Vec::new()),
        0.0
    );
}

#[test]
fn requested_dimension_missing_from_spread_counts_as_mismatch() {
    let offered = PreferenceProfile::from_raw(Some("2"), None, None, None);
    let requested = PreferenceProfile::from_raw(Some("2"), Some("simple"), None, None);
    assert_eq!(preference_score(&offered, &requested, &mut Vec::new()), 0.5);
}

#[test]
fn partial_scores_stay_within_unit_interval() {
    let catalog = embedded_catalog();
    let queries = [
        Query::new("should I take this job or stay", "en"),
        Query::new("what does this year hold for me", "en")
            .with_card_count("10-12")
            .with_complexity("extended")
            .with_experience("intermediate")
            .with_timeframe("next 12 months"),
        Query::new(
            "what should I do about my career, my partner, my goal and my spiritual path this year",
            "en",
        )
        .with_emotional_states(["seeking clarity", "feeling stuck", "planning ahead"]),
        Query::new("asdkfj", "en"),
    ];

    for query in &queries {
        for spread in catalog.iter() {
            let matched = score(spread, query, 2.0);
            for value in [
                matched.scores.keyword,
                matched.scores.emotional_state,
                matched.scores.preference,
            ] {
                assert!(
                    (0.0..=1.0).contains(&value),
                    "{} scored {value} for {:?}",
                    spread.id,
                    query.question()
                );
            }
        }
    }
}
