use spread_advisor::catalog::{Catalog, CatalogHandle, CatalogSource, Locale};
use spread_advisor::recommendation::{Confidence, Query, RecommendationService, ScoringConfig};
use std::sync::Arc;
use std::thread;

fn service() -> RecommendationService {
    let handle = CatalogHandle::load(CatalogSource::Embedded).expect("embedded catalog loads");
    RecommendationService::new(Arc::new(handle), ScoringConfig::default())
}

#[test]
fn relationship_question_recommends_relationship_spread() {
    let result = service()
        .recommend(
            &Query::new("What's the dynamic between me and my partner?", "en")
                .with_emotional_states(["conflict with partner"]),
        )
        .expect("recommendation");

    assert_eq!(result.best_match.spread_id.as_str(), "relationship");
    assert!(!result.fallback_used);
    assert!(result.explanation.contains("Relationship Spread"));
}

#[test]
fn catalan_request_explains_in_catalan() {
    let result = service()
        .recommend(&Query::new("How do I achieve my career goal?", "ca"))
        .expect("recommendation");

    assert_eq!(result.best_match.spread_id.as_str(), "pyramid");
    assert_eq!(result.locale, Locale::Ca);
    assert!(!result.locale_fallback);
    assert!(result
        .explanation
        .starts_with("Et recomano «Tirada de la Piràmide» perquè"));
}

#[test]
fn weights_are_configurable() {
    let handle = Arc::new(CatalogHandle::load(CatalogSource::Embedded).expect("catalog"));
    let query = Query::new("should I take this job or stay", "en").with_card_count("10-12");

    let balanced = RecommendationService::new(handle.clone(), ScoringConfig::default())
        .recommend(&query)
        .expect("recommendation");
    assert_eq!(balanced.best_match.spread_id.as_str(), "year_ahead");

    let mut config = ScoringConfig::default();
    config.weights.keyword = 0.8;
    config.weights.emotional_state = 0.1;
    config.weights.preference = 0.1;
    config.validate().expect("weights sum to one");

    let keyword_heavy = RecommendationService::new(handle, config)
        .recommend(&query)
        .expect("recommendation");
    assert_eq!(keyword_heavy.best_match.spread_id.as_str(), "two_card");
}

#[test]
fn fallback_honours_single_card_request() {
    let handle = Arc::new(CatalogHandle::load(CatalogSource::Embedded).expect("catalog"));
    let config = ScoringConfig {
        min_confidence: 0.35,
        ..ScoringConfig::default()
    };
    let result = RecommendationService::new(handle, config)
        .recommend(&Query::new("qwerty zxcv", "es").with_card_count("1"))
        .expect("recommendation");

    assert!(result.fallback_used);
    assert_eq!(result.best_match.spread_id.as_str(), "single");
    assert_eq!(result.best_match.confidence, Confidence::Low);
    assert!(result.explanation.contains("«Una Carta»"));
}

#[test]
fn concurrent_requests_survive_catalog_swap() {
    let handle = Arc::new(CatalogHandle::load(CatalogSource::Embedded).expect("catalog"));
    let service = Arc::new(RecommendationService::new(
        handle.clone(),
        ScoringConfig::default(),
    ));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..25 {
                    let result = service
                        .recommend(&Query::new("What do I need to know today?", "en"))
                        .expect("recommendation");
                    assert!(!result.best_match.spread_id.as_str().is_empty());
                }
            })
        })
        .collect();

    for _ in 0..10 {
        handle.replace(Catalog::embedded().expect("catalog"));
    }

    for worker in workers {
        worker.join().expect("worker thread");
    }
    assert_eq!(service.catalog().len(), 11);
}
