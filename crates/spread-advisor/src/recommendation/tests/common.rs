use crate::catalog::{Catalog, CatalogHandle, CatalogSource};
use crate::recommendation::{spread_router, ScoringConfig, RecommendationService};
use axum::response::Response;
use serde_json::{json, Value};
use std::sync::Arc;

pub(super) fn embedded_catalog() -> Catalog {
    Catalog::embedded().expect("embedded catalog loads")
}

pub(super) fn embedded_service() -> RecommendationService {
    let handle = CatalogHandle::new(embedded_catalog(), CatalogSource::Embedded);
    RecommendationService::new(Arc::new(handle), ScoringConfig::default())
}

pub(super) fn service_for(entries: Value) -> RecommendationService {
    let catalog = Catalog::load(&entries.to_string()).expect("test catalog loads");
    let handle = CatalogHandle::new(catalog, CatalogSource::Embedded);
    RecommendationService::new(Arc::new(handle), ScoringConfig::default())
}

/// Minimal valid catalog entry with English-only guidance text.
pub(super) fn spread_entry(id: &str, card_count: u8, patterns: &[&str], states: &[&str]) -> Value {
    json!({
        "id": id,
        "cardCount": card_count,
        "name": {"en": format!("{id} spread")},
        "purpose": {
            "en": "Purpose text.",
            "es": "Texto de propósito.",
            "ca": "Text de propòsit."
        },
        "whenToUse": {"en": format!("Use {id} for focused questions. More detail follows.")},
        "whenToAvoid": {"en": format!("Avoid {id} for sprawling questions. More detail follows.")},
        "aiSelectionCriteria": {
            "questionPatterns": patterns,
            "emotionalStates": states,
            "preferWhen": {"cardCountPreference": card_count.to_string()}
        }
    })
}

pub(super) fn router_for(service: RecommendationService) -> axum::Router {
    spread_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
