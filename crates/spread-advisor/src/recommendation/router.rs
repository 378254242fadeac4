use super::query::Query;
use super::service::{RecommendationError, RecommendationService};
use crate::catalog::{
    Complexity, EducationalContent, Locale, LocalizedText, PositionInteraction, SpreadDescriptor,
    SpreadId,
};
use crate::catalog::text::{first_sentence, normalize};
use axum::{
    extract::{Path, Query as QueryParams, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Router builder exposing recommendation and catalog endpoints.
pub fn spread_router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/api/v1/spreads", get(list_handler))
        .route("/api/v1/spreads/recommend", post(recommend_handler))
        .route(
            "/api/v1/spreads/:spread_id/educational",
            get(educational_handler),
        )
        .route("/api/v1/catalog/reload", post(reload_handler))
        .with_state(service)
}

/// JSON body for `POST /api/v1/spreads/recommend`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub question: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub emotional_states: Vec<String>,
    #[serde(default)]
    pub card_count_preference: Option<String>,
    #[serde(default)]
    pub complexity_level: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

impl RecommendRequest {
    pub fn into_query(self) -> Query {
        let locale = self.locale.as_deref().unwrap_or(Locale::En.code());
        let mut query = Query::new(self.question, locale).with_emotional_states(self.emotional_states);
        if let Some(raw) = self.card_count_preference.as_deref() {
            query = query.with_card_count(raw);
        }
        if let Some(raw) = self.complexity_level.as_deref() {
            query = query.with_complexity(raw);
        }
        if let Some(raw) = self.experience_level.as_deref() {
            query = query.with_experience(raw);
        }
        if let Some(raw) = self.timeframe.as_deref() {
            query = query.with_timeframe(raw);
        }
        query
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub locale: Option<String>,
    /// Emotional-state tag to filter by.
    #[serde(default)]
    pub tag: Option<String>,
}

/// Catalog listing entry resolved to one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadSummary {
    pub id: SpreadId,
    pub name: String,
    pub card_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    pub purpose: String,
    pub locale_fallback: bool,
}

impl SpreadSummary {
    pub fn from_spread(spread: &SpreadDescriptor, locale: Locale) -> Self {
        let (name, name_fallback) = spread.name.resolve(locale);
        let (purpose, purpose_fallback) = spread.educational.purpose.resolve(locale);
        Self {
            id: spread.id.clone(),
            name: name.to_string(),
            card_count: spread.card_count,
            complexity: spread.criteria.prefer_when.complexity_level(),
            purpose: first_sentence(purpose).to_string(),
            locale_fallback: name_fallback || purpose_fallback,
        }
    }
}

/// Full educational record for one spread, all locales included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalView<'a> {
    pub id: &'a SpreadId,
    pub card_count: u8,
    pub name: &'a LocalizedText,
    #[serde(flatten)]
    pub educational: &'a EducationalContent,
    pub position_interactions: &'a [PositionInteraction],
    pub ai_selection_criteria: CriteriaView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaView {
    pub question_patterns: Vec<String>,
    pub emotional_states: Vec<String>,
    pub prefer_when: PreferWhenView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferWhenView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_count_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

impl<'a> EducationalView<'a> {
    pub fn from_spread(spread: &'a SpreadDescriptor) -> Self {
        let criteria = &spread.criteria;
        let prefer = &criteria.prefer_when;
        Self {
            id: &spread.id,
            card_count: spread.card_count,
            name: &spread.name,
            educational: &spread.educational,
            position_interactions: &spread.position_interactions,
            ai_selection_criteria: CriteriaView {
                question_patterns: criteria
                    .question_patterns
                    .iter()
                    .map(|pattern| pattern.raw.clone())
                    .collect(),
                emotional_states: criteria
                    .emotional_states
                    .iter()
                    .map(|state| state.raw.clone())
                    .collect(),
                prefer_when: PreferWhenView {
                    card_count_preference: prefer.card_count.as_ref().map(|v| v.raw.clone()),
                    complexity_level: prefer.complexity.as_ref().map(|v| v.raw.clone()),
                    experience_level: prefer.experience.as_ref().map(|v| v.raw.clone()),
                    timeframe: prefer.timeframe.as_ref().map(|v| v.raw.clone()),
                },
            },
        }
    }
}

pub(crate) async fn recommend_handler(
    State(service): State<Arc<RecommendationService>>,
    axum::Json(request): axum::Json<RecommendRequest>,
) -> Response {
    let query = request.into_query();
    match service.recommend(&query) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(RecommendationError::InvalidQuery(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler(
    State(service): State<Arc<RecommendationService>>,
    QueryParams(params): QueryParams<ListParams>,
) -> Response {
    let (locale, locale_fallback) = match params.locale.as_deref() {
        None => (Locale::En, false),
        Some(code) => Locale::parse(code).map_or((Locale::En, true), |locale| (locale, false)),
    };
    let tag = params.tag.as_deref().map(normalize).filter(|tag| !tag.is_empty());

    let catalog = service.catalog();
    let spreads: Vec<SpreadSummary> = match tag.as_deref() {
        Some(tag) => catalog
            .spreads_for_state(tag)
            .filter_map(|id| catalog.get(id.as_str()))
            .map(|spread| SpreadSummary::from_spread(spread, locale))
            .collect(),
        None => catalog
            .iter()
            .map(|spread| SpreadSummary::from_spread(spread, locale))
            .collect(),
    };

    let payload = json!({
        "locale": locale,
        "localeFallback": locale_fallback,
        "spreads": spreads,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn educational_handler(
    State(service): State<Arc<RecommendationService>>,
    Path(spread_id): Path<String>,
) -> Response {
    let catalog = service.catalog();
    match catalog.get(&spread_id) {
        Some(spread) => {
            (StatusCode::OK, axum::Json(EducationalView::from_spread(spread))).into_response()
        }
        None => {
            let payload = json!({
                "error": format!("unknown spread '{spread_id}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn reload_handler(State(service): State<Arc<RecommendationService>>) -> Response {
    match service.reload_catalog() {
        Ok(catalog) => {
            info!(spreads = catalog.len(), "catalog reloaded over HTTP");
            let payload = json!({
                "spreads": catalog.len(),
                "rejected": catalog.rejected(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            warn!(%error, "catalog reload failed; keeping current catalog");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
