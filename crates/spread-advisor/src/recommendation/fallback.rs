use super::aggregate::RankedList;
use super::query::Query;
use crate::catalog::{Catalog, SpreadDescriptor};
use serde::Serialize;

pub const DEFAULT_SPREAD: &str = "three_card";
pub const SINGLE_CARD_SPREAD: &str = "single";

/// Outcome of ranking before a best match is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Matched,
    NoMatch,
}

impl SelectionState {
    pub fn of(ranked: &RankedList<'_>) -> Self {
        if ranked.is_empty() {
            SelectionState::NoMatch
        } else {
            SelectionState::Matched
        }
    }
}

/// Pick the default spread when nothing cleared the confidence threshold.
///
/// A request for exactly one card gets the single-card spread; everything else gets
/// the three-card spread. Missing defaults fall through to the other default and then
/// to the first spread by id, so a non-empty catalog always yields a result.
pub fn select_fallback<'a>(catalog: &'a Catalog, query: &Query) -> Option<&'a SpreadDescriptor> {
    let order = if query.preferences().wants_single_card() {
        [SINGLE_CARD_SPREAD, DEFAULT_SPREAD]
    } else {
        [DEFAULT_SPREAD, SINGLE_CARD_SPREAD]
    };

    order
        .iter()
        .find_map(|id| catalog.get(id))
        .or_else(|| catalog.first())
}
