use super::domain::{
    EducationalContent, EmotionalState, Locale, LocalizedText, Pattern, PositionInteraction,
    SelectionCriteria, SpreadDescriptor, SpreadId,
};
use super::preferences::PreferenceProfile;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

const EMBEDDED_CATALOG: &str = include_str!("../../data/spreads.json");

/// Fatal catalog failures. Individual invalid entries are dropped, not reported here.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read spread catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("spread catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("spread catalog has no valid entries ({rejected} rejected)")]
    Empty { rejected: usize },
}

/// Reason an individual entry was excluded at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSpread {
    #[error("missing spread id")]
    MissingId,
    #[error("duplicate spread id")]
    DuplicateId,
    #[error("card count must be positive")]
    NoCards,
    #[error("purpose is missing for locale {0}")]
    MissingPurpose(Locale),
    #[error("whenToUse is missing English text")]
    MissingWhenToUse,
    #[error("selection criteria carry no question patterns or emotional states")]
    EmptyCriteria,
    #[error("malformed entry: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpread {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub card_count: u8,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub purpose: LocalizedText,
    #[serde(default)]
    pub when_to_use: LocalizedText,
    #[serde(default)]
    pub when_to_avoid: LocalizedText,
    #[serde(default)]
    pub interpretation_method: LocalizedText,
    #[serde(default)]
    pub traditional_origin: Option<LocalizedText>,
    #[serde(default)]
    pub position_interactions: Vec<PositionInteraction>,
    #[serde(default)]
    pub ai_selection_criteria: RawSelectionCriteria,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSelectionCriteria {
    #[serde(default)]
    pub question_patterns: Vec<String>,
    #[serde(default)]
    pub emotional_states: Vec<String>,
    #[serde(default)]
    pub prefer_when: RawPreferWhen,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPreferWhen {
    pub card_count_preference: Option<String>,
    pub complexity_level: Option<String>,
    pub experience_level: Option<String>,
    pub timeframe: Option<String>,
}

impl RawSpread {
    fn validate(self) -> Result<SpreadDescriptor, InvalidSpread> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(InvalidSpread::MissingId);
        }
        if self.card_count == 0 {
            return Err(InvalidSpread::NoCards);
        }
        if let Some(locale) = Locale::ALL
            .into_iter()
            .find(|locale| self.purpose.get(*locale).is_none())
        {
            return Err(InvalidSpread::MissingPurpose(locale));
        }
        if self.when_to_use.get(Locale::En).is_none() {
            return Err(InvalidSpread::MissingWhenToUse);
        }

        let criteria = self.ai_selection_criteria;
        let question_patterns: Vec<Pattern> = criteria
            .question_patterns
            .iter()
            .filter_map(|raw| Pattern::new(raw))
            .collect();
        let emotional_states: Vec<EmotionalState> = criteria
            .emotional_states
            .iter()
            .filter_map(|raw| EmotionalState::new(raw))
            .collect();
        if question_patterns.is_empty() && emotional_states.is_empty() {
            return Err(InvalidSpread::EmptyCriteria);
        }

        let prefer = criteria.prefer_when;
        let prefer_when = PreferenceProfile::from_raw(
            prefer.card_count_preference.as_deref(),
            prefer.complexity_level.as_deref(),
            prefer.experience_level.as_deref(),
            prefer.timeframe.as_deref(),
        );

        let mut name = self.name;
        if name.en.trim().is_empty() {
            name.en = id.to_string();
        }

        Ok(SpreadDescriptor {
            id: SpreadId(id.to_string()),
            card_count: self.card_count,
            name,
            educational: EducationalContent {
                purpose: self.purpose,
                when_to_use: self.when_to_use,
                when_to_avoid: self.when_to_avoid,
                interpretation_method: self.interpretation_method,
                traditional_origin: self.traditional_origin,
            },
            position_interactions: self.position_interactions,
            criteria: SelectionCriteria {
                question_patterns,
                emotional_states,
                prefer_when,
            },
        })
    }
}

/// Where a catalog is (re)built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    File(PathBuf),
}

impl CatalogSource {
    pub fn load(&self) -> Result<Catalog, CatalogLoadError> {
        match self {
            CatalogSource::Embedded => Catalog::embedded(),
            CatalogSource::File(path) => Catalog::from_path(path),
        }
    }
}

/// Immutable spread registry with secondary lookup indexes.
#[derive(Debug, Clone)]
pub struct Catalog {
    spreads: BTreeMap<SpreadId, SpreadDescriptor>,
    keyword_index: BTreeMap<String, BTreeSet<SpreadId>>,
    emotion_index: BTreeMap<String, BTreeSet<SpreadId>>,
    rejected: usize,
}

impl Catalog {
    /// Parse a JSON array of spread entries. Only a document that is not an array is
    /// fatal; entries that fail to decode are dropped like any other invalid entry.
    pub fn load(raw: &str) -> Result<Self, CatalogLoadError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let mut malformed = 0;
        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            let raw_id = value
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string();
            match serde_json::from_value::<RawSpread>(value) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    malformed += 1;
                    let reason = InvalidSpread::Malformed(err.to_string());
                    warn!(spread_id = %raw_id, %reason, "dropping invalid spread catalog entry");
                }
            }
        }
        Self::build(entries, malformed)
    }

    pub fn embedded() -> Result<Self, CatalogLoadError> {
        Self::load(EMBEDDED_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&raw)
    }

    pub fn from_entries(entries: Vec<RawSpread>) -> Result<Self, CatalogLoadError> {
        Self::build(entries, 0)
    }

    fn build(entries: Vec<RawSpread>, mut rejected: usize) -> Result<Self, CatalogLoadError> {
        let mut spreads = BTreeMap::new();

        for entry in entries {
            let raw_id = entry.id.trim().to_string();
            let outcome = entry.validate().and_then(|spread| {
                if spreads.contains_key(&spread.id) {
                    Err(InvalidSpread::DuplicateId)
                } else {
                    Ok(spread)
                }
            });

            match outcome {
                Ok(spread) => {
                    spreads.insert(spread.id.clone(), spread);
                }
                Err(reason) => {
                    rejected += 1;
                    warn!(spread_id = %raw_id, %reason, "dropping invalid spread catalog entry");
                }
            }
        }

        if spreads.is_empty() {
            return Err(CatalogLoadError::Empty { rejected });
        }

        let mut keyword_index: BTreeMap<String, BTreeSet<SpreadId>> = BTreeMap::new();
        let mut emotion_index: BTreeMap<String, BTreeSet<SpreadId>> = BTreeMap::new();
        for spread in spreads.values() {
            for pattern in &spread.criteria.question_patterns {
                for token in &pattern.content_tokens {
                    keyword_index
                        .entry(token.clone())
                        .or_default()
                        .insert(spread.id.clone());
                }
            }
            for state in &spread.criteria.emotional_states {
                emotion_index
                    .entry(state.normalized.clone())
                    .or_default()
                    .insert(spread.id.clone());
            }
        }

        info!(
            spreads = spreads.len(),
            rejected,
            keywords = keyword_index.len(),
            "spread catalog loaded"
        );

        Ok(Self {
            spreads,
            keyword_index,
            emotion_index,
            rejected,
        })
    }

    pub fn get(&self, id: &str) -> Option<&SpreadDescriptor> {
        self.spreads.get(&SpreadId(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Spreads in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &SpreadDescriptor> {
        self.spreads.values()
    }

    pub fn len(&self) -> usize {
        self.spreads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spreads.is_empty()
    }

    pub fn first(&self) -> Option<&SpreadDescriptor> {
        self.spreads.values().next()
    }

    /// Entries dropped by validation while this catalog was built.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Spreads whose question patterns contain `token` (normalized form expected).
    pub fn spreads_for_token(&self, token: &str) -> impl Iterator<Item = &SpreadId> {
        self.keyword_index.get(token).into_iter().flatten()
    }

    /// Spreads tagged with an emotional state (normalized form expected).
    pub fn spreads_for_state(&self, state: &str) -> impl Iterator<Item = &SpreadId> {
        self.emotion_index.get(state).into_iter().flatten()
    }
}

/// Shared, swappable reference to the current catalog. Readers clone the inner `Arc`
/// and keep it for the whole request; reloads replace it without touching old instances.
#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
    source: CatalogSource,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog, source: CatalogSource) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
            source,
        }
    }

    pub fn load(source: CatalogSource) -> Result<Self, CatalogLoadError> {
        let catalog = source.load()?;
        Ok(Self::new(catalog, source))
    }

    pub fn current(&self) -> Arc<Catalog> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Install `catalog` for new readers, returning the previous instance.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }

    /// Rebuild from the configured source. On failure the current catalog stays in place.
    pub fn reload(&self) -> Result<Arc<Catalog>, CatalogLoadError> {
        let catalog = self.source.load()?;
        self.replace(catalog);
        Ok(self.current())
    }
}
