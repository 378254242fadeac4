//! Read-only spread catalog: validated descriptors, normalized selection criteria and
//! the lookup indexes built once per load.

pub mod domain;
pub mod preferences;
pub mod store;
pub mod text;

pub use domain::{
    EducationalContent, EmotionalState, Locale, LocalizedText, Pattern, PositionInteraction,
    SelectionCriteria, SpreadDescriptor, SpreadId,
};
pub use preferences::{
    Affinity, CardCountBand, CardCountPreference, Complexity, Experience, ExperienceLevels,
    Horizon, Horizons, PreferenceDimension, PreferenceProfile, PreferenceValue,
};
pub use store::{Catalog, CatalogHandle, CatalogLoadError, CatalogSource, InvalidSpread};
