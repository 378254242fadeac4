use super::preferences::PreferenceProfile;
use super::text::{is_stop_word, normalize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for catalog spreads (e.g. `three_card`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpreadId(pub String);

impl SpreadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locales the catalog carries content for.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Ca,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Es, Locale::Ca];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Ca => "ca",
        }
    }

    /// Accepts bare codes and region-qualified tags (`es-ES`, `ca_AD`).
    pub fn parse(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            "ca" => Some(Locale::Ca),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text block keyed by locale. English is the reference locale every entry must carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
}

impl LocalizedText {
    /// Non-blank text for exactly this locale.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        let value = match locale {
            Locale::En => Some(self.en.as_str()),
            Locale::Es => self.es.as_deref(),
            Locale::Ca => self.ca.as_deref(),
        };
        value.filter(|text| !text.trim().is_empty())
    }

    /// Text for `locale`, or English with `true` when the locale is missing.
    pub fn resolve(&self, locale: Locale) -> (&str, bool) {
        match self.get(locale) {
            Some(text) => (text, false),
            None => (self.en.as_str(), locale != Locale::En),
        }
    }

    pub fn is_complete(&self) -> bool {
        Locale::ALL.iter().all(|locale| self.get(*locale).is_some())
    }
}

/// Per-locale teaching material. Everything except `purpose`/`when_to_use`/`when_to_avoid`
/// is passed through untouched for downstream rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalContent {
    pub purpose: LocalizedText,
    pub when_to_use: LocalizedText,
    pub when_to_avoid: LocalizedText,
    pub interpretation_method: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional_origin: Option<LocalizedText>,
}

/// Documented relationship between positions of a spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInteraction {
    pub description: LocalizedText,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub ai_guidance: String,
}

/// Question fragment precompiled for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub raw: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub content_tokens: Vec<String>,
}

impl Pattern {
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return None;
        }
        let tokens: Vec<String> = normalized.split(' ').map(str::to_string).collect();
        let content_tokens = tokens
            .iter()
            .filter(|token| !is_stop_word(token))
            .cloned()
            .collect();

        Some(Self {
            raw: raw.trim().to_string(),
            normalized,
            tokens,
            content_tokens,
        })
    }

    pub fn is_multi_word(&self) -> bool {
        self.tokens.len() > 1
    }
}

/// Emotional-state tag as written in the catalog plus its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionalState {
    pub raw: String,
    pub normalized: String,
}

impl EmotionalState {
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.trim().to_string(),
            normalized,
        })
    }
}

/// Selection metadata normalized at load time so scoring never parses raw strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCriteria {
    pub question_patterns: Vec<Pattern>,
    pub emotional_states: Vec<EmotionalState>,
    pub prefer_when: PreferenceProfile,
}

/// One validated catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadDescriptor {
    pub id: SpreadId,
    pub card_count: u8,
    pub name: LocalizedText,
    pub educational: EducationalContent,
    pub position_interactions: Vec<PositionInteraction>,
    pub criteria: SelectionCriteria,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parse_accepts_region_tags() {
        assert_eq!(Locale::parse("es-ES"), Some(Locale::Es));
        assert_eq!(Locale::parse(" CA_ad "), Some(Locale::Ca));
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn resolve_falls_back_to_english() {
        let text = LocalizedText {
            en: "English".to_string(),
            es: Some("   ".to_string()),
            ca: Some("Català".to_string()),
        };

        assert_eq!(text.resolve(Locale::Ca), ("Català", false));
        assert_eq!(text.resolve(Locale::Es), ("English", true));
        assert_eq!(text.resolve(Locale::En), ("English", false));
        assert!(!text.is_complete());
    }

    #[test]
    fn pattern_separates_content_tokens() {
        let pattern = Pattern::new("Stay or go?").expect("pattern");
        assert_eq!(pattern.normalized, "stay or go");
        assert_eq!(pattern.content_tokens, vec!["stay", "or", "go"]);
        assert!(pattern.is_multi_word());

        let pattern = Pattern::new("should I choose").expect("pattern");
        assert_eq!(pattern.content_tokens, vec!["should", "choose"]);
        assert!(Pattern::new(" ?! ").is_none());
    }
}
