use crate::catalog::{EmotionalState, Locale, PreferenceProfile, PreferenceValue};
use crate::catalog::text::normalize;
use std::collections::BTreeSet;
use tracing::debug;

/// Upper bound on question length accepted at the boundary.
pub const MAX_QUESTION_CHARS: usize = 2000;

/// Rejections raised before any scoring happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("question is {length} characters long (maximum {max})")]
    QuestionTooLong { length: usize, max: usize },
}

/// Boundary configuration problems that are recovered with a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unsupported locale '{0}', expected one of en, es, ca")]
    UnknownLocale(String),
}

/// Question text normalized once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuestion {
    pub text: String,
    pub tokens: BTreeSet<String>,
}

impl NormalizedQuestion {
    pub fn new(question: &str) -> Self {
        let text = normalize(question);
        let tokens = text.split_whitespace().map(str::to_string).collect();
        Self { text, tokens }
    }
}

/// Request-scoped input to the recommendation engine.
#[derive(Debug, Clone)]
pub struct Query {
    question: String,
    normalized: NormalizedQuestion,
    emotional_states: Vec<EmotionalState>,
    preferences: PreferenceProfile,
    locale: Locale,
    locale_fallback: bool,
}

impl Query {
    /// Build a query from a raw locale code. Unknown codes resolve to English and are
    /// reported through [`Query::locale_fallback`].
    pub fn new(question: impl Into<String>, locale_code: &str) -> Self {
        let (locale, locale_fallback) = match Locale::parse(locale_code) {
            Some(locale) => (locale, false),
            None => {
                let error = ConfigurationError::UnknownLocale(locale_code.to_string());
                debug!(%error, "defaulting query locale to English");
                (Locale::En, true)
            }
        };

        let mut query = Self::in_locale(question, locale);
        query.locale_fallback = locale_fallback;
        query
    }

    pub fn in_locale(question: impl Into<String>, locale: Locale) -> Self {
        let question = question.into();
        let normalized = NormalizedQuestion::new(&question);
        Self {
            question,
            normalized,
            emotional_states: Vec::new(),
            preferences: PreferenceProfile::default(),
            locale,
            locale_fallback: false,
        }
    }

    pub fn with_emotional_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for state in states {
            if let Some(state) = EmotionalState::new(state.as_ref()) {
                if !self
                    .emotional_states
                    .iter()
                    .any(|existing| existing.normalized == state.normalized)
                {
                    self.emotional_states.push(state);
                }
            }
        }
        self
    }

    pub fn with_card_count(mut self, raw: &str) -> Self {
        self.preferences.card_count = PreferenceValue::parse(raw);
        self
    }

    pub fn with_complexity(mut self, raw: &str) -> Self {
        self.preferences.complexity = PreferenceValue::parse(raw);
        self
    }

    pub fn with_experience(mut self, raw: &str) -> Self {
        self.preferences.experience = PreferenceValue::parse(raw);
        self
    }

    pub fn with_timeframe(mut self, raw: &str) -> Self {
        self.preferences.timeframe = PreferenceValue::parse(raw);
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        let trimmed = self.question.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }
        let length = trimmed.chars().count();
        if length > MAX_QUESTION_CHARS {
            return Err(QueryError::QuestionTooLong {
                length,
                max: MAX_QUESTION_CHARS,
            });
        }
        Ok(())
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn normalized(&self) -> &NormalizedQuestion {
        &self.normalized
    }

    pub fn emotional_states(&self) -> &[EmotionalState] {
        &self.emotional_states
    }

    pub fn preferences(&self) -> &PreferenceProfile {
        &self.preferences
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// True when the requested locale code was not recognized.
    pub fn locale_fallback(&self) -> bool {
        self.locale_fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_defaults_to_english() {
        let query = Query::new("What is next?", "fr");
        assert_eq!(query.locale(), Locale::En);
        assert!(query.locale_fallback());

        let query = Query::new("¿Qué sigue?", "es-ES");
        assert_eq!(query.locale(), Locale::Es);
        assert!(!query.locale_fallback());
    }

    #[test]
    fn validate_rejects_blank_and_oversized_questions() {
        assert_eq!(
            Query::new("   \n\t", "en").validate(),
            Err(QueryError::EmptyQuestion)
        );
        let long = "a".repeat(MAX_QUESTION_CHARS + 1);
        assert!(matches!(
            Query::new(long, "en").validate(),
            Err(QueryError::QuestionTooLong { .. })
        ));
        assert_eq!(Query::new("Will it work?", "en").validate(), Ok(()));
    }

    #[test]
    fn emotional_states_are_normalized_and_deduplicated() {
        let query = Query::new("q", "en").with_emotional_states([
            "Seeking Clarity",
            "seeking clarity!",
            "  ",
            "feeling stuck",
        ]);
        let states: Vec<&str> = query
            .emotional_states()
            .iter()
            .map(|state| state.normalized.as_str())
            .collect();
        assert_eq!(states, vec!["seeking clarity", "feeling stuck"]);
    }

    #[test]
    fn normalized_question_exposes_tokens() {
        let query = Query::new("Should I stay, or go?", "en");
        assert_eq!(query.normalized().text, "should i stay or go");
        assert!(query.normalized().tokens.contains("or"));
    }
}
