//! Loosely-typed `preferWhen` strings parsed into tagged variants at load time.
//!
//! The source data mixes numeric ranges ("3-5") with qualitative categories
//! ("moderate"), so every value keeps its normalized text for exact comparison and an
//! optional interpretation for synonym-level comparison.

use super::text::normalize;
use serde::Serialize;
use std::collections::BTreeSet;

/// Agreement between a requested and an offered preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    Exact,
    Related,
    Mismatch,
}

impl Affinity {
    pub fn score(self) -> f64 {
        match self {
            Affinity::Exact => 1.0,
            Affinity::Related => 0.5,
            Affinity::Mismatch => 0.0,
        }
    }
}

/// Interpretation of a normalized preference string.
pub trait PreferenceKind: Sized {
    fn interpret(normalized: &str) -> Option<Self>;
    fn related(&self, other: &Self) -> bool;
}

/// Preference as written plus its interpretation, when one was recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceValue<T> {
    pub raw: String,
    pub normalized: String,
    pub parsed: Option<T>,
}

impl<T: PreferenceKind> PreferenceValue<T> {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return None;
        }
        let parsed = T::interpret(&normalized);
        Some(Self {
            raw: raw.trim().to_string(),
            normalized,
            parsed,
        })
    }

    /// Compare a requested value (`self`) against what a spread offers.
    pub fn affinity(&self, offered: &Self) -> Affinity {
        if self.normalized == offered.normalized {
            return Affinity::Exact;
        }
        match (&self.parsed, &offered.parsed) {
            (Some(requested), Some(offered)) if requested.related(offered) => Affinity::Related,
            _ => Affinity::Mismatch,
        }
    }
}

/// Qualitative card-count buckets used when no number is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCountBand {
    Few,
    Moderate,
    Many,
}

impl CardCountBand {
    pub fn bounds(self) -> (u8, u8) {
        match self {
            CardCountBand::Few => (1, 3),
            CardCountBand::Moderate => (3, 7),
            CardCountBand::Many => (8, u8::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCountPreference {
    Range { min: u8, max: u8 },
    Category(CardCountBand),
}

impl CardCountPreference {
    pub fn bounds(&self) -> (u8, u8) {
        match self {
            CardCountPreference::Range { min, max } => (*min, *max),
            CardCountPreference::Category(band) => band.bounds(),
        }
    }

    pub fn is_single_card(&self) -> bool {
        self.bounds() == (1, 1)
    }
}

impl PreferenceKind for CardCountPreference {
    fn interpret(normalized: &str) -> Option<Self> {
        let numbers: Vec<u8> = normalized
            .split(' ')
            .filter_map(|token| match token {
                "one" | "single" => Some(1),
                "two" => Some(2),
                "three" => Some(3),
                other => other.parse::<u8>().ok(),
            })
            .collect();

        match numbers.as_slice() {
            [count] => {
                return Some(CardCountPreference::Range {
                    min: *count,
                    max: *count,
                })
            }
            [first, second, ..] => {
                return Some(CardCountPreference::Range {
                    min: (*first).min(*second),
                    max: (*first).max(*second),
                })
            }
            [] => {}
        }

        normalized.split(' ').find_map(|token| match token {
            "few" | "small" | "minimal" | "short" => {
                Some(CardCountPreference::Category(CardCountBand::Few))
            }
            "moderate" | "medium" | "some" | "average" => {
                Some(CardCountPreference::Category(CardCountBand::Moderate))
            }
            "many" | "large" | "lots" | "extensive" | "extended" | "comprehensive" => {
                Some(CardCountPreference::Category(CardCountBand::Many))
            }
            _ => None,
        })
    }

    fn related(&self, other: &Self) -> bool {
        let (min_a, max_a) = self.bounds();
        let (min_b, max_b) = other.bounds();
        min_a <= max_b && min_b <= max_a
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
    Extended,
}

impl PreferenceKind for Complexity {
    fn interpret(normalized: &str) -> Option<Self> {
        normalized.split(' ').find_map(|token| match token {
            "simple" | "quick" | "easy" | "basic" | "light" => Some(Complexity::Simple),
            "medium" | "moderate" | "intermediate" | "balanced" => Some(Complexity::Medium),
            "complex" | "deep" | "detailed" | "thorough" | "advanced" => Some(Complexity::Complex),
            "extended" | "comprehensive" | "full" | "extensive" => Some(Complexity::Extended),
            _ => None,
        })
    }

    fn related(&self, other: &Self) -> bool {
        self == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

/// Experience levels a spread accepts ("any" accepts all three).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceLevels(pub BTreeSet<Experience>);

impl ExperienceLevels {
    pub fn contains(&self, level: Experience) -> bool {
        self.0.contains(&level)
    }
}

impl PreferenceKind for ExperienceLevels {
    fn interpret(normalized: &str) -> Option<Self> {
        let mut levels = BTreeSet::new();
        for token in normalized.split(' ') {
            match token {
                "any" | "all" | "everyone" => {
                    levels.extend([
                        Experience::Beginner,
                        Experience::Intermediate,
                        Experience::Advanced,
                    ]);
                }
                "beginner" | "beginners" | "novice" | "new" => {
                    levels.insert(Experience::Beginner);
                }
                "intermediate" => {
                    levels.insert(Experience::Intermediate);
                }
                "advanced" | "expert" | "experienced" | "master" => {
                    levels.insert(Experience::Advanced);
                }
                _ => {}
            }
        }
        (!levels.is_empty()).then_some(ExperienceLevels(levels))
    }

    fn related(&self, other: &Self) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Horizon {
    Immediate,
    NearTerm,
    LongTerm,
    Ongoing,
}

/// Time horizons a timeframe description touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horizons(pub BTreeSet<Horizon>);

impl PreferenceKind for Horizons {
    fn interpret(normalized: &str) -> Option<Self> {
        let horizons: BTreeSet<Horizon> = normalized
            .split(' ')
            .filter_map(|token| match token {
                "immediate" | "today" | "now" | "tonight" | "daily" | "present" | "current" => {
                    Some(Horizon::Immediate)
                }
                "week" | "weeks" | "month" | "months" | "soon" | "near" | "future" | "planning" => {
                    Some(Horizon::NearTerm)
                }
                "year" | "years" | "yearly" | "annual" | "12" => Some(Horizon::LongTerm),
                "ongoing" | "journey" | "lifelong" | "comprehensive" => Some(Horizon::Ongoing),
                _ => None,
            })
            .collect();
        (!horizons.is_empty()).then_some(Horizons(horizons))
    }

    fn related(&self, other: &Self) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }
}

/// The four `preferWhen` dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceDimension {
    CardCount,
    Complexity,
    Experience,
    Timeframe,
}

/// Normalized `preferWhen` block; also used for the hints a query carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceProfile {
    pub card_count: Option<PreferenceValue<CardCountPreference>>,
    pub complexity: Option<PreferenceValue<Complexity>>,
    pub experience: Option<PreferenceValue<ExperienceLevels>>,
    pub timeframe: Option<PreferenceValue<Horizons>>,
}

impl PreferenceProfile {
    pub fn from_raw(
        card_count: Option<&str>,
        complexity: Option<&str>,
        experience: Option<&str>,
        timeframe: Option<&str>,
    ) -> Self {
        Self {
            card_count: card_count.and_then(PreferenceValue::parse),
            complexity: complexity.and_then(PreferenceValue::parse),
            experience: experience.and_then(PreferenceValue::parse),
            timeframe: timeframe.and_then(PreferenceValue::parse),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.card_count.is_none()
            && self.complexity.is_none()
            && self.experience.is_none()
            && self.timeframe.is_none()
    }

    /// Canonical complexity, when one was recognized.
    pub fn complexity_level(&self) -> Option<Complexity> {
        self.complexity.as_ref().and_then(|value| value.parsed)
    }

    pub fn wants_single_card(&self) -> bool {
        self.card_count
            .as_ref()
            .and_then(|value| value.parsed)
            .map(|preference| preference.is_single_card())
            .unwrap_or(false)
    }
}
