//! Localized, human-readable justification for a recommendation.

use super::aggregate::ScoredCandidate;
use super::matcher::MatchedSignal;
use crate::catalog::{Locale, LocalizedText, PreferenceDimension, SpreadDescriptor, SpreadId};
use crate::catalog::text::first_sentence;
use tracing::debug;

const MAX_QUOTED_PHRASES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub text: String,
    /// True when the requested locale lacked content and English was used instead.
    pub locale_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExplanationError {
    #[error("spread {spread_id} has no {field} text for locale {locale}")]
    MissingLocaleContent {
        spread_id: SpreadId,
        field: &'static str,
        locale: Locale,
    },
}

/// Inputs shared by every rendering of one recommendation.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationContext<'a> {
    pub spread: &'a SpreadDescriptor,
    pub candidate: &'a ScoredCandidate,
    pub fallback_used: bool,
    pub weak_match_threshold: f64,
}

impl ExplanationContext<'_> {
    fn is_weak(&self) -> bool {
        self.candidate.total < self.weak_match_threshold
    }
}

/// Render strictly in `locale`, failing when any quoted field is missing there.
pub fn try_explain(
    context: &ExplanationContext<'_>,
    locale: Locale,
) -> Result<String, ExplanationError> {
    let spread = context.spread;
    let name = required(spread, "name", &spread.name, locale)?;
    let when_to_use = required(
        spread,
        "whenToUse",
        &spread.educational.when_to_use,
        locale,
    )?;
    let caution = if context.is_weak() {
        Some(required(
            spread,
            "whenToAvoid",
            &spread.educational.when_to_avoid,
            locale,
        )?)
    } else {
        None
    };

    Ok(compose(context, locale, name, when_to_use, caution))
}

/// Render in `locale`, falling back to English when content is missing.
pub fn explain(context: &ExplanationContext<'_>, locale: Locale) -> Explanation {
    match try_explain(context, locale) {
        Ok(text) => Explanation {
            text,
            locale_fallback: false,
        },
        Err(error) => {
            debug!(%error, "rendering explanation in English");
            let spread = context.spread;
            let caution = if context.is_weak() {
                spread.educational.when_to_avoid.get(Locale::En)
            } else {
                None
            };
            let text = compose(
                context,
                Locale::En,
                &spread.name.en,
                &spread.educational.when_to_use.en,
                caution,
            );
            Explanation {
                text,
                locale_fallback: locale != Locale::En,
            }
        }
    }
}

fn required<'a>(
    spread: &SpreadDescriptor,
    field: &'static str,
    text: &'a LocalizedText,
    locale: Locale,
) -> Result<&'a str, ExplanationError> {
    text.get(locale)
        .ok_or_else(|| ExplanationError::MissingLocaleContent {
            spread_id: spread.id.clone(),
            field,
            locale,
        })
}

fn compose(
    context: &ExplanationContext<'_>,
    locale: Locale,
    name: &str,
    when_to_use: &str,
    caution: Option<&str>,
) -> String {
    let phrasebook = Phrasebook::for_locale(locale);
    let name = phrasebook.spread_name(name);

    let mut text = if context.fallback_used {
        phrasebook.fallback_lead(&name)
    } else {
        let reasons = reasons(&phrasebook, &context.candidate.signals);
        if reasons.is_empty() {
            phrasebook.generic_lead(&name)
        } else {
            phrasebook.matched_lead(&name, &join_clauses(&reasons, phrasebook.and))
        }
    };

    let usage = first_sentence(when_to_use);
    if !usage.is_empty() {
        text.push(' ');
        text.push_str(usage);
    }

    if let Some(caution) = caution.map(first_sentence).filter(|c| !c.is_empty()) {
        text.push(' ');
        text.push_str(phrasebook.caution);
        text.push(' ');
        text.push_str(caution);
    }

    text
}

fn reasons(phrasebook: &Phrasebook, signals: &[MatchedSignal]) -> Vec<String> {
    let mut phrases: Vec<&str> = Vec::new();
    let mut states: Vec<&str> = Vec::new();
    let mut dimensions: Vec<PreferenceDimension> = Vec::new();

    for signal in signals {
        match signal {
            MatchedSignal::Keyword { phrase, .. } => push_unique(&mut phrases, phrase.as_str()),
            MatchedSignal::EmotionalState { state, .. } => push_unique(&mut states, state.as_str()),
            MatchedSignal::Preference { dimension, .. } => push_unique(&mut dimensions, *dimension),
        }
    }

    let mut reasons = Vec::new();
    if !phrases.is_empty() {
        let quoted: Vec<String> = phrases
            .iter()
            .take(MAX_QUOTED_PHRASES)
            .map(|phrase| phrasebook.quote(phrase))
            .collect();
        reasons.push(format!(
            "{} {}",
            phrasebook.mentions,
            join_items(&quoted, phrasebook.and)
        ));
    }
    if !states.is_empty() {
        let quoted: Vec<String> = states.iter().map(|state| phrasebook.quote(state)).collect();
        reasons.push(format!(
            "{} {}",
            phrasebook.speaks_to,
            join_items(&quoted, phrasebook.and)
        ));
    }
    if !dimensions.is_empty() {
        let labels: Vec<String> = dimensions
            .iter()
            .map(|dimension| phrasebook.dimension(*dimension).to_string())
            .collect();
        reasons.push(format!(
            "{} {}",
            phrasebook.fits,
            join_items(&labels, phrasebook.and)
        ));
    }
    reasons
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// "a", "a and b", "a, b and c".
fn join_items(items: &[String], and: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} {and} {last}", init.join(", ")),
    }
}

/// Like [`join_items`] but with a comma before the final conjunction, since clauses
/// may already contain one.
fn join_clauses(clauses: &[String], and: &str) -> String {
    match clauses {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, {and} {last}", init.join(", ")),
    }
}

struct Phrasebook {
    locale: Locale,
    and: &'static str,
    mentions: &'static str,
    speaks_to: &'static str,
    fits: &'static str,
    caution: &'static str,
}

impl Phrasebook {
    fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                locale,
                and: "and",
                mentions: "your question mentions",
                speaks_to: "it speaks to",
                fits: "it fits your preferred",
                caution: "Keep in mind:",
            },
            Locale::Es => Self {
                locale,
                and: "y",
                mentions: "tu pregunta menciona",
                speaks_to: "responde a",
                fits: "encaja con tu preferencia de",
                caution: "Ten en cuenta:",
            },
            Locale::Ca => Self {
                locale,
                and: "i",
                mentions: "la teva pregunta esmenta",
                speaks_to: "respon a",
                fits: "encaixa amb la teva preferència de",
                caution: "Tingues en compte:",
            },
        }
    }

    fn quote(&self, text: &str) -> String {
        match self.locale {
            Locale::En => format!("\"{text}\""),
            Locale::Es | Locale::Ca => format!("«{text}»"),
        }
    }

    fn spread_name(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("the {name}"),
            Locale::Es | Locale::Ca => self.quote(name),
        }
    }

    fn dimension(&self, dimension: PreferenceDimension) -> &'static str {
        match (self.locale, dimension) {
            (Locale::En, PreferenceDimension::CardCount) => "card count",
            (Locale::En, PreferenceDimension::Complexity) => "complexity",
            (Locale::En, PreferenceDimension::Experience) => "experience level",
            (Locale::En, PreferenceDimension::Timeframe) => "timeframe",
            (Locale::Es, PreferenceDimension::CardCount) => "número de cartas",
            (Locale::Es, PreferenceDimension::Complexity) => "complejidad",
            (Locale::Es, PreferenceDimension::Experience) => "nivel de experiencia",
            (Locale::Es, PreferenceDimension::Timeframe) => "horizonte temporal",
            (Locale::Ca, PreferenceDimension::CardCount) => "nombre de cartes",
            (Locale::Ca, PreferenceDimension::Complexity) => "complexitat",
            (Locale::Ca, PreferenceDimension::Experience) => "nivell d'experiència",
            (Locale::Ca, PreferenceDimension::Timeframe) => "horitzó temporal",
        }
    }

    fn matched_lead(&self, name: &str, reasons: &str) -> String {
        match self.locale {
            Locale::En => format!("I recommend {name} because {reasons}."),
            Locale::Es => format!("Te recomiendo {name} porque {reasons}."),
            Locale::Ca => format!("Et recomano {name} perquè {reasons}."),
        }
    }

    fn generic_lead(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("I recommend {name} as the closest fit for your question."),
            Locale::Es => format!("Te recomiendo {name} como la opción que mejor encaja con tu pregunta."),
            Locale::Ca => format!("Et recomano {name} com l'opció que millor encaixa amb la teva pregunta."),
        }
    }

    fn fallback_lead(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!(
                "No spread matched your question strongly, so I suggest {name} as a versatile default."
            ),
            Locale::Es => format!(
                "Ninguna tirada encaja claramente con tu pregunta, así que te propongo {name} como opción versátil."
            ),
            Locale::Ca => format!(
                "Cap tirada no encaixa clarament amb la teva pregunta, així que et proposo {name} com a opció versàtil."
            ),
        }
    }
}
