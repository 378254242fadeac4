use crate::infra::build_service;
use clap::Args;
use spread_advisor::catalog::{Catalog, Locale};
use spread_advisor::config::AppConfig;
use spread_advisor::error::AppError;
use spread_advisor::recommendation::router::SpreadSummary;
use spread_advisor::recommendation::{RecommendRequest, RecommendationResult};
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Question to find a spread for
    #[arg(long, short)]
    pub(crate) question: String,
    /// Locale for the explanation (en, es, ca)
    #[arg(long, default_value = "en")]
    pub(crate) locale: String,
    /// Emotional-state tag; repeat for several
    #[arg(long = "tag")]
    pub(crate) tags: Vec<String>,
    /// Preferred card count, e.g. "1" or "3-5"
    #[arg(long)]
    pub(crate) card_count: Option<String>,
    /// Preferred complexity (simple, medium, complex, extended)
    #[arg(long)]
    pub(crate) complexity: Option<String>,
    /// Reader experience level
    #[arg(long)]
    pub(crate) experience: Option<String>,
    /// Time horizon of the question
    #[arg(long)]
    pub(crate) timeframe: Option<String>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SpreadsArgs {
    /// Locale for spread names and purposes
    #[arg(long, default_value = "en")]
    pub(crate) locale: String,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;

    let json = args.json;
    let request = RecommendRequest {
        question: args.question,
        locale: Some(args.locale),
        emotional_states: args.tags,
        card_count_preference: args.card_count,
        complexity_level: args.complexity,
        experience_level: args.experience,
        timeframe: args.timeframe,
    };
    let result = service.recommend(&request.into_query())?;

    if json {
        let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_recommendation(&result));
    }
    Ok(())
}

pub(crate) fn run_spreads(args: SpreadsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;
    let locale = Locale::parse(&args.locale).unwrap_or_default();
    print!("{}", render_spreads(&service.catalog(), locale));
    Ok(())
}

pub(crate) fn render_recommendation(result: &RecommendationResult) -> String {
    let mut out = String::new();
    let best = &result.best_match;
    let _ = writeln!(
        out,
        "Recommended spread: {} (score {:.2}, {:?} confidence{})",
        best.spread_id,
        best.score,
        best.confidence,
        if result.fallback_used { ", default" } else { "" }
    );
    let _ = writeln!(out, "{}", result.explanation);

    if !result.alternatives.is_empty() {
        let _ = writeln!(out, "Alternatives:");
        for alternative in &result.alternatives {
            let _ = writeln!(
                out,
                "  - {} (score {:.2})",
                alternative.spread_id, alternative.score
            );
        }
    }
    if result.locale_fallback {
        let _ = writeln!(out, "Note: some content was shown in English.");
    }
    out
}

pub(crate) fn render_spreads(catalog: &Catalog, locale: Locale) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} spreads ({locale})", catalog.len());
    for spread in catalog.iter() {
        let summary = SpreadSummary::from_spread(spread, locale);
        let _ = writeln!(
            out,
            "- {} | {} | {} cards",
            summary.id, summary.name, summary.card_count
        );
        let _ = writeln!(out, "    {}", summary.purpose);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use spread_advisor::catalog::{CatalogHandle, CatalogSource};
    use spread_advisor::recommendation::{Query, RecommendationService, ScoringConfig};
    use std::sync::Arc;

    fn service() -> RecommendationService {
        let handle = CatalogHandle::load(CatalogSource::Embedded).expect("embedded catalog");
        RecommendationService::new(Arc::new(handle), ScoringConfig::default())
    }

    #[test]
    fn renders_recommendation_with_alternatives() {
        let result = service()
            .recommend(&Query::new("should I take this job or stay", "en"))
            .expect("recommendation");

        let text = render_recommendation(&result);
        assert!(text.starts_with("Recommended spread: two_card (score 0.37, Medium confidence)"));
        assert!(text.contains("Alternatives:\n  - single (score 0.34)"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn renders_fallback_marker() {
        let result = service()
            .recommend(&Query::new("asdkfj", "en"))
            .expect("recommendation");

        let text = render_recommendation(&result);
        assert!(text.starts_with("Recommended spread: three_card (score 0.00, Low confidence, default)"));
        assert!(!text.contains("Alternatives:"));
    }

    #[test]
    fn renders_localized_spread_listing() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let text = render_spreads(&catalog, Locale::Es);
        assert!(text.starts_with("11 spreads (es)"));
        assert!(text.contains("- celtic_cross | Cruz Celta | 10 cards"));
    }
}
