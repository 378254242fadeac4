use spread_advisor::catalog::{Catalog, Complexity, Locale};

#[test]
fn embedded_catalog_covers_standard_spreads() {
    let catalog = Catalog::embedded().expect("embedded catalog loads");

    assert_eq!(catalog.len(), 11);
    assert_eq!(catalog.rejected(), 0);
    for id in ["single", "three_card", "celtic_cross", "year_ahead"] {
        assert!(catalog.contains(id), "{id} missing from catalog");
    }

    let celtic = catalog.get("celtic_cross").expect("celtic cross present");
    assert_eq!(celtic.card_count, 10);
    assert_eq!(
        celtic.criteria.prefer_when.complexity_level(),
        Some(Complexity::Complex)
    );
    assert_eq!(celtic.name.get(Locale::Es), Some("Cruz Celta"));
}

#[test]
fn every_spread_is_fully_localized() {
    let catalog = Catalog::embedded().expect("embedded catalog loads");

    for spread in catalog.iter() {
        for locale in Locale::ALL {
            assert!(
                spread.educational.purpose.get(locale).is_some(),
                "{} lacks purpose in {locale}",
                spread.id
            );
            assert!(
                spread.educational.when_to_use.get(locale).is_some(),
                "{} lacks whenToUse in {locale}",
                spread.id
            );
            assert!(
                spread.educational.when_to_avoid.get(locale).is_some(),
                "{} lacks whenToAvoid in {locale}",
                spread.id
            );
        }
        assert!(
            !spread.criteria.question_patterns.is_empty(),
            "{} has no question patterns",
            spread.id
        );
    }
}

#[test]
fn single_card_spread_prefers_one_card() {
    let catalog = Catalog::embedded().expect("embedded catalog loads");
    let single = catalog.get("single").expect("single present");
    assert!(single.criteria.prefer_when.wants_single_card());
}
