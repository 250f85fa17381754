//! End-to-end behavior of the matching and statistics engines through the
//! public API.

use std::num::NonZeroU32;

use deckforge::{
    CardRecord, DeckEntry, FuzzyMatcher, LruCache, ManaColor, NoCache, Source, TypeCategory,
    compute_stats,
};

fn card(name: &str) -> CardRecord {
    CardRecord::new(name)
}

fn entry(name: &str, type_line: &str, cost: &str, qty: u32) -> DeckEntry {
    DeckEntry::new(name, type_line, cost, NonZeroU32::new(qty).expect("non-zero"))
}

#[test]
fn test_exact_match_scores_zero() {
    let matcher = FuzzyMatcher::default();
    for name in ["Lightning Bolt", "x", "Jötun Grunt", "Kiki-Jiki, Mirror Breaker"] {
        let results = matcher.match_candidates(name, &[card(name)]);
        assert_eq!(results.len(), 1, "{name}");
        assert!(results[0].score.abs() < f64::EPSILON, "{name}");
    }
}

#[test]
fn test_case_insensitive_scores() {
    let matcher = FuzzyMatcher::default();
    let candidates = [card("Lightning Bolt")];
    let lower = matcher.match_candidates("bolt", &candidates);
    let upper = matcher.match_candidates("BOLT", &candidates);
    assert_eq!(lower.len(), 1);
    assert_eq!(lower[0].score.to_bits(), upper[0].score.to_bits());
}

#[test]
fn test_threshold_exclusion() {
    let matcher = FuzzyMatcher::default();
    assert!(matcher.match_candidates("xyz123", &[card("Lightning Bolt")]).is_empty());
}

#[test]
fn test_collection_before_remote() {
    let matcher = FuzzyMatcher::default();
    let local = [card("Grizzly Bears").with_type_line("Creature — Bear")];
    let remote = [card("Bear Cub")];
    let results = matcher.search_suggestions("bear", &local, &remote, &mut NoCache);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source, Source::Collection);
    assert!((results[0].score - 0.3).abs() < f64::EPSILON);
    assert_eq!(results[1].source, Source::Remote);
    assert!(results[1].score.abs() < f64::EPSILON);
}

#[test]
fn test_collection_typeline_match_still_first() {
    let matcher = FuzzyMatcher::default();
    let local = [card("Runeclaw Bear").with_type_line("Creature — Bear")];
    let results = matcher.search_suggestions("creature", &local, &[card("Creature Bond")], &mut NoCache);
    assert!((results[0].score - 0.5).abs() < f64::EPSILON);
    assert_eq!(results[0].card.name, "Runeclaw Bear");
    assert_eq!(results[1].card.name, "Creature Bond");
}

#[test]
fn test_cap_at_ten() {
    let matcher = FuzzyMatcher::default();
    let local: Vec<CardRecord> = (0..20).map(|i| card(&format!("Goblin Token {i}"))).collect();
    let remote: Vec<CardRecord> = (0..5).map(|i| card(&format!("Goblin Remote {i}"))).collect();
    let results = matcher.search_suggestions("goblin", &local, &remote, &mut NoCache);
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|r| r.source == Source::Collection));
}

#[test]
fn test_cache_reuse() {
    let matcher = FuzzyMatcher::default();
    let mut cache = LruCache::new(4);
    let first = matcher.search_suggestions("shock", &[card("Shock")], &[], &mut cache);
    let second = matcher.search_suggestions("shock", &[card("Shock"), card("Shocker")], &[], &mut cache);
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_mana_curve_totals() {
    let stats = compute_stats(&[
        entry("Knight", "Creature", "{2}{W}", 4),
        entry("Plains", "Land", "", 10),
    ]);
    assert_eq!(stats.mana_curve, [0, 0, 0, 4, 0, 0, 0]);
    assert_eq!(stats.total_cards, 14);
    assert_eq!(stats.count_of(TypeCategory::Creature), 4);
    assert_eq!(stats.count_of(TypeCategory::Land), 10);
    assert_eq!(stats.type_breakdown.len(), 2);
    assert!((stats.average_mana_cost - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_six_plus_bucketing() {
    let stats = compute_stats(&[entry("Ulamog", "Legendary Creature — Eldrazi", "{10}", 1)]);
    assert_eq!(stats.mana_curve, [0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_consistency_bounds() {
    let decks = vec![
        vec![entry("Ornithopter", "Artifact Creature — Thopter", "{0}", 4)],
        vec![entry("Mountain", "Basic Land — Mountain", "", 60)],
        (0..15)
            .map(|i| entry(&format!("Card {i}"), "Instant", "{1}{U}", 4))
            .collect(),
        vec![entry("Colossus", "Artifact Creature", "{15}", 500)],
    ];
    for deck in &decks {
        let score = compute_stats(deck).consistency_score;
        assert!((0.0..=1.0).contains(&score), "score {score} out of range");
    }
}

#[test]
fn test_size_bonus_boundary() {
    // Same shape each time; only the deck size moves.
    let deck = |lands: u32| {
        vec![
            entry("Grizzly Bears", "Creature — Bear", "{1}{G}", 4),
            entry("Forest", "Basic Land — Forest", "", lands),
        ]
    };
    let at_60 = compute_stats(&deck(56)).consistency_score;
    let at_59 = compute_stats(&deck(55)).consistency_score;
    let at_76 = compute_stats(&deck(72)).consistency_score;
    assert!((at_60 - at_59 - 0.3).abs() < 1e-12);
    assert!((at_60 - at_76 - 0.3).abs() < 1e-12);
}

#[test]
fn test_idempotent() {
    let deck = vec![
        entry("Counterspell", "Instant", "{U}{U}", 4),
        entry("Snapcaster Mage", "Creature — Human Wizard", "{1}{U}", 3),
        entry("Cryptic Command", "Instant", "{1}{U}{U}{U}", 2),
        entry("Island", "Basic Land — Island", "", 22),
    ];
    let before = deck.clone();
    let first = compute_stats(&deck);
    let second = compute_stats(&deck);
    assert_eq!(deck, before);
    assert_eq!(first, second);
    assert_eq!(first.average_mana_cost.to_bits(), second.average_mana_cost.to_bits());
    assert_eq!(first.consistency_score.to_bits(), second.consistency_score.to_bits());
    assert_eq!(first.color_spread.get(&ManaColor::Blue), Some(&(8 + 3 + 6)));
}

#[test]
fn test_empty_deck() {
    let stats = compute_stats(&[]);
    assert_eq!(stats.total_cards, 0);
    assert!(stats.average_mana_cost.abs() < f64::EPSILON);
    assert!(stats.consistency_score.abs() < f64::EPSILON);
    assert_eq!(stats.mana_curve, [0; 7]);
    assert!(stats.type_breakdown.is_empty());
    assert!(stats.color_spread.is_empty());
}
