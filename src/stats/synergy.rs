//! Synergy scoring and improvement hints.
//!
//! Two lookup tables drive this: synergy partners (cards that want each
//! other) and archetype tags (aggro, burn, tribal-goblin, ...). The score
//! is a 0-100 blend of archetype cohesion, partner interactions, curve
//! shape, color count and type balance.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::{DeckStats, TypeCategory};
use crate::card::DeckEntry;
use crate::mana::ManaColor;

const COHESION_WEIGHT: f64 = 30.0;
const INTERACTION_WEIGHT: f64 = 25.0;
const CURVE_WEIGHT: f64 = 20.0;
const COLOR_WEIGHT: f64 = 15.0;
const TYPES_WEIGHT: f64 = 10.0;

const MAX_SUGGESTIONS: usize = 8;
const MAX_MISSING_PARTNERS: usize = 3;
/// Share of non-land cards at cost 5+ above which the curve is top-heavy.
const HIGH_COST_RATIO: f64 = 0.3;

const BUILTIN_PARTNERS: &[(&str, &[&str])] = &[
    ("Goblin Guide", &["Goblin Chieftain", "Goblin King", "Goblin Wardriver", "Goblin Bushwhacker"]),
    ("Goblin Chieftain", &["Goblin Guide", "Goblin King", "Goblin Wardriver", "Mogg War Marshal"]),
    ("Goblin King", &["Goblin Guide", "Goblin Chieftain", "Goblin Wardriver", "Mogg War Marshal"]),
    ("Lightning Bolt", &["Lava Spike", "Rift Bolt", "Chain Lightning", "Monastery Swiftspear"]),
    ("Lava Spike", &["Lightning Bolt", "Rift Bolt", "Chain Lightning", "Monastery Swiftspear"]),
    ("Monastery Swiftspear", &["Lightning Bolt", "Lava Spike", "Manamorphose", "Mutagenic Growth"]),
    ("Soul-Scar Mage", &["Lightning Bolt", "Lava Spike", "Monastery Swiftspear", "Manamorphose"]),
    ("Cranial Plating", &["Ornithopter", "Signal Pest", "Vault Skirge", "Memnite"]),
    ("Ornithopter", &["Cranial Plating", "Signal Pest", "Springleaf Drum", "Ensoul Artifact"]),
    ("Splinter Twin", &["Deceiver Exarch", "Pestermite", "Village Bell-Ringer"]),
    ("Deceiver Exarch", &["Splinter Twin", "Kiki-Jiki, Mirror Breaker"]),
    ("Counterspell", &["Snapcaster Mage", "Cryptic Command", "Force of Negation"]),
    ("Snapcaster Mage", &["Lightning Bolt", "Counterspell", "Path to Exile", "Cryptic Command"]),
];

const BUILTIN_TAGS: &[(&str, &[&str])] = &[
    ("Lightning Bolt", &["burn", "aggro", "direct-damage"]),
    ("Goblin Guide", &["aggro", "tribal-goblin", "hasty-creature"]),
    ("Monastery Swiftspear", &["aggro", "prowess", "hasty-creature"]),
    ("Lava Spike", &["burn", "direct-damage"]),
    ("Eidolon of the Great Revel", &["burn", "aggro", "damage-trigger"]),
    ("Goblin Chieftain", &["tribal-goblin", "lord", "anthem"]),
    ("Goblin King", &["tribal-goblin", "lord", "anthem"]),
    ("Lord of Atlantis", &["tribal-merfolk", "lord", "anthem"]),
    ("Counterspell", &["control", "permission", "instant"]),
    ("Wrath of God", &["control", "board-wipe", "sorcery"]),
    ("Snapcaster Mage", &["control", "value", "flash"]),
    ("Splinter Twin", &["combo", "enchantment", "infinite"]),
    ("Deceiver Exarch", &["combo", "creature", "tap-untap"]),
    ("Birds of Paradise", &["ramp", "mana-dork", "fixing"]),
    ("Llanowar Elves", &["ramp", "mana-dork", "green"]),
    ("Cranial Plating", &["artifact", "equipment", "aggro"]),
    ("Ornithopter", &["artifact", "creature", "free"]),
    ("Mountain", &["land", "basic", "red"]),
    ("Island", &["land", "basic", "blue"]),
    ("Forest", &["land", "basic", "green"]),
    ("Plains", &["land", "basic", "white"]),
    ("Swamp", &["land", "basic", "black"]),
];

/// Named band for a synergy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SynergyTier {
    None,
    Poor,
    Weak,
    Decent,
    Good,
    Strong,
    Powerful,
    Legendary,
}

impl SynergyTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => SynergyTier::Legendary,
            80..=89 => SynergyTier::Powerful,
            70..=79 => SynergyTier::Strong,
            60..=69 => SynergyTier::Good,
            50..=59 => SynergyTier::Decent,
            40..=49 => SynergyTier::Weak,
            30..=39 => SynergyTier::Poor,
            _ => SynergyTier::None,
        }
    }
}

impl fmt::Display for SynergyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            SynergyTier::Legendary => "Legendary Synergy",
            SynergyTier::Powerful => "Powerful Synergy",
            SynergyTier::Strong => "Strong Synergy",
            SynergyTier::Good => "Good Synergy",
            SynergyTier::Decent => "Decent Synergy",
            SynergyTier::Weak => "Weak Synergy",
            SynergyTier::Poor => "Poor Synergy",
            SynergyTier::None => "No Synergy",
        };
        f.write_str(title)
    }
}

/// Score, band and hints for one deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyReport {
    pub score: u32,
    pub tier: SynergyTier,
    pub title: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug)]
struct MissingPartner<'a> {
    card: &'a str,
    wanted_by: &'a str,
    strength: usize,
}

/// Synergy tables plus the scoring built on them.
#[derive(Debug, Clone)]
pub struct SynergyEngine {
    partners: HashMap<String, Vec<String>>,
    tags: HashMap<String, Vec<String>>,
}

impl Default for SynergyEngine {
    /// Seeded with the built-in partner and archetype tables.
    fn default() -> Self {
        let own = |table: &[(&str, &[&str])]| -> HashMap<String, Vec<String>> {
            table
                .iter()
                .map(|(card, list)| {
                    let list: Vec<String> = list.iter().map(|s| (*s).to_owned()).collect();
                    ((*card).to_owned(), list)
                })
                .collect()
        };
        Self {
            partners: own(BUILTIN_PARTNERS),
            tags: own(BUILTIN_TAGS),
        }
    }
}

impl SynergyEngine {
    /// An engine with no partner or tag knowledge.
    pub fn empty() -> Self {
        Self {
            partners: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    /// Records that `a` and `b` work together, in both directions.
    pub fn add_synergy_relation(&mut self, a: &str, b: &str) {
        push_unique(self.partners.entry(a.to_owned()).or_default(), b);
        push_unique(self.partners.entry(b.to_owned()).or_default(), a);
    }

    /// Adds archetype tags to a card, skipping ones it already has.
    pub fn add_archetype_tags(&mut self, card: &str, tags: &[&str]) {
        let list = self.tags.entry(card.to_owned()).or_default();
        for tag in tags {
            push_unique(list, tag);
        }
    }

    pub fn tags_for(&self, card: &str) -> &[String] {
        self.tags.get(card).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn partners_of(&self, card: &str) -> &[String] {
        self.partners.get(card).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Scores a deck from 0 to 100. `stats` must be the stats of `entries`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn score(&self, entries: &[DeckEntry], stats: &DeckStats) -> u32 {
        if entries.is_empty() {
            return 0;
        }
        let n = entries.len() as f64;

        let cohesion = match self.dominant_tag(entries) {
            Some(tag) => {
                let hits = entries
                    .iter()
                    .filter(|e| self.tags_for(&e.name).iter().any(|t| t == tag))
                    .count();
                hits as f64 / n
            }
            None => 0.0,
        };

        let names: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let interactions = entries
            .iter()
            .filter(|e| self.partners_of(&e.name).iter().any(|p| names.contains(p.as_str())))
            .count();

        let total = cohesion * COHESION_WEIGHT
            + interactions as f64 / n * INTERACTION_WEIGHT
            + curve_score(&stats.mana_curve) * CURVE_WEIGHT
            + color_score(&stats.color_spread) * COLOR_WEIGHT
            + type_balance_score(stats) * TYPES_WEIGHT;

        total.round().clamp(0.0, 100.0) as u32
    }

    /// Up to eight hints for improving the deck.
    pub fn suggest_improvements(&self, entries: &[DeckEntry], stats: &DeckStats) -> Vec<String> {
        if entries.is_empty() {
            return vec!["Add cards to your deck to get suggestions!".to_owned()];
        }
        let mut suggestions = Vec::new();

        if let Some(dominant) = self.dominant_tag(entries) {
            for entry in entries {
                let tags = self.tags_for(&entry.name);
                if !tags.is_empty() && !tags.iter().any(|t| t == dominant) {
                    suggestions.push(format!(
                        "Consider replacing {}: it doesn't support your {dominant} strategy.",
                        entry.name
                    ));
                }
            }
        }

        for missing in self.missing_partners(entries) {
            suggestions.push(format!(
                "Add {} to boost synergy with {}.",
                missing.card, missing.wanted_by
            ));
        }

        suggestions.extend(curve_issues(&stats.mana_curve));
        suggestions.extend(color_issues(&stats.color_spread));

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// Score, tier and hints in one go.
    pub fn report(&self, entries: &[DeckEntry], stats: &DeckStats) -> SynergyReport {
        let score = self.score(entries, stats);
        let tier = SynergyTier::from_score(score);
        SynergyReport {
            score,
            tier,
            title: tier.to_string(),
            suggestions: self.suggest_improvements(entries, stats),
        }
    }

    /// The tag with the highest quantity-weighted count. The first tag to
    /// reach a count wins ties.
    fn dominant_tag(&self, entries: &[DeckEntry]) -> Option<&str> {
        let mut counts: Vec<(&str, u64)> = Vec::new();
        for entry in entries {
            let quantity = u64::from(entry.quantity.get());
            for tag in self.tags_for(&entry.name) {
                match counts.iter_mut().find(|(t, _)| *t == tag.as_str()) {
                    Some((_, count)) => *count += quantity,
                    None => counts.push((tag.as_str(), quantity)),
                }
            }
        }

        let mut best: Option<(&str, u64)> = None;
        for (tag, count) in counts {
            if best.is_none_or(|(_, max)| count > max) {
                best = Some((tag, count));
            }
        }
        best.map(|(tag, _)| tag)
    }

    /// Strongest partner cards absent from the deck.
    fn missing_partners<'a>(&'a self, entries: &'a [DeckEntry]) -> Vec<MissingPartner<'a>> {
        let names: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let mut missing = Vec::new();
        for entry in entries {
            let own_tags = self.tags_for(&entry.name);
            for partner in self.partners_of(&entry.name) {
                if names.contains(partner.as_str()) {
                    continue;
                }
                let shared = self
                    .tags_for(partner)
                    .iter()
                    .filter(|t| own_tags.contains(t))
                    .count();
                missing.push(MissingPartner {
                    card: partner,
                    wanted_by: &entry.name,
                    strength: shared * 10,
                });
            }
        }
        missing.sort_by(|a, b| b.strength.cmp(&a.strength));
        missing.truncate(MAX_MISSING_PARTNERS);
        missing
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_owned());
    }
}

/// Curve shape quality in [0, 1].
#[allow(clippy::cast_precision_loss)]
fn curve_score(curve: &[u64]) -> f64 {
    let total: u64 = curve.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let mut score = 0.5;

    let peak_value = curve.iter().copied().max().unwrap_or(0);
    let peak = curve.iter().position(|&c| c == peak_value).unwrap_or(0);
    if (1..=3).contains(&peak) {
        score += 0.3;
    }

    let high_cost: u64 = curve.iter().skip(5).sum();
    if high_cost as f64 / total as f64 > HIGH_COST_RATIO {
        score -= 0.2;
    }

    if curve.get(1).copied().unwrap_or(0) > 0 {
        score += 0.2;
    }

    f64::clamp(score, 0.0, 1.0)
}

fn colored_count(spread: &BTreeMap<ManaColor, u64>) -> usize {
    spread.keys().filter(|c| c.is_colored()).count()
}

/// Fewer colors, steadier mana.
fn color_score(spread: &BTreeMap<ManaColor, u64>) -> f64 {
    match colored_count(spread) {
        0 | 1 => 1.0,
        2 => 0.8,
        3 => 0.6,
        _ => 0.4,
    }
}

/// Land and creature ratios in [0, 1].
#[allow(clippy::cast_precision_loss)]
fn type_balance_score(stats: &DeckStats) -> f64 {
    let total: u64 = stats.type_breakdown.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let land_ratio = stats.count_of(TypeCategory::Land) as f64 / total;
    let creature_ratio = stats.count_of(TypeCategory::Creature) as f64 / total;

    let mut score = 0.5;
    if (0.35..=0.45).contains(&land_ratio) {
        score += 0.3;
    } else if !(0.3..=0.5).contains(&land_ratio) {
        score -= 0.2;
    }
    if (0.2..=0.6).contains(&creature_ratio) {
        score += 0.2;
    }
    f64::clamp(score, 0.0, 1.0)
}

#[allow(clippy::cast_precision_loss)]
fn curve_issues(curve: &[u64]) -> Vec<String> {
    let mut issues = Vec::new();
    let total: u64 = curve.iter().sum();
    if total == 0 {
        return issues;
    }
    let at = |i: usize| curve.get(i).copied().unwrap_or(0);

    let high_cost: u64 = curve.iter().skip(5).sum();
    if high_cost as f64 / total as f64 > HIGH_COST_RATIO {
        issues.push("Consider reducing high-cost cards for better consistency.".to_owned());
    }

    if at(1) == 0 && (at(2) as f64) < total as f64 * 0.2 {
        issues.push("Add more low-cost cards for early game presence.".to_owned());
    }

    if total > 10 {
        if let Some(gap) = (1..4).find(|&i| at(i) == 0) {
            issues.push(format!("Consider adding {gap}-cost cards to smooth your curve."));
        }
    }
    issues
}

fn color_issues(spread: &BTreeMap<ManaColor, u64>) -> Vec<String> {
    let colors = colored_count(spread);
    let mut issues = Vec::new();
    if colors >= 3 {
        issues.push("Consider adding dual lands or mana fixing for your multicolor deck.".to_owned());
    }
    if colors >= 4 {
        issues.push("Your deck has many colors - ensure you have enough mana sources for each.".to_owned());
    }
    issues
}
