//! Deck statistics: mana curve, type and color breakdowns, average cost
//! and a consistency heuristic.
//!
//! Everything is recomputed from the entry list on each call. Nothing is
//! cached and the input is never modified, so equal input always yields
//! equal output.

pub mod synergy;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::DeckEntry;
use crate::config::StatsConfig;
use crate::mana::{ManaColor, ManaCost};

/// Curve buckets 0..=5 plus a final "6 or more" bucket.
pub const CURVE_BUCKETS: usize = 7;

/// The single type bucket a card is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Planeswalker,
    Instant,
    Sorcery,
    Other,
}

impl TypeCategory {
    /// Keyword check order. An "Artifact Creature" is a Creature and an
    /// "Artifact Land" is a Land because of it; do not reorder.
    const PRIORITY: [TypeCategory; 7] = [
        TypeCategory::Land,
        TypeCategory::Creature,
        TypeCategory::Artifact,
        TypeCategory::Enchantment,
        TypeCategory::Planeswalker,
        TypeCategory::Instant,
        TypeCategory::Sorcery,
    ];

    /// Buckets a type line by case-sensitive keyword, first match wins.
    pub fn classify(type_line: &str) -> Self {
        Self::PRIORITY
            .into_iter()
            .find(|category| type_line.contains(category.keyword()))
            .unwrap_or(TypeCategory::Other)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            TypeCategory::Land => "Land",
            TypeCategory::Creature => "Creature",
            TypeCategory::Artifact => "Artifact",
            TypeCategory::Enchantment => "Enchantment",
            TypeCategory::Planeswalker => "Planeswalker",
            TypeCategory::Instant => "Instant",
            TypeCategory::Sorcery => "Sorcery",
            TypeCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Aggregate statistics for one deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    /// Non-land copies per converted cost; index 6 is "6+".
    pub mana_curve: [u64; CURVE_BUCKETS],
    /// Copies per type bucket; buckets with no cards are absent.
    pub type_breakdown: BTreeMap<TypeCategory, u64>,
    /// Pips per color weighted by quantity; colors with no pips are absent.
    pub color_spread: BTreeMap<ManaColor, u64>,
    pub total_cards: u64,
    pub average_mana_cost: f64,
    /// In [0, 1].
    pub consistency_score: f64,
}

impl DeckStats {
    /// Copies in a type bucket.
    pub fn count_of(&self, category: TypeCategory) -> u64 {
        self.type_breakdown.get(&category).copied().unwrap_or(0)
    }

    /// Copies that are not lands.
    pub fn non_land_cards(&self) -> u64 {
        self.mana_curve.iter().fold(0, |acc, &n| acc.saturating_add(n))
    }
}

/// Computes [`DeckStats`] with configurable consistency weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeckStatsEngine {
    config: StatsConfig,
}

impl DeckStatsEngine {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    /// Computes every statistic for `entries`.
    ///
    /// Duplicate names are fine: their quantities simply land in the same
    /// buckets. Quantities are always at least one since [`DeckEntry`]
    /// cannot hold zero. Counts saturate at `u64::MAX`.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(&self, entries: &[DeckEntry]) -> DeckStats {
        let mut mana_curve = [0u64; CURVE_BUCKETS];
        let mut type_breakdown = BTreeMap::new();
        let mut color_spread = BTreeMap::new();
        let mut total_cards = 0u64;
        let mut non_land_cards = 0u64;
        let mut non_land_cost = 0u64;

        for entry in entries {
            let quantity = u64::from(entry.quantity.get());
            let category = TypeCategory::classify(&entry.type_line);
            let cost = ManaCost::parse(&entry.mana_cost);
            let converted = u64::from(cost.converted_cost());

            total_cards = total_cards.saturating_add(quantity);
            let count = type_breakdown.entry(category).or_insert(0u64);
            *count = count.saturating_add(quantity);

            for (color, pips) in cost.pips().iter() {
                let spread = color_spread.entry(color).or_insert(0u64);
                *spread = spread.saturating_add(u64::from(pips).saturating_mul(quantity));
            }

            if category != TypeCategory::Land {
                let bucket = usize::try_from(converted)
                    .unwrap_or(usize::MAX)
                    .min(CURVE_BUCKETS - 1);
                mana_curve[bucket] = mana_curve[bucket].saturating_add(quantity);
                non_land_cards = non_land_cards.saturating_add(quantity);
                non_land_cost = non_land_cost.saturating_add(converted.saturating_mul(quantity));
            }
        }

        let average_mana_cost = if non_land_cards > 0 {
            non_land_cost as f64 / non_land_cards as f64
        } else {
            0.0
        };
        let consistency_score = self.consistency(entries, total_cards, &mana_curve);

        debug!(
            entries = entries.len(),
            total_cards, average_mana_cost, consistency_score, "computed deck stats"
        );

        DeckStats {
            mana_curve,
            type_breakdown,
            color_spread,
            total_cards,
            average_mana_cost,
            consistency_score,
        }
    }

    /// Four-of ratio + deck-size bonus + curve smoothness, clamped to [0, 1].
    #[allow(clippy::cast_precision_loss)]
    fn consistency(&self, entries: &[DeckEntry], total_cards: u64, curve: &[u64; CURVE_BUCKETS]) -> f64 {
        if total_cards == 0 || entries.is_empty() {
            return 0.0;
        }
        let cfg = &self.config;

        let four_ofs = entries.iter().filter(|e| e.quantity.get() == 4).count();
        let mut score = four_ofs as f64 / entries.len() as f64 * cfg.four_of_weight;

        let (min_size, max_size) = cfg.size_range;
        if (min_size..=max_size).contains(&total_cards) {
            score += cfg.size_bonus;
        }

        score += (cfg.curve_weight - variance(curve) / cfg.curve_variance_divisor).max(0.0);

        score.clamp(0.0, 1.0)
    }
}

/// Computes stats with the default configuration.
pub fn compute_stats(entries: &[DeckEntry]) -> DeckStats {
    DeckStatsEngine::default().compute(entries)
}

/// Population variance.
#[allow(clippy::cast_precision_loss)]
fn variance(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}
