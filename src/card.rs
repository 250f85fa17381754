//! Canonical card and deck-entry records, plus the adapter that maps the
//! loosely-shaped records coming from card databases and saved collections
//! onto them.
//!
//! The matching and statistics engines only ever see [`CardRecord`] and
//! [`DeckEntry`]. Field-name variants (`type_line` vs `type`, `mana_cost`
//! vs `manaCost`, `qty` vs `quantity`) are resolved once, in
//! [`ExternalCard`].

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{DeckforgeError, DeckforgeResult};

/// A name-bearing card record as seen by the fuzzy matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
}

impl CardRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_line: None,
            oracle_text: None,
            mana_cost: None,
        }
    }

    #[must_use]
    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = Some(type_line.into());
        self
    }

    #[must_use]
    pub fn with_oracle_text(mut self, oracle_text: impl Into<String>) -> Self {
        self.oracle_text = Some(oracle_text.into());
        self
    }

    #[must_use]
    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>) -> Self {
        self.mana_cost = Some(mana_cost.into());
        self
    }
}

/// One line of a deck: a card and how many copies of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub name: String,
    pub type_line: String,
    pub mana_cost: String,
    pub quantity: NonZeroU32,
}

impl DeckEntry {
    pub fn new(
        name: impl Into<String>,
        type_line: impl Into<String>,
        mana_cost: impl Into<String>,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            name: name.into(),
            type_line: type_line.into(),
            mana_cost: mana_cost.into(),
            quantity,
        }
    }

    /// Builds an entry from an untrusted copy count.
    ///
    /// # Errors
    ///
    /// Returns [`DeckforgeError::InvalidQuantity`] when `quantity` is zero,
    /// negative, or larger than `u32::MAX`.
    pub fn try_new(
        name: impl Into<String>,
        type_line: impl Into<String>,
        mana_cost: impl Into<String>,
        quantity: i64,
    ) -> DeckforgeResult<Self> {
        let name = name.into();
        let Some(quantity) = u32::try_from(quantity).ok().and_then(NonZeroU32::new) else {
            return Err(DeckforgeError::InvalidQuantity { name, quantity });
        };
        Ok(Self::new(name, type_line, mana_cost, quantity))
    }
}

/// A card record in any of the shapes the card database or a saved
/// collection produces.
///
/// Each spelling of a field is kept separately so a record carrying more
/// than one of them still deserializes. They are resolved on conversion,
/// snake_case first, with empty strings counting as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalCard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default, rename = "typeLine")]
    pub type_line_camel: Option<String>,
    #[serde(default, rename = "type")]
    pub type_short: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default, rename = "oracleText")]
    pub oracle_text_camel: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default, rename = "manaCost")]
    pub mana_cost_camel: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub qty: Option<i64>,
}

/// First non-empty string among `candidates`.
fn first_present(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

impl ExternalCard {
    fn resolved_type_line(&mut self) -> Option<String> {
        first_present([
            self.type_line.take(),
            self.type_line_camel.take(),
            self.type_short.take(),
        ])
    }

    fn resolved_mana_cost(&mut self) -> Option<String> {
        first_present([self.mana_cost.take(), self.mana_cost_camel.take()])
    }

    /// Normalizes into the matcher's record shape.
    ///
    /// # Errors
    ///
    /// Returns [`DeckforgeError::EmptyCardName`] if the name is blank.
    pub fn into_card_record(mut self) -> DeckforgeResult<CardRecord> {
        if self.name.trim().is_empty() {
            return Err(DeckforgeError::EmptyCardName);
        }
        Ok(CardRecord {
            type_line: self.resolved_type_line(),
            oracle_text: first_present([self.oracle_text.take(), self.oracle_text_camel.take()]),
            mana_cost: self.resolved_mana_cost(),
            name: self.name,
        })
    }

    /// Normalizes into a deck entry. A missing quantity means one copy;
    /// `quantity` wins over `qty` when both are given.
    ///
    /// # Errors
    ///
    /// Returns [`DeckforgeError::EmptyCardName`] for a blank name and
    /// [`DeckforgeError::InvalidQuantity`] for a non-positive quantity.
    pub fn into_deck_entry(mut self) -> DeckforgeResult<DeckEntry> {
        if self.name.trim().is_empty() {
            return Err(DeckforgeError::EmptyCardName);
        }
        let type_line = self.resolved_type_line().unwrap_or_default();
        let mana_cost = self.resolved_mana_cost().unwrap_or_default();
        let quantity = self.quantity.or(self.qty).unwrap_or(1);
        DeckEntry::try_new(self.name, type_line, mana_cost, quantity)
    }
}

/// Folds entries that share a name into one, summing their quantities.
///
/// The first occurrence keeps its position and its type line and cost.
/// Entries carry no printing, so two printings of the same card merge too.
pub fn merge_duplicates(entries: &[DeckEntry]) -> Vec<DeckEntry> {
    let mut merged: Vec<DeckEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity.get()),
            None => merged.push(entry.clone()),
        }
    }
    merged
}
