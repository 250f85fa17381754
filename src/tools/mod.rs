//! Tool router: registers and dispatches tool calls.
//!
//! Each tool takes JSON arguments in the loose external card shapes,
//! normalizes them through [`ExternalCard`], runs the engine, and returns
//! the result as pretty-printed JSON text.

pub mod deck_stats;
pub mod deck_synergy;
pub mod parse_mana_cost;
pub mod search_suggestions;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::card::{CardRecord, DeckEntry, ExternalCard};
use crate::config::EngineConfig;
use crate::error::DeckforgeResult;
use crate::search::{FuzzyMatcher, LruCache, MatchResult};
use crate::server::{ContentItem, ToolCallResult, ToolDefinition};
use crate::stats::DeckStatsEngine;
use crate::stats::synergy::SynergyEngine;

/// Normalizes external records for the matcher.
///
/// # Errors
///
/// Fails on the first record without a name.
pub fn normalize_cards(cards: Vec<ExternalCard>) -> DeckforgeResult<Vec<CardRecord>> {
    cards.into_iter().map(ExternalCard::into_card_record).collect()
}

/// Normalizes external records into deck entries.
///
/// # Errors
///
/// Fails on the first record without a name or with a non-positive quantity.
pub fn normalize_entries(cards: Vec<ExternalCard>) -> DeckforgeResult<Vec<DeckEntry>> {
    cards.into_iter().map(ExternalCard::into_deck_entry).collect()
}

/// Successful tool result carrying `value` as JSON text.
pub(crate) fn json_result(value: &impl Serialize) -> Result<ToolCallResult> {
    Ok(ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text: serde_json::to_string_pretty(value)?,
        }],
        is_error: false,
    })
}

/// Failed tool result with a message for the caller.
pub(crate) fn error_result(message: impl std::fmt::Display) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text: format!("Error: {message}"),
        }],
        is_error: true,
    }
}

/// Tool router that dispatches tool calls to implementations.
///
/// Owns the engines and the suggestion cache, so it lives as long as the
/// server does.
pub struct ToolRouter {
    matcher: FuzzyMatcher,
    stats: DeckStatsEngine,
    synergy: SynergyEngine,
    cache: LruCache<String, Vec<MatchResult>>,
}

impl ToolRouter {
    /// Create a new tool router.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            matcher: FuzzyMatcher::new(config.matcher),
            stats: DeckStatsEngine::new(config.stats),
            synergy: SynergyEngine::default(),
            cache: LruCache::new(config.cache_capacity),
        }
    }

    /// List all available tools with their JSON Schema definitions.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![
            search_suggestions::tool_definition(),
            deck_stats::tool_definition(),
            deck_synergy::tool_definition(),
            parse_mana_cost::tool_definition(),
        ]
    }

    /// Number of queries currently memoized.
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Call a tool by name with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments don't deserialize or the result
    /// can't be serialized. Bad card data is reported as an error result.
    pub fn call_tool(&mut self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        debug!(tool = name, "dispatching tool call");

        match name {
            "search_suggestions" => search_suggestions::execute(&self.matcher, &mut self.cache, arguments),
            "deck_stats" => deck_stats::execute(&self.stats, arguments),
            "deck_synergy" => deck_synergy::execute(&self.stats, &self.synergy, arguments),
            "parse_mana_cost" => parse_mana_cost::execute(arguments),
            _ => Ok(error_result(format_args!("Unknown tool: {name}"))),
        }
    }
}
