//! Deck stats tool: curve, type and color breakdowns, average cost and
//! consistency for a deck list.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::card::{ExternalCard, merge_duplicates};
use crate::server::{ToolCallResult, ToolDefinition};
use crate::stats::DeckStatsEngine;

/// Parameters for the deck_stats tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStatsParams {
    /// Deck entries; `quantity` (or `qty`) defaults to 1.
    pub entries: Vec<ExternalCard>,
    /// Fold same-named entries together first (default: false).
    #[serde(default)]
    pub merge_duplicates: bool,
}

pub(crate) fn entries_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "description": "Deck entries",
        "items": {
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "type_line": { "type": "string" },
                "mana_cost": { "type": "string" },
                "quantity": { "type": "integer", "minimum": 1, "default": 1 }
            },
            "required": ["name"]
        }
    })
}

/// Return the tool definition for `deck_stats`.
pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "deck_stats".to_owned(),
        description: "Compute mana curve, type breakdown, color spread, average mana cost \
            and consistency score for a deck."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "entries": entries_schema(),
                "mergeDuplicates": {
                    "type": "boolean",
                    "description": "Merge entries with the same name first (default: false)",
                    "default": false
                }
            },
            "required": ["entries"]
        }),
    }
}

/// Execute the deck_stats tool.
///
/// # Errors
///
/// Returns an error if the arguments are malformed.
pub fn execute(engine: &DeckStatsEngine, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: DeckStatsParams =
        serde_json::from_value(arguments).context("invalid deck_stats parameters")?;

    let mut entries = match super::normalize_entries(params.entries) {
        Ok(entries) => entries,
        Err(e) => return Ok(super::error_result(e)),
    };
    if params.merge_duplicates {
        entries = merge_duplicates(&entries);
    }

    super::json_result(&engine.compute(&entries))
}
