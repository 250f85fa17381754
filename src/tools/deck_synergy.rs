//! Deck synergy tool: 0-100 synergy score, its tier and improvement hints.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::card::ExternalCard;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::stats::DeckStatsEngine;
use crate::stats::synergy::SynergyEngine;

/// Parameters for the deck_synergy tool.
#[derive(Debug, Deserialize)]
pub struct DeckSynergyParams {
    pub entries: Vec<ExternalCard>,
}

/// Return the tool definition for `deck_synergy`.
pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "deck_synergy".to_owned(),
        description: "Score how well a deck's cards work together and suggest improvements."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "entries": super::deck_stats::entries_schema()
            },
            "required": ["entries"]
        }),
    }
}

/// Execute the deck_synergy tool.
///
/// # Errors
///
/// Returns an error if the arguments are malformed.
pub fn execute(
    stats: &DeckStatsEngine,
    synergy: &SynergyEngine,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params: DeckSynergyParams =
        serde_json::from_value(arguments).context("invalid deck_synergy parameters")?;

    let entries = match super::normalize_entries(params.entries) {
        Ok(entries) => entries,
        Err(e) => return Ok(super::error_result(e)),
    };

    let deck_stats = stats.compute(&entries);
    super::json_result(&synergy.report(&entries, &deck_stats))
}
