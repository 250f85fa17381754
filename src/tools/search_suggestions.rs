//! Search suggestions tool: ranked autocomplete list for a typed query.
//!
//! Local (collection) candidates are fuzzy-matched; remote candidates are
//! passed through as already ranked by the card database.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::card::ExternalCard;
use crate::search::{FuzzyMatcher, SuggestionCache};
use crate::server::{ToolCallResult, ToolDefinition};

/// Parameters for the search_suggestions tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestionsParams {
    /// What the user has typed so far.
    pub query: String,
    /// Cards from the user's collection.
    #[serde(default)]
    pub local: Vec<ExternalCard>,
    /// Cards returned by a remote search for the same query.
    #[serde(default)]
    pub remote: Vec<ExternalCard>,
}

/// Return the tool definition for `search_suggestions`.
pub fn tool_definition() -> ToolDefinition {
    let card_schema = serde_json::json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "type_line": { "type": "string" },
            "oracle_text": { "type": "string" },
            "mana_cost": { "type": "string" }
        },
        "required": ["name"]
    });
    ToolDefinition {
        name: "search_suggestions".to_owned(),
        description: "Rank card-name suggestions for a query. Collection matches come first, \
            then remote results, capped at the configured maximum. Results are cached per \
            query for the whole session: repeating a query returns the first answer even if \
            `local` or `remote` changed, until the entry is evicted."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The text typed so far"
                },
                "local": {
                    "type": "array",
                    "description": "Cards from the user's collection",
                    "items": card_schema
                },
                "remote": {
                    "type": "array",
                    "description": "Cards from a remote search, already ranked",
                    "items": card_schema
                }
            },
            "required": ["query"]
        }),
    }
}

/// Execute the search_suggestions tool.
///
/// # Errors
///
/// Returns an error if the arguments are malformed.
pub fn execute(
    matcher: &FuzzyMatcher,
    cache: &mut dyn SuggestionCache,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params: SearchSuggestionsParams =
        serde_json::from_value(arguments).context("invalid search_suggestions parameters")?;

    let local = match super::normalize_cards(params.local) {
        Ok(cards) => cards,
        Err(e) => return Ok(super::error_result(e)),
    };
    let remote = match super::normalize_cards(params.remote) {
        Ok(cards) => cards,
        Err(e) => return Ok(super::error_result(e)),
    };

    let suggestions = matcher.search_suggestions(&params.query, &local, &remote, cache);
    super::json_result(&suggestions)
}
