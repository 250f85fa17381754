//! Parse mana cost tool.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::mana::{ManaColor, ManaCost};
use crate::server::{ToolCallResult, ToolDefinition};

/// Parameters for the parse_mana_cost tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseManaCostParams {
    #[serde(alias = "mana_cost")]
    pub mana_cost: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParsedCost {
    converted_cost: u32,
    pips: BTreeMap<ManaColor, u32>,
    colors: Vec<ManaColor>,
}

/// Return the tool definition for `parse_mana_cost`.
pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "parse_mana_cost".to_owned(),
        description: "Parse a mana cost like {2}{W}{U} into converted cost, pips and colors. \
            Unrecognised symbols count as nothing."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "manaCost": {
                    "type": "string",
                    "description": "Oracle-style mana cost"
                }
            },
            "required": ["manaCost"]
        }),
    }
}

/// Execute the parse_mana_cost tool.
///
/// # Errors
///
/// Returns an error if the arguments are malformed.
pub fn execute(arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: ParseManaCostParams =
        serde_json::from_value(arguments).context("invalid parse_mana_cost parameters")?;

    let cost = ManaCost::parse(&params.mana_cost);
    let parsed = ParsedCost {
        converted_cost: cost.converted_cost(),
        pips: cost.pips().iter().collect(),
        colors: cost.colors(),
    };
    super::json_result(&parsed)
}
