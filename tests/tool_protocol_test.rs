//! Tool server protocol integration tests.
//!
//! Exercises the JSON-RPC types, the tool router, and the serve loop over
//! in-memory buffers.

use deckforge::config::EngineConfig;
use deckforge::server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, serve};
use deckforge::tools::ToolRouter;
use serde_json::{Value, json};

fn router() -> ToolRouter {
    ToolRouter::new(&EngineConfig::default())
}

fn result_json(result: &deckforge::server::ToolCallResult) -> Value {
    serde_json::from_str(&result.content[0].text).expect("tool output should be JSON")
}

/// Feed `lines` through the server and collect each response line.
fn run_session(lines: &[Value]) -> Vec<Value> {
    let input: String = lines.iter().map(|l| format!("{l}\n")).collect();
    let mut output = Vec::new();
    serve(&EngineConfig::default(), input.as_bytes(), &mut output).expect("serve should succeed");
    String::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("response should be JSON"))
        .collect()
}

#[test]
fn test_json_rpc_request_parsing() {
    let req_json = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-06-18",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "0.1.0"
            }
        }
    });

    let req: JsonRpcRequest = serde_json::from_value(req_json).expect("should parse initialize request");

    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, Some(json!(1)));
}

#[test]
fn test_json_rpc_error_response() {
    let resp = JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id: Some(json!(2)),
        result: None,
        error: Some(JsonRpcError {
            code: -32601,
            message: "method not found".to_owned(),
            data: None,
        }),
    };

    let json_str = serde_json::to_string(&resp).expect("should serialize");
    assert!(json_str.contains("-32601"));
    assert!(json_str.contains("method not found"));
    assert!(!json_str.contains("result")); // result is None, should be skipped
}

#[test]
fn test_tool_definitions_complete() {
    let tools = router().list_tools();
    assert_eq!(tools.len(), 4);

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"search_suggestions"));
    assert!(names.contains(&"deck_stats"));
    assert!(names.contains(&"deck_synergy"));
    assert!(names.contains(&"parse_mana_cost"));

    for tool in &tools {
        assert!(!tool.description.is_empty(), "tool {} missing description", tool.name);
        assert!(tool.input_schema.is_object(), "tool {} missing input_schema", tool.name);
    }
}

#[test]
fn test_tool_call_unknown() {
    let result = router()
        .call_tool("nonexistent_tool", json!({}))
        .expect("should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("Unknown tool"));
}

#[test]
fn test_search_suggestions_tool() {
    let mut router = router();
    let result = router
        .call_tool(
            "search_suggestions",
            json!({
                "query": "bolt",
                "local": [
                    { "name": "Shock", "type": "Instant" },
                    { "name": "Lightning Bolt", "type_line": "Instant" }
                ],
                "remote": [
                    { "name": "Bolt Bend", "mana_cost": "{3}{R}" }
                ]
            }),
        )
        .expect("search should succeed");

    assert!(!result.is_error);
    let suggestions = result_json(&result);
    let suggestions = suggestions.as_array().expect("array");
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["name"], "Lightning Bolt");
    assert_eq!(suggestions[0]["source"], "collection");
    assert_eq!(suggestions[1]["name"], "Bolt Bend");
    assert_eq!(suggestions[1]["manaCost"], "{3}{R}");
    assert_eq!(suggestions[1]["source"], "remote");
    assert_eq!(router.cached_queries(), 1);
}

#[test]
fn test_search_suggestions_rejects_nameless_card() {
    let result = router()
        .call_tool("search_suggestions", json!({ "query": "bolt", "local": [{ "type": "Instant" }] }))
        .expect("should not error");
    assert!(result.is_error);
    assert!(result.content[0].text.contains("empty name"));
}

#[test]
fn test_deck_stats_tool() {
    let result = router()
        .call_tool(
            "deck_stats",
            json!({
                "entries": [
                    { "name": "Benalish Knight", "type": "Creature — Human Knight", "manaCost": "{2}{W}", "qty": 4 },
                    { "name": "Plains", "type_line": "Basic Land — Plains", "quantity": 10 }
                ]
            }),
        )
        .expect("stats should succeed");

    assert!(!result.is_error);
    let stats = result_json(&result);
    assert_eq!(stats["manaCurve"], json!([0, 0, 0, 4, 0, 0, 0]));
    assert_eq!(stats["totalCards"], 14);
    assert_eq!(stats["typeBreakdown"], json!({ "Land": 10, "Creature": 4 }));
    assert_eq!(stats["colorSpread"], json!({ "White": 4 }));
    assert_eq!(stats["averageManaCost"], 3.0);
}

#[test]
fn test_deck_stats_merges_duplicates_on_request() {
    let entries = json!([
        { "name": "Shock", "type": "Instant", "manaCost": "{R}", "qty": 2 },
        { "name": "Shock", "type": "Instant", "manaCost": "{R}", "qty": 2 }
    ]);
    let mut router = router();

    let plain = router
        .call_tool("deck_stats", json!({ "entries": entries.clone() }))
        .expect("stats should succeed");
    let merged = router
        .call_tool("deck_stats", json!({ "entries": entries, "mergeDuplicates": true }))
        .expect("stats should succeed");

    // Same histograms either way, but merging turns two 2-ofs into a 4-of.
    let plain = result_json(&plain);
    let merged = result_json(&merged);
    assert_eq!(plain["manaCurve"], merged["manaCurve"]);
    assert!(merged["consistencyScore"].as_f64() > plain["consistencyScore"].as_f64());
}

#[test]
fn test_deck_stats_rejects_zero_quantity() {
    let result = router()
        .call_tool("deck_stats", json!({ "entries": [{ "name": "Shock", "qty": 0 }] }))
        .expect("should not error");
    assert!(result.is_error);
    assert!(result.content[0].text.contains("invalid quantity"));
}

#[test]
fn test_deck_synergy_tool() {
    let result = router()
        .call_tool(
            "deck_synergy",
            json!({
                "entries": [
                    { "name": "Lightning Bolt", "type": "Instant", "manaCost": "{R}", "qty": 4 },
                    { "name": "Lava Spike", "type": "Sorcery", "manaCost": "{R}", "qty": 4 }
                ]
            }),
        )
        .expect("synergy should succeed");

    assert!(!result.is_error);
    let report = result_json(&result);
    let score = report["score"].as_u64().expect("score");
    assert!(score <= 100);
    assert!(report["title"].as_str().expect("title").ends_with("Synergy"));
    assert!(report["suggestions"].as_array().expect("suggestions").len() <= 8);
}

#[test]
fn test_parse_mana_cost_tool() {
    let result = router()
        .call_tool("parse_mana_cost", json!({ "manaCost": "{1}{W}{U}{W/U}" }))
        .expect("parse should succeed");
    let parsed = result_json(&result);
    assert_eq!(parsed["convertedCost"], 4);
    assert_eq!(parsed["pips"], json!({ "White": 1, "Blue": 1 }));
    assert_eq!(parsed["colors"], json!(["White", "Blue"]));
}

#[test]
fn test_malformed_arguments_are_error_results() {
    let result = router()
        .call_tool("deck_stats", json!({ "entries": "not a list" }))
        .expect_err("bad arguments should error");
    assert!(format!("{result:#}").contains("invalid deck_stats parameters"));
}

#[test]
fn test_session_over_buffers() {
    let responses = run_session(&[
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "parse_mana_cost", "arguments": { "manaCost": "{G}{G}" } }
        }),
        json!({ "jsonrpc": "2.0", "id": 4, "method": "ping" }),
    ]);

    // The notification gets no response.
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "deckforge");
    assert_eq!(responses[1]["result"]["tools"].as_array().expect("tools").len(), 4);
    assert_eq!(responses[2]["id"], 3);
    assert!(responses[2]["result"]["content"][0]["text"].as_str().expect("text").contains("convertedCost"));
    assert_eq!(responses[3]["result"], json!({}));
}

#[test]
fn test_session_protocol_errors() {
    let input = "not json\n{\"jsonrpc\":\"1.0\",\"id\":1,\"method\":\"ping\"}\n\
                 {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"nope\"}\n\
                 {\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"tools/call\",\"params\":{\"arguments\":{}}}\n";
    let mut output = Vec::new();
    serve(&EngineConfig::default(), input.as_bytes(), &mut output).expect("serve should succeed");

    let codes: Vec<i64> = String::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|l| {
            let v: Value = serde_json::from_str(l).expect("json");
            v["error"]["code"].as_i64().expect("error code")
        })
        .collect();
    assert_eq!(codes, vec![-32700, -32600, -32601, -32602]);
}

#[test]
fn test_search_suggestions_cache_spans_calls() {
    let definition = router()
        .list_tools()
        .into_iter()
        .find(|t| t.name == "search_suggestions")
        .expect("search tool should be listed");
    assert!(definition.description.contains("cached per query"));

    let mut router = router();
    let first = router
        .call_tool("search_suggestions", json!({ "query": "bolt", "local": [{ "name": "Lightning Bolt" }] }))
        .expect("search should succeed");
    let second = router
        .call_tool("search_suggestions", json!({ "query": "bolt", "local": [{ "name": "Boltwave" }] }))
        .expect("search should succeed");

    // Same query, new collection: the first answer is served again.
    assert_eq!(result_json(&first), result_json(&second));
    assert_eq!(result_json(&second)[0]["name"], "Lightning Bolt");
}

#[test]
fn test_records_with_several_spellings_are_accepted() {
    let result = router()
        .call_tool(
            "deck_stats",
            json!({
                "entries": [
                    {
                        "name": "Shock",
                        "type_line": "Instant",
                        "type": "Instant",
                        "mana_cost": "{R}",
                        "manaCost": "{R}",
                        "quantity": 4,
                        "qty": 4
                    }
                ]
            }),
        )
        .expect("stats should succeed");

    assert!(!result.is_error);
    let stats = result_json(&result);
    assert_eq!(stats["totalCards"], 4);
    assert_eq!(stats["colorSpread"], json!({ "Red": 4 }));
}

#[test]
fn test_session_survives_oversized_request() {
    let padding = "x".repeat(11 * 1024 * 1024);
    let input = format!(
        "{{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"pad\":\"{padding}\"}}\n\
         {{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}}\n"
    );
    let mut output = Vec::new();
    serve(&EngineConfig::default(), input.as_bytes(), &mut output).expect("serve should succeed");

    let responses: Vec<Value> = String::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("json"))
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32600);
    assert_eq!(responses[1]["id"], 2);
}
