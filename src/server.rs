//! Stdio tool server.
//!
//! Speaks newline-delimited JSON-RPC 2.0: one request per input line, one
//! response per output line, nothing at all for notifications. The host
//! application lists the deck tools with `tools/list` and runs them with
//! `tools/call`.
//!
//! Two kinds of failure come back differently. Protocol failures (bad
//! JSON, unknown method, malformed `tools/call` params) are JSON-RPC
//! errors. Tool failures (a card without a name, a zero quantity, arguments
//! of the wrong shape) are ordinary results with `isError` set, so the
//! host can show the message next to the deck it was editing.

use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::tools::{self, ToolRouter};

/// Longest accepted request line, newline included (10 MiB).
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;
const PROTOCOL_VERSION: &str = "2025-06-18";

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Tool definition for `tools/list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Content item in a `tools/call` result.
#[derive(Debug, Serialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// `tools/call` result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ContentItem>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Protocol-level failure, reported as a JSON-RPC error object.
#[derive(Debug)]
enum RpcFailure {
    Parse(String),
    InvalidRequest(String),
    MethodNotFound(String),
    InvalidParams(String),
    Internal(String),
}

impl RpcFailure {
    const fn code(&self) -> i64 {
        match self {
            Self::Parse(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::Internal(_) => -32603,
        }
    }

    fn into_error(self) -> JsonRpcError {
        let code = self.code();
        let message = match self {
            Self::Parse(detail) => format!("parse error: {detail}"),
            Self::InvalidRequest(detail) => format!("invalid request: {detail}"),
            Self::MethodNotFound(method) => format!("method not found: {method}"),
            Self::InvalidParams(detail) => format!("invalid params: {detail}"),
            Self::Internal(detail) => format!("internal error: {detail}"),
        };
        JsonRpcError {
            code,
            message,
            data: None,
        }
    }
}

impl JsonRpcResponse {
    fn from_outcome(id: Option<Value>, outcome: Result<Value, RpcFailure>) -> Self {
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(failure) => (None, Some(failure.into_error())),
        };
        Self {
            jsonrpc: "2.0".to_owned(),
            id,
            result,
            error,
        }
    }
}

fn to_json(value: &impl Serialize) -> Result<Value, RpcFailure> {
    serde_json::to_value(value).map_err(|e| RpcFailure::Internal(format!("failed to serialize result: {e}")))
}

/// One client connection: the engines, the suggestion cache, and call
/// counters for the shutdown log line.
pub struct Session {
    router: ToolRouter,
    tool_calls: u64,
    tool_failures: u64,
}

impl Session {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            router: ToolRouter::new(config),
            tool_calls: 0,
            tool_failures: 0,
        }
    }

    /// Handles one input line. Blank lines and notifications yield `None`.
    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        debug!(raw = line, "received request");
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                Some(JsonRpcResponse::from_outcome(None, Err(RpcFailure::Parse(e.to_string()))))
            }
        }
    }

    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            warn!(version = request.jsonrpc, "rejecting non-2.0 request");
            let failure = RpcFailure::InvalidRequest(format!(
                "jsonrpc version must be \"2.0\", got \"{}\"",
                request.jsonrpc
            ));
            return Some(JsonRpcResponse::from_outcome(request.id, Err(failure)));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(initialize_result()),
            "notifications/initialized" => {
                info!("client initialized");
                return None;
            }
            "ping" => Ok(json!({})),
            "tools/list" => to_json(&self.router.list_tools()).map(|tools| json!({ "tools": tools })),
            "tools/call" => self.call_tool(request.params),
            other => {
                warn!(method = other, "unknown method");
                Err(RpcFailure::MethodNotFound(other.to_owned()))
            }
        };

        // A request without an id is a notification, answered by silence.
        let id = request.id?;
        Some(JsonRpcResponse::from_outcome(Some(id), outcome))
    }

    fn call_tool(&mut self, params: Value) -> Result<Value, RpcFailure> {
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| RpcFailure::InvalidParams(format!("tools/call: {e}")))?;

        self.tool_calls += 1;
        let result = self.router.call_tool(&call.name, call.arguments).unwrap_or_else(|e| {
            warn!(tool = call.name, error = %e, "tool arguments rejected");
            tools::error_result(format_args!("{e:#}"))
        });
        if result.is_error {
            self.tool_failures += 1;
        }
        to_json(&result)
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// Runs the tool server on stdin/stdout until stdin closes.
///
/// # Errors
///
/// Returns an error if stdin or stdout fails.
pub fn run_server(config: &EngineConfig) -> Result<()> {
    serve(config, std::io::stdin().lock(), std::io::stdout().lock())
}

/// Serves requests from `reader` until EOF, writing responses to `writer`.
///
/// # Errors
///
/// Returns an error if reading or writing fails. Bad requests, including
/// oversized or non-UTF-8 lines, are answered and skipped.
pub fn serve(config: &EngineConfig, reader: impl BufRead, writer: impl Write) -> Result<()> {
    serve_lines(config, reader, writer, MAX_LINE_BYTES)
}

fn serve_lines(
    config: &EngineConfig,
    mut reader: impl BufRead,
    mut writer: impl Write,
    max_line_bytes: usize,
) -> Result<()> {
    info!(
        max_score = config.matcher.max_score,
        max_suggestions = config.matcher.max_suggestions,
        cache_capacity = config.cache_capacity,
        "deckforge server starting"
    );

    let mut session = Session::new(config);
    let mut line = Vec::new();
    let limit = u64::try_from(max_line_bytes).unwrap_or(u64::MAX).saturating_add(1);

    loop {
        line.clear();
        let read = reader
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut line)
            .context("failed to read request")?;
        if read == 0 {
            break;
        }

        let response = if line.len() > max_line_bytes {
            if line.last() != Some(&b'\n') {
                reader.skip_until(b'\n').context("failed to skip oversized request")?;
            }
            warn!(limit = max_line_bytes, "discarding oversized request");
            let failure = RpcFailure::InvalidRequest(format!("request exceeds {max_line_bytes} bytes"));
            Some(JsonRpcResponse::from_outcome(None, Err(failure)))
        } else {
            match std::str::from_utf8(&line) {
                Ok(text) => session.handle_line(text),
                Err(e) => Some(JsonRpcResponse::from_outcome(None, Err(RpcFailure::Parse(e.to_string())))),
            }
        };

        if let Some(response) = response {
            write_response(&mut writer, &response)?;
        }
    }

    info!(
        tool_calls = session.tool_calls,
        tool_failures = session.tool_failures,
        cached_queries = session.router.cached_queries(),
        "input closed, deckforge server stopped"
    );
    Ok(())
}

fn write_response(out: &mut impl Write, response: &JsonRpcResponse) -> Result<()> {
    let mut json = serde_json::to_vec(response).context("failed to serialize response")?;
    json.push(b'\n');
    out.write_all(&json).context("failed to write response")?;
    out.flush().context("failed to flush output")
}
