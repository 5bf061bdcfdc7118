//! MCP method names and payload decoding on top of a JSON-RPC channel.

use serde_json::{Map, Value, json};

use crate::{ContentPart, InputSchema, OperationDescriptor, ProviderError};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_LIST_TOOLS: &str = "tools/list";
pub const METHOD_CALL_TOOL: &str = "tools/call";

pub fn initialize_params() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

pub fn call_params(operation: &str, arguments: Map<String, Value>) -> Value {
    json!({
        "name": operation,
        "arguments": Value::Object(arguments),
    })
}

pub fn decode_tool_list(provider: &str, result: &Value) -> Result<Vec<OperationDescriptor>, ProviderError> {
    let tools = result
        .get("tools")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::protocol("tools/list result is missing a 'tools' array"))?;

    tools
        .iter()
        .map(|tool| {
            let name = tool
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ProviderError::protocol("tool entry is missing a name"))?;
            let description = tool
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let input_schema = tool
                .get("inputSchema")
                .map(InputSchema::from_json)
                .unwrap_or_default();

            Ok(OperationDescriptor::new(provider, name, description, input_schema))
        })
        .collect()
}

/// Tool-level failures (`isError`) are reported as errors carrying the text content.
pub fn decode_call_result(result: &Value) -> Result<Vec<ContentPart>, ProviderError> {
    let parts: Vec<ContentPart> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|content| content.iter().map(ContentPart::from_json).collect())
        .unwrap_or_default();

    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        let message = parts
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join("\n");
        let message = if message.is_empty() {
            "tool reported an error without details".to_string()
        } else {
            message
        };
        return Err(ProviderError::tool_failure(message));
    }

    Ok(parts)
}
