//! JSON-RPC 2.0 envelopes shared by the stdio and HTTP channels.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProviderError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn call(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Some(id),
            method,
            params,
        }
    }

    pub fn notification(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_ref().and_then(Value::as_u64)
    }

    pub fn into_result(self) -> Result<Value, ProviderError> {
        if let Some(error) = self.error {
            return Err(ProviderError::rpc(error.code, error.message));
        }

        Ok(self.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn notifications_omit_the_id_field() {
        let encoded = serde_json::to_value(RpcRequest::notification(
            "notifications/initialized",
            json!({}),
        ))
        .expect("encode");

        assert!(encoded.get("id").is_none());
        assert_eq!(encoded["jsonrpc"], "2.0");
    }

    #[test]
    fn error_responses_become_rpc_errors() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "error": {"code": -32601, "message": "Method not found: ping"}
        }))
        .expect("decode");

        assert_eq!(response.numeric_id(), Some(4));
        let error = response.into_result().expect_err("should be an error");
        assert_eq!(error.kind, ProviderErrorKind::Rpc);
        assert_eq!(error.code, Some(-32601));
    }
}
