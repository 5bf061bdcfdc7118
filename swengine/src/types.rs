//! Request, result, and status types crossing the engine boundary.
//!
//! ```rust
//! use swengine::{RouteRequest, RoutingMode};
//!
//! let request = RouteRequest::manual("calculator", "add 5 and 3");
//! assert_eq!(request.mode, RoutingMode::Manual("calculator".to_string()));
//! assert_eq!(RouteRequest::auto("hello").mode, RoutingMode::Auto);
//! ```

use serde::Serialize;
use serde_json::Value;
use swcommon::RequestId;
use swprovider::{OperationDescriptor, TransportKind};

/// Operation name reported when manual routing finds nothing to call.
pub const NO_OPERATION: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "provider", rename_all = "snake_case")]
pub enum RoutingMode {
    Auto,
    Manual(String),
}

impl RoutingMode {
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Auto => None,
            Self::Manual(provider) => Some(provider),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub message: String,
    pub mode: RoutingMode,
    pub request_id: RequestId,
}

impl RouteRequest {
    pub fn new(message: impl Into<String>, mode: RoutingMode) -> Self {
        Self {
            message: message.into(),
            mode,
            request_id: RequestId::generate(),
        }
    }

    pub fn auto(message: impl Into<String>) -> Self {
        Self::new(message, RoutingMode::Auto)
    }

    pub fn manual(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(message, RoutingMode::Manual(provider.into()))
    }

    pub fn with_request_id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.request_id = request_id.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    pub text: String,
    pub provider: String,
    pub operation: String,
    #[serde(skip)]
    no_suitable_tools: bool,
}

impl InvocationResult {
    pub fn new(
        text: impl Into<String>,
        provider: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            operation: operation.into(),
            no_suitable_tools: false,
        }
    }

    /// Manual-routing result for a provider that offered nothing to call.
    pub fn no_suitable_tools(provider: &str) -> Self {
        Self {
            no_suitable_tools: true,
            ..Self::new(
                format!("No suitable tools found on provider '{provider}'"),
                provider,
                NO_OPERATION,
            )
        }
    }

    pub fn is_no_suitable_tools(&self) -> bool {
        self.no_suitable_tools
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub connected: bool,
    pub transport: TransportKind,
    pub operation_count: usize,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSummary {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<&OperationDescriptor> for OperationSummary {
    fn from(value: &OperationDescriptor) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            input_schema: value.input_schema.raw().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderOperations {
    pub provider: String,
    pub operations: Vec<OperationSummary>,
}
