//! Engine-level errors with provider and operation context.
//!
//! ```rust
//! use swengine::{EngineError, EngineErrorKind};
//!
//! let error = EngineError::invocation_failed("Division by zero")
//!     .with_provider("calculator")
//!     .with_operation("divide");
//!
//! assert_eq!(error.kind, EngineErrorKind::InvocationFailed);
//! assert!(error.to_string().contains("provider=calculator"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use swprovider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    InvalidRequest,
    ProviderUnavailable,
    NoSuitableOperation,
    InvocationFailed,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub message: String,
    pub provider: Option<String>,
    pub operation: Option<String>,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider: None,
            operation: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::InvalidRequest, message)
    }

    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::ProviderUnavailable, message)
    }

    pub fn no_suitable_operation(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::NoSuitableOperation, message)
    }

    pub fn invocation_failed(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::InvocationFailed, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::Timeout, message)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            EngineErrorKind::InvalidRequest | EngineErrorKind::NoSuitableOperation
        )
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.provider, &self.operation) {
            (Some(provider), Some(operation)) => write!(
                f,
                "{:?} [provider={}, operation={}]: {}",
                self.kind, provider, operation, self.message
            ),
            (Some(provider), None) => {
                write!(f, "{:?} [provider={}]: {}", self.kind, provider, self.message)
            }
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for EngineError {}

impl From<ProviderError> for EngineError {
    fn from(value: ProviderError) -> Self {
        let message = value.to_string();
        match value.kind {
            ProviderErrorKind::Unavailable => EngineError::provider_unavailable(message),
            ProviderErrorKind::Timeout => EngineError::timeout(message),
            _ => EngineError::invocation_failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_onto_engine_kinds() {
        let unavailable: EngineError = ProviderError::unavailable("gone").into();
        assert_eq!(unavailable.kind, EngineErrorKind::ProviderUnavailable);

        let timeout: EngineError = ProviderError::timeout("slow").into();
        assert_eq!(timeout.kind, EngineErrorKind::Timeout);

        let failure: EngineError = ProviderError::tool_failure("Division by zero").into();
        assert_eq!(failure.kind, EngineErrorKind::InvocationFailed);
        assert!(failure.message.contains("Division by zero"));
    }

    #[test]
    fn context_fields_are_included_in_display() {
        let rendered = EngineError::timeout("exceeded 60000ms")
            .with_provider("github")
            .with_operation("search_code")
            .to_string();

        assert!(rendered.contains("provider=github"));
        assert!(rendered.contains("operation=search_code"));
        assert!(rendered.contains("exceeded 60000ms"));
    }

    #[test]
    fn user_errors_are_classified() {
        assert!(EngineError::invalid_request("blank").is_user_error());
        assert!(!EngineError::provider_unavailable("dead").is_user_error());
    }
}
