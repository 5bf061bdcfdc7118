//! Provider-level error kinds and error value helpers.
//!
//! ```rust
//! use swprovider::{ProviderError, ProviderErrorKind};
//!
//! let err = ProviderError::rpc(-32601, "Unknown tool: cube");
//! assert_eq!(err.kind, ProviderErrorKind::Rpc);
//! assert_eq!(err.code, Some(-32601));
//! assert!(err.to_string().contains("Unknown tool"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Configuration,
    Spawn,
    Transport,
    Protocol,
    Rpc,
    ToolFailure,
    Unavailable,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub code: Option<i64>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Configuration, message)
    }

    pub fn spawn(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Spawn, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Protocol, message)
    }

    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            ..Self::new(ProviderErrorKind::Rpc, message)
        }
    }

    pub fn tool_failure(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ToolFailure, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{:?} ({}): {}", self.kind, code, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}
