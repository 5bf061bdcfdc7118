//! Tool orchestration engine: connection lifecycle, request routing, invocation,
//! and result normalization over a set of MCP providers.
//!
//! ```rust,no_run
//! use swcommon::Topic;
//! use swengine::Engine;
//! use swprovider::ProviderConfig;
//!
//! # async fn run() -> Result<(), swengine::EngineError> {
//! let engine = Engine::builder()
//!     .initialize(vec![
//!         ProviderConfig::stdio("calculator", "python3", ["./mcp-servers/calculator-server.py"])
//!             .with_topic(Topic::Arithmetic),
//!     ])
//!     .await;
//!
//! let result = engine.auto_route("add 5 and 3").await?;
//! println!("{} via {}/{}", result.text, result.provider, result.operation);
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod hooks;
mod normalize;
mod types;

pub use engine::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_INVOCATION_TIMEOUT, DEFAULT_MAX_MESSAGE_CHARS, Engine,
    EngineBuilder,
};
pub use error::{EngineError, EngineErrorKind};
pub use hooks::{EngineHooks, NoopEngineHooks};
pub use normalize::{NO_RESPONSE, normalize};
pub use types::{
    InvocationResult, NO_OPERATION, OperationSummary, ProviderOperations, ProviderStatus,
    RouteRequest, RoutingMode,
};

pub mod prelude {
    pub use crate::{
        Engine, EngineBuilder, EngineError, EngineErrorKind, EngineHooks, InvocationResult,
        NoopEngineHooks, ProviderOperations, ProviderStatus, RouteRequest, RoutingMode,
    };
}
