//! Unified facade over the switchboard workspace crates.
//!
//! Applications depend on this crate alone: it re-exports the engine, the
//! provider layer, routing, and observability crates, and adds configuration
//! loading, tracing setup, and a bootstrap path from configuration to a running
//! [`Engine`].
//!
//! ```rust,no_run
//! use switchboard::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! init_tracing();
//! let engine = start(SwitchboardConfig::from_env()?).await;
//!
//! let result = engine.handle(sb_request!(auto => "what is 12 times 4")).await?;
//! println!("{}", result.text);
//!
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod macros;

pub mod config;
pub mod logging;
pub mod prelude;
pub mod runtime;
pub mod util;

pub use swcommon;
pub use swengine;
pub use swobserve;
pub use swprovider;
pub use swrouting;

pub use swcommon::{BoxFuture, EnvMap, Registry, RequestId, Topic, with_deadline};
pub use swengine::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_INVOCATION_TIMEOUT, DEFAULT_MAX_MESSAGE_CHARS, Engine,
    EngineBuilder, EngineError, EngineErrorKind, EngineHooks, InvocationResult, NO_OPERATION,
    NO_RESPONSE, NoopEngineHooks, OperationSummary, ProviderOperations, ProviderStatus,
    RouteRequest, RoutingMode,
};
pub use swobserve::{
    FanoutEngineHooks, MetricsEngineHooks, SafeEngineHooks, TracingEngineHooks,
};
pub use swprovider::{
    ContentPart, DefaultConnector, InputSchema, OperationDescriptor, ParamType, ProviderConfig,
    ProviderConnection, ProviderConnector, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderTransport, TransportDescriptor, TransportKind,
};
pub use swrouting::{AnalyzedQuery, OperationCatalog, ScoredCandidate, rank, select_best};

pub use config::{ConfigError, ConfigErrorKind, SwitchboardConfig};
pub use logging::{init_tracing, log_directive};
pub use runtime::{default_hooks, engine_builder, start, start_with};
pub use util::{auto_request, manual_request, parse_routing_mode, request};
