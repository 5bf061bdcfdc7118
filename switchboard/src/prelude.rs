//! Common imports for applications embedding the orchestration engine.

pub use crate::{
    ConfigError, ContentPart, Engine, EngineBuilder, EngineError, EngineErrorKind, EngineHooks,
    InvocationResult, OperationDescriptor, ProviderConfig, ProviderStatus, RouteRequest,
    RoutingMode, SwitchboardConfig, Topic, TransportKind,
};
pub use crate::{init_tracing, parse_routing_mode, start, start_with};
pub use crate::{sb_config, sb_request};
