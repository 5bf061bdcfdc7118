//! Production-friendly observability hooks for engine connection, catalog, and
//! request phases.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use swengine::EngineHooks;
//! use swobserve::{FanoutEngineHooks, MetricsEngineHooks, SafeEngineHooks, TracingEngineHooks};
//!
//! let hooks: Arc<dyn EngineHooks> = Arc::new(SafeEngineHooks::new(
//!     FanoutEngineHooks::new()
//!         .with(Arc::new(TracingEngineHooks))
//!         .with(Arc::new(MetricsEngineHooks)),
//! ));
//! # let _ = hooks;
//! ```

mod fanout_hooks;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout_hooks::FanoutEngineHooks;
pub use metrics_hooks::MetricsEngineHooks;
pub use safe_hooks::SafeEngineHooks;
pub use tracing_hooks::TracingEngineHooks;

pub mod prelude {
    pub use crate::{FanoutEngineHooks, MetricsEngineHooks, SafeEngineHooks, TracingEngineHooks};
}
