//! Engine lifecycle hooks.
//!
//! ```rust
//! use swengine::{EngineHooks, NoopEngineHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn EngineHooks) {}
//!
//! let hooks = NoopEngineHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use swcommon::RequestId;
use swprovider::{OperationDescriptor, ProviderError, TransportKind};

use crate::{EngineError, RouteRequest};

pub trait EngineHooks: Send + Sync {
    fn on_connect_success(&self, _provider: &str, _transport: TransportKind, _elapsed: Duration) {}

    fn on_connect_failure(
        &self,
        _provider: &str,
        _transport: TransportKind,
        _error: &str,
        _elapsed: Duration,
    ) {
    }

    fn on_catalog_listing(&self, _provider: &str, _outcome: &Result<usize, ProviderError>) {}

    fn on_catalog_built(&self, _providers: usize, _operations: usize) {}

    fn on_request_start(&self, _request: &RouteRequest) {}

    fn on_operation_selected(
        &self,
        _request_id: &RequestId,
        _operation: &OperationDescriptor,
        _score: u32,
    ) {
    }

    /// Routing found no operation to call. `provider` is set for manual routing,
    /// which answers with the no-suitable-tools result instead of failing.
    fn on_no_suitable_operation(&self, _request_id: &RequestId, _provider: Option<&str>) {}

    fn on_invocation_success(
        &self,
        _request_id: &RequestId,
        _provider: &str,
        _operation: &str,
        _elapsed: Duration,
    ) {
    }

    fn on_invocation_failure(&self, _request_id: &RequestId, _error: &EngineError, _elapsed: Duration) {
    }

    fn on_close_failure(&self, _provider: &str, _error: &ProviderError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEngineHooks;

impl EngineHooks for NoopEngineHooks {}
