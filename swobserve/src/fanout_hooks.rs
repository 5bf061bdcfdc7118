//! Dispatches every engine event to several hook sets in registration order.

use std::sync::Arc;
use std::time::Duration;

use swcommon::RequestId;
use swengine::{EngineError, EngineHooks, RouteRequest};
use swprovider::{OperationDescriptor, ProviderError, TransportKind};

#[derive(Clone, Default)]
pub struct FanoutEngineHooks {
    targets: Vec<Arc<dyn EngineHooks>>,
}

impl FanoutEngineHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn EngineHooks>) -> Self {
        self.targets.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl EngineHooks for FanoutEngineHooks {
    fn on_connect_success(&self, provider: &str, transport: TransportKind, elapsed: Duration) {
        for target in &self.targets {
            target.on_connect_success(provider, transport, elapsed);
        }
    }

    fn on_connect_failure(
        &self,
        provider: &str,
        transport: TransportKind,
        error: &str,
        elapsed: Duration,
    ) {
        for target in &self.targets {
            target.on_connect_failure(provider, transport, error, elapsed);
        }
    }

    fn on_catalog_listing(&self, provider: &str, outcome: &Result<usize, ProviderError>) {
        for target in &self.targets {
            target.on_catalog_listing(provider, outcome);
        }
    }

    fn on_catalog_built(&self, providers: usize, operations: usize) {
        for target in &self.targets {
            target.on_catalog_built(providers, operations);
        }
    }

    fn on_request_start(&self, request: &RouteRequest) {
        for target in &self.targets {
            target.on_request_start(request);
        }
    }

    fn on_operation_selected(
        &self,
        request_id: &RequestId,
        operation: &OperationDescriptor,
        score: u32,
    ) {
        for target in &self.targets {
            target.on_operation_selected(request_id, operation, score);
        }
    }

    fn on_no_suitable_operation(&self, request_id: &RequestId, provider: Option<&str>) {
        for target in &self.targets {
            target.on_no_suitable_operation(request_id, provider);
        }
    }

    fn on_invocation_success(
        &self,
        request_id: &RequestId,
        provider: &str,
        operation: &str,
        elapsed: Duration,
    ) {
        for target in &self.targets {
            target.on_invocation_success(request_id, provider, operation, elapsed);
        }
    }

    fn on_invocation_failure(&self, request_id: &RequestId, error: &EngineError, elapsed: Duration) {
        for target in &self.targets {
            target.on_invocation_failure(request_id, error, elapsed);
        }
    }

    fn on_close_failure(&self, provider: &str, error: &ProviderError) {
        for target in &self.targets {
            target.on_close_failure(provider, error);
        }
    }
}
