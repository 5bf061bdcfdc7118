use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use swcommon::RequestId;
use swengine::{EngineError, EngineHooks, RouteRequest};
use swprovider::{OperationDescriptor, ProviderError, TransportKind};

/// Contains panics raised by the wrapped hooks.
pub struct SafeEngineHooks<H> {
    inner: H,
}

impl<H> SafeEngineHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> EngineHooks for SafeEngineHooks<H>
where
    H: EngineHooks,
{
    fn on_connect_success(&self, provider: &str, transport: TransportKind, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_connect_success(provider, transport, elapsed)
        }));
    }

    fn on_connect_failure(
        &self,
        provider: &str,
        transport: TransportKind,
        error: &str,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_connect_failure(provider, transport, error, elapsed)
        }));
    }

    fn on_catalog_listing(&self, provider: &str, outcome: &Result<usize, ProviderError>) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_catalog_listing(provider, outcome)
        }));
    }

    fn on_catalog_built(&self, providers: usize, operations: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_catalog_built(providers, operations)
        }));
    }

    fn on_request_start(&self, request: &RouteRequest) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_request_start(request)));
    }

    fn on_operation_selected(
        &self,
        request_id: &RequestId,
        operation: &OperationDescriptor,
        score: u32,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_operation_selected(request_id, operation, score)
        }));
    }

    fn on_no_suitable_operation(&self, request_id: &RequestId, provider: Option<&str>) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_no_suitable_operation(request_id, provider)
        }));
    }

    fn on_invocation_success(
        &self,
        request_id: &RequestId,
        provider: &str,
        operation: &str,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_invocation_success(request_id, provider, operation, elapsed)
        }));
    }

    fn on_invocation_failure(&self, request_id: &RequestId, error: &EngineError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_invocation_failure(request_id, error, elapsed)
        }));
    }

    fn on_close_failure(&self, provider: &str, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_close_failure(provider, error)
        }));
    }
}
