//! Tracing-based engine hooks.
//!
//! ```rust
//! use swengine::EngineHooks;
//! use swobserve::TracingEngineHooks;
//!
//! fn accepts_engine_hooks(_hooks: &dyn EngineHooks) {}
//!
//! let hooks = TracingEngineHooks;
//! accepts_engine_hooks(&hooks);
//! ```

use std::time::Duration;

use swcommon::RequestId;
use swengine::{EngineError, EngineHooks, RouteRequest};
use swprovider::{OperationDescriptor, ProviderError, TransportKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEngineHooks;

impl EngineHooks for TracingEngineHooks {
    fn on_connect_success(&self, provider: &str, transport: TransportKind, elapsed: Duration) {
        tracing::info!(
            phase = "connection",
            event = "connected",
            provider,
            transport = %transport,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_connect_failure(
        &self,
        provider: &str,
        transport: TransportKind,
        error: &str,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "connection",
            event = "connect_failed",
            provider,
            transport = %transport,
            elapsed_ms = elapsed.as_millis() as u64,
            error
        );
    }

    fn on_catalog_listing(&self, provider: &str, outcome: &Result<usize, ProviderError>) {
        match outcome {
            Ok(operations) => tracing::info!(
                phase = "catalog",
                event = "listed",
                provider,
                operations = *operations as u64
            ),
            Err(error) => tracing::warn!(
                phase = "catalog",
                event = "listing_failed",
                provider,
                error_kind = ?error.kind,
                error = %error
            ),
        }
    }

    fn on_catalog_built(&self, providers: usize, operations: usize) {
        tracing::info!(
            phase = "catalog",
            event = "built",
            providers = providers as u64,
            operations = operations as u64
        );
    }

    fn on_request_start(&self, request: &RouteRequest) {
        tracing::info!(
            phase = "request",
            event = "start",
            request_id = %request.request_id,
            mode = request.mode.provider().map_or("auto", |_| "manual"),
            provider = request.mode.provider(),
            message_chars = request.message.chars().count() as u64
        );
    }

    fn on_operation_selected(
        &self,
        request_id: &RequestId,
        operation: &OperationDescriptor,
        score: u32,
    ) {
        tracing::debug!(
            phase = "request",
            event = "operation_selected",
            request_id = %request_id,
            provider = operation.provider.as_str(),
            operation = operation.name.as_str(),
            score
        );
    }

    fn on_no_suitable_operation(&self, request_id: &RequestId, provider: Option<&str>) {
        tracing::warn!(
            phase = "request",
            event = "no_suitable_operation",
            request_id = %request_id,
            provider = provider.unwrap_or("*")
        );
    }

    fn on_invocation_success(
        &self,
        request_id: &RequestId,
        provider: &str,
        operation: &str,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "request",
            event = "invocation_success",
            request_id = %request_id,
            provider,
            operation,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_invocation_failure(&self, request_id: &RequestId, error: &EngineError, elapsed: Duration) {
        tracing::error!(
            phase = "request",
            event = "invocation_failure",
            request_id = %request_id,
            provider = error.provider.as_deref(),
            operation = error.operation.as_deref(),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_close_failure(&self, provider: &str, error: &ProviderError) {
        tracing::warn!(
            phase = "connection",
            event = "close_failed",
            provider,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
