//! Metrics-based engine hooks.
//!
//! ```rust
//! use swengine::EngineHooks;
//! use swobserve::MetricsEngineHooks;
//!
//! fn accepts_engine_hooks(_hooks: &dyn EngineHooks) {}
//!
//! let hooks = MetricsEngineHooks;
//! accepts_engine_hooks(&hooks);
//! ```

use std::time::Duration;

use swcommon::RequestId;
use swengine::{EngineError, EngineHooks, RouteRequest};
use swprovider::{OperationDescriptor, ProviderError, TransportKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngineHooks;

impl EngineHooks for MetricsEngineHooks {
    fn on_connect_success(&self, provider: &str, transport: TransportKind, elapsed: Duration) {
        metrics::counter!(
            "switchboard_connection_success_total",
            "provider" => provider.to_string(),
            "transport" => transport.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_connection_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_connect_failure(
        &self,
        provider: &str,
        transport: TransportKind,
        _error: &str,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "switchboard_connection_failure_total",
            "provider" => provider.to_string(),
            "transport" => transport.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_connection_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_catalog_listing(&self, provider: &str, outcome: &Result<usize, ProviderError>) {
        match outcome {
            Ok(operations) => {
                metrics::gauge!(
                    "switchboard_catalog_operations",
                    "provider" => provider.to_string()
                )
                .set(*operations as f64);
            }
            Err(error) => {
                metrics::counter!(
                    "switchboard_catalog_listing_failure_total",
                    "provider" => provider.to_string(),
                    "error_kind" => format!("{:?}", error.kind)
                )
                .increment(1);
            }
        }
    }

    fn on_catalog_built(&self, _providers: usize, _operations: usize) {
        metrics::counter!("switchboard_catalog_builds_total").increment(1);
    }

    fn on_request_start(&self, request: &RouteRequest) {
        let mode = if request.mode.provider().is_some() {
            "manual"
        } else {
            "auto"
        };
        metrics::counter!("switchboard_request_start_total", "mode" => mode).increment(1);
    }

    fn on_operation_selected(
        &self,
        _request_id: &RequestId,
        operation: &OperationDescriptor,
        score: u32,
    ) {
        metrics::histogram!(
            "switchboard_selection_score",
            "provider" => operation.provider.clone()
        )
        .record(score as f64);
    }

    fn on_no_suitable_operation(&self, _request_id: &RequestId, provider: Option<&str>) {
        let mode = if provider.is_some() { "manual" } else { "auto" };
        metrics::counter!(
            "switchboard_no_suitable_operation_total",
            "mode" => mode,
            "provider" => provider.unwrap_or_default().to_string()
        )
        .increment(1);
    }

    fn on_invocation_success(
        &self,
        _request_id: &RequestId,
        provider: &str,
        operation: &str,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "switchboard_invocation_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_invocation_duration_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_invocation_failure(&self, _request_id: &RequestId, error: &EngineError, elapsed: Duration) {
        let provider = error.provider.clone().unwrap_or_default();
        let operation = error.operation.clone().unwrap_or_default();

        metrics::counter!(
            "switchboard_invocation_failure_total",
            "provider" => provider.clone(),
            "operation" => operation.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_invocation_duration_seconds",
            "provider" => provider,
            "operation" => operation
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_close_failure(&self, provider: &str, error: &ProviderError) {
        metrics::counter!(
            "switchboard_close_failure_total",
            "provider" => provider.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}
