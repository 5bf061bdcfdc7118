//! Runtime bootstrap helpers for wiring configuration into a live engine.

use std::sync::Arc;

use swengine::{Engine, EngineBuilder, EngineHooks};
use swobserve::{FanoutEngineHooks, MetricsEngineHooks, SafeEngineHooks, TracingEngineHooks};
use swprovider::{DefaultConnector, ProviderConnector};

use crate::SwitchboardConfig;

/// Tracing and metrics hooks behind a panic guard.
pub fn default_hooks() -> Arc<dyn EngineHooks> {
    let fanout = FanoutEngineHooks::new()
        .with(Arc::new(TracingEngineHooks))
        .with(Arc::new(MetricsEngineHooks));
    Arc::new(SafeEngineHooks::new(fanout))
}

pub fn engine_builder(config: &SwitchboardConfig) -> EngineBuilder {
    Engine::builder()
        .with_hooks(default_hooks())
        .with_invocation_timeout(config.invocation_timeout)
        .with_connect_timeout(config.connect_timeout)
        .with_max_message_chars(config.max_message_chars)
}

pub async fn start(config: SwitchboardConfig) -> Engine {
    start_with(config, Arc::new(DefaultConnector::new())).await
}

pub async fn start_with(config: SwitchboardConfig, connector: Arc<dyn ProviderConnector>) -> Engine {
    let builder = engine_builder(&config).with_connector(connector);
    let engine = builder.initialize(config.providers).await;

    let connected = engine.status().iter().filter(|status| status.connected).count();
    tracing::info!(
        phase = "runtime",
        event = "started",
        providers = engine.status().len(),
        connected,
        operations = engine.catalog().operation_count(),
        "switchboard engine ready"
    );
    engine
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{Map, Value};
    use swcommon::Topic;
    use swprovider::{
        ContentPart, InputSchema, OperationDescriptor, ParamType, ProviderConfig, ProviderError,
        ProviderFuture, ProviderTransport, TransportKind,
    };

    use super::*;

    struct Doubler;

    impl ProviderTransport for Doubler {
        fn kind(&self) -> TransportKind {
            TransportKind::Stdio
        }

        fn list_operations<'a>(
            &'a self,
        ) -> ProviderFuture<'a, Result<Vec<OperationDescriptor>, ProviderError>> {
            Box::pin(async {
                Ok(vec![OperationDescriptor::new(
                    "",
                    "multiply",
                    "Multiply two numbers",
                    InputSchema::from_properties([("a", ParamType::Number), ("b", ParamType::Number)]),
                )])
            })
        }

        fn call_operation<'a>(
            &'a self,
            _name: &'a str,
            arguments: Map<String, Value>,
        ) -> ProviderFuture<'a, Result<Vec<ContentPart>, ProviderError>> {
            Box::pin(async move {
                let product = arguments.get("a").and_then(Value::as_f64).unwrap_or(0.0)
                    * arguments.get("b").and_then(Value::as_f64).unwrap_or(0.0);
                Ok(vec![ContentPart::text(product.to_string())])
            })
        }

        fn close<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
            Box::pin(async { Ok(()) })
        }
    }

    struct DoublerConnector;

    impl ProviderConnector for DoublerConnector {
        fn connect<'a>(
            &'a self,
            config: &'a ProviderConfig,
        ) -> ProviderFuture<'a, Result<Arc<dyn ProviderTransport>, ProviderError>> {
            Box::pin(async move {
                if config.name == "calculator" {
                    Ok(Arc::new(Doubler) as Arc<dyn ProviderTransport>)
                } else {
                    Err(ProviderError::spawn(format!("failed to spawn '{}'", config.name)))
                }
            })
        }
    }

    #[tokio::test]
    async fn start_with_applies_config_limits() {
        let config = SwitchboardConfig::new(vec![
            ProviderConfig::stdio("calculator", "python3", ["calc.py"]).with_topic(Topic::Arithmetic),
            ProviderConfig::http("github", "http://localhost:1/mcp"),
        ])
        .with_invocation_timeout(Duration::from_millis(750))
        .with_max_message_chars(64);

        let engine = start_with(config, Arc::new(DoublerConnector)).await;

        assert_eq!(engine.invocation_timeout(), Duration::from_millis(750));
        assert_eq!(engine.max_message_chars(), 64);

        let status = engine.status();
        assert!(status[0].connected);
        assert!(!status[1].connected);

        let result = engine.auto_route("multiply 6 and 7").await.expect("routed");
        assert_eq!(result.text, "42");
        assert_eq!(result.operation, "multiply");

        engine.shutdown().await;
    }
}
