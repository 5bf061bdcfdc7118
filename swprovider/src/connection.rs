//! Provider connections: one attempted session per configured provider.
//!
//! A connection attempt never fails past [`ProviderConnection::establish`]; a
//! provider that cannot be reached is recorded as a dead connection carrying
//! its error so the remaining providers stay usable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::{Map, Value};
use swcommon::{Topic, with_deadline};

use crate::{
    ContentPart, OperationDescriptor, ProviderConfig, ProviderError, ProviderFuture,
    ProviderTransport, TransportDescriptor, TransportKind,
};

pub trait ProviderConnector: Send + Sync {
    fn connect<'a>(
        &'a self,
        config: &'a ProviderConfig,
    ) -> ProviderFuture<'a, Result<Arc<dyn ProviderTransport>, ProviderError>>;
}

/// Connects stdio and HTTP providers with the transports compiled into this build.
#[derive(Debug, Clone, Default)]
pub struct DefaultConnector {
    #[cfg(feature = "transport-http")]
    http: reqwest::Client,
}

impl DefaultConnector {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "transport-http")]
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ProviderConnector for DefaultConnector {
    fn connect<'a>(
        &'a self,
        config: &'a ProviderConfig,
    ) -> ProviderFuture<'a, Result<Arc<dyn ProviderTransport>, ProviderError>> {
        Box::pin(async move {
            match &config.transport {
                TransportDescriptor::Stdio { .. } => connect_stdio(config).await,
                TransportDescriptor::Http { .. } => self.connect_http(config).await,
            }
        })
    }
}

#[cfg(feature = "transport-stdio")]
async fn connect_stdio(config: &ProviderConfig) -> Result<Arc<dyn ProviderTransport>, ProviderError> {
    let transport = crate::transport::stdio::connect(config).await?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "transport-stdio"))]
async fn connect_stdio(_config: &ProviderConfig) -> Result<Arc<dyn ProviderTransport>, ProviderError> {
    Err(ProviderError::configuration(
        "transport-stdio feature is not enabled on swprovider",
    ))
}

impl DefaultConnector {
    #[cfg(feature = "transport-http")]
    async fn connect_http(
        &self,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn ProviderTransport>, ProviderError> {
        let transport = crate::transport::http::connect(self.http.clone(), config).await?;
        Ok(Arc::new(transport))
    }

    #[cfg(not(feature = "transport-http"))]
    async fn connect_http(
        &self,
        _config: &ProviderConfig,
    ) -> Result<Arc<dyn ProviderTransport>, ProviderError> {
        Err(ProviderError::configuration(
            "transport-http feature is not enabled on swprovider",
        ))
    }
}

pub struct ProviderConnection {
    config: ProviderConfig,
    transport: Option<Arc<dyn ProviderTransport>>,
    last_error: Option<String>,
    closed: AtomicBool,
}

impl ProviderConnection {
    pub fn connected(config: ProviderConfig, transport: Arc<dyn ProviderTransport>) -> Self {
        Self {
            config,
            transport: Some(transport),
            last_error: None,
            closed: AtomicBool::new(false),
        }
    }

    pub fn failed(config: ProviderConfig, error: &ProviderError) -> Self {
        Self {
            config,
            transport: None,
            last_error: Some(error.to_string()),
            closed: AtomicBool::new(false),
        }
    }

    /// Attempts the connection once, bounded by `deadline`.
    pub async fn establish(
        config: ProviderConfig,
        connector: &dyn ProviderConnector,
        deadline: Duration,
    ) -> Self {
        let attempt = with_deadline(connector.connect(&config), deadline).await;
        let outcome = attempt.unwrap_or_else(|| {
            Err(ProviderError::timeout(format!(
                "connection attempt exceeded {}ms",
                deadline.as_millis()
            )))
        });

        match outcome {
            Ok(transport) => Self::connected(config, transport),
            Err(error) => Self::failed(config, &error),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.config.transport.kind()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.config.topics
    }

    pub fn read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some() && !self.closed.load(Ordering::Acquire)
    }

    pub async fn list_operations(&self) -> Result<Vec<OperationDescriptor>, ProviderError> {
        let mut operations = self.live()?.list_operations().await?;
        for operation in &mut operations {
            operation.provider = self.config.name.clone();
        }
        Ok(operations)
    }

    pub async fn invoke(
        &self,
        operation: &str,
        arguments: Map<String, Value>,
    ) -> Result<Vec<ContentPart>, ProviderError> {
        self.live()?.call_operation(operation, arguments).await
    }

    /// Releases the transport; later calls see the provider as unavailable.
    pub async fn close(&self) -> Result<(), ProviderError> {
        let Some(transport) = &self.transport else {
            return Ok(());
        };

        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        transport.close().await
    }

    fn live(&self) -> Result<&Arc<dyn ProviderTransport>, ProviderError> {
        match &self.transport {
            Some(transport) if !self.closed.load(Ordering::Acquire) => Ok(transport),
            Some(_) => Err(ProviderError::unavailable(format!(
                "provider '{}' has been closed",
                self.config.name
            ))),
            None => Err(ProviderError::unavailable(format!(
                "provider '{}' is not connected: {}",
                self.config.name,
                self.last_error.as_deref().unwrap_or("unknown error")
            ))),
        }
    }
}

impl std::fmt::Debug for ProviderConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConnection")
            .field("name", &self.config.name)
            .field("transport", &self.transport_kind())
            .field("connected", &self.is_connected())
            .field("last_error", &self.last_error)
            .finish()
    }
}
