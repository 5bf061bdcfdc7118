//! The owned engine context: connections, catalog, and the request pipeline.
//!
//! An [`Engine`] is produced by [`EngineBuilder::initialize`], which connects
//! every configured provider concurrently, waits for all attempts to settle, and
//! lists operations once. Requests then run analyze, select, synthesize, invoke,
//! and normalize against that snapshot. The catalog only changes through
//! [`Engine::recache`].

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use serde_json::{Map, Value};
use swcommon::{RequestId, with_deadline};
use swprovider::{DefaultConnector, ProviderConfig, ProviderConnection, ProviderConnector};
use swrouting::{AnalyzedQuery, OperationCatalog, select_best, synthesize};

use crate::{
    EngineError, EngineHooks, InvocationResult, NoopEngineHooks, OperationSummary,
    ProviderOperations, ProviderStatus, RouteRequest, RoutingMode, normalize,
};

pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Clone)]
pub struct EngineBuilder {
    connector: Arc<dyn ProviderConnector>,
    hooks: Arc<dyn EngineHooks>,
    invocation_timeout: Duration,
    connect_timeout: Duration,
    max_message_chars: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            connector: Arc::new(DefaultConnector::new()),
            hooks: Arc::new(NoopEngineHooks),
            invocation_timeout: DEFAULT_INVOCATION_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connector(mut self, connector: Arc<dyn ProviderConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn EngineHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    /// Connects every provider and builds the catalog. Never fails: providers
    /// that cannot be reached are kept as dead connections.
    ///
    /// Provider names are expected to be unique; lookups resolve to the first
    /// connection with a given name.
    pub async fn initialize(self, providers: Vec<ProviderConfig>) -> Engine {
        let attempts = providers.into_iter().map(|config| {
            let connector = Arc::clone(&self.connector);
            let hooks = Arc::clone(&self.hooks);
            let deadline = self.connect_timeout;

            async move {
                let started = Instant::now();
                let connection =
                    ProviderConnection::establish(config, connector.as_ref(), deadline).await;
                let elapsed = started.elapsed();

                match connection.last_error() {
                    None => hooks.on_connect_success(
                        connection.name(),
                        connection.transport_kind(),
                        elapsed,
                    ),
                    Some(error) => hooks.on_connect_failure(
                        connection.name(),
                        connection.transport_kind(),
                        error,
                        elapsed,
                    ),
                }

                connection
            }
        });

        let connections = join_all(attempts).await;

        let engine = Engine {
            connections,
            catalog: RwLock::new(Arc::new(OperationCatalog::new())),
            hooks: self.hooks,
            invocation_timeout: self.invocation_timeout,
            max_message_chars: self.max_message_chars,
        };
        engine.recache().await;
        engine
    }
}

pub struct Engine {
    connections: Vec<ProviderConnection>,
    catalog: RwLock<Arc<OperationCatalog>>,
    hooks: Arc<dyn EngineHooks>,
    invocation_timeout: Duration,
    max_message_chars: usize,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Re-lists operations of every connected provider and swaps the catalog.
    ///
    /// Dead connections stay dead; only live providers contribute operations.
    /// Returns the number of cached operations.
    pub async fn recache(&self) -> usize {
        let build = OperationCatalog::build_from(&self.connections).await;

        for listing in &build.listings {
            self.hooks
                .on_catalog_listing(&listing.provider, &listing.outcome);
        }

        let operations = build.catalog.operation_count();
        self.hooks
            .on_catalog_built(self.connections.len(), operations);

        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(build.catalog);
        operations
    }

    pub fn catalog(&self) -> Arc<OperationCatalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub async fn handle(&self, request: RouteRequest) -> Result<InvocationResult, EngineError> {
        self.validate(&request)?;
        self.hooks.on_request_start(&request);

        let catalog = self.catalog();
        let query = AnalyzedQuery::analyze(request.message.as_str());

        let candidates = match &request.mode {
            RoutingMode::Auto => catalog.candidates(),
            RoutingMode::Manual(provider) => {
                if self.connection(provider).is_none() {
                    return Err(EngineError::provider_unavailable(format!(
                        "provider '{provider}' is not configured"
                    ))
                    .with_provider(provider.as_str()));
                }
                catalog.candidates_for(provider)
            }
        };

        let Some(best) = select_best(&query, candidates) else {
            self.hooks
                .on_no_suitable_operation(&request.request_id, request.mode.provider());
            return match &request.mode {
                RoutingMode::Manual(provider) => Ok(InvocationResult::no_suitable_tools(provider)),
                RoutingMode::Auto => Err(EngineError::no_suitable_operation(
                    "no suitable operation across all providers",
                )),
            };
        };

        let operation = best.operation;
        self.hooks
            .on_operation_selected(&request.request_id, operation, best.score);

        let arguments = synthesize(&query, operation);
        let text = self
            .invoke_as(
                &request.request_id,
                &operation.provider,
                &operation.name,
                arguments,
            )
            .await?;

        Ok(InvocationResult::new(
            text,
            operation.provider.as_str(),
            operation.name.as_str(),
        ))
    }

    pub async fn auto_route(&self, message: &str) -> Result<InvocationResult, EngineError> {
        self.handle(RouteRequest::auto(message)).await
    }

    pub async fn send_message(
        &self,
        provider: &str,
        message: &str,
    ) -> Result<InvocationResult, EngineError> {
        self.handle(RouteRequest::manual(provider, message)).await
    }

    /// Calls one operation directly, bypassing selection.
    pub async fn invoke(
        &self,
        provider: &str,
        operation: &str,
        arguments: Map<String, Value>,
    ) -> Result<String, EngineError> {
        self.invoke_as(&RequestId::generate(), provider, operation, arguments)
            .await
    }

    async fn invoke_as(
        &self,
        request_id: &RequestId,
        provider: &str,
        operation: &str,
        arguments: Map<String, Value>,
    ) -> Result<String, EngineError> {
        let started = Instant::now();
        let outcome = self.call(provider, operation, arguments).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(text) => {
                self.hooks
                    .on_invocation_success(request_id, provider, operation, elapsed);
                Ok(text)
            }
            Err(error) => {
                let error = error.with_provider(provider).with_operation(operation);
                self.hooks
                    .on_invocation_failure(request_id, &error, elapsed);
                Err(error)
            }
        }
    }

    async fn call(
        &self,
        provider: &str,
        operation: &str,
        arguments: Map<String, Value>,
    ) -> Result<String, EngineError> {
        let connection = self
            .connection(provider)
            .filter(|connection| connection.is_connected())
            .ok_or_else(|| {
                EngineError::provider_unavailable(format!("provider '{provider}' is not connected"))
            })?;

        let parts = with_deadline(
            connection.invoke(operation, arguments),
            self.invocation_timeout,
        )
        .await
        .ok_or_else(|| {
            EngineError::timeout(format!(
                "invocation exceeded {}ms",
                self.invocation_timeout.as_millis()
            ))
        })??;

        Ok(normalize(&parts))
    }

    pub fn status(&self) -> Vec<ProviderStatus> {
        let catalog = self.catalog();
        self.connections
            .iter()
            .map(|connection| ProviderStatus {
                name: connection.name().to_string(),
                connected: connection.is_connected(),
                transport: connection.transport_kind(),
                operation_count: catalog.operations_for(connection.name()).len(),
                read_only: connection.read_only(),
                error: connection.last_error().map(str::to_string),
            })
            .collect()
    }

    pub fn list_operations(&self) -> Vec<ProviderOperations> {
        let catalog = self.catalog();
        catalog
            .entries()
            .map(|entry| ProviderOperations {
                provider: entry.provider.clone(),
                operations: entry.operations.iter().map(OperationSummary::from).collect(),
            })
            .collect()
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.connections.iter().map(ProviderConnection::name)
    }

    pub fn max_message_chars(&self) -> usize {
        self.max_message_chars
    }

    pub fn invocation_timeout(&self) -> Duration {
        self.invocation_timeout
    }

    /// Closes every connected provider in turn. Close failures are reported to
    /// hooks and otherwise ignored.
    pub async fn shutdown(&self) {
        for connection in &self.connections {
            if !connection.is_connected() {
                continue;
            }

            if let Err(error) = connection.close().await {
                self.hooks.on_close_failure(connection.name(), &error);
            }
        }
    }

    fn connection(&self, provider: &str) -> Option<&ProviderConnection> {
        self.connections
            .iter()
            .find(|connection| connection.name() == provider)
    }

    fn validate(&self, request: &RouteRequest) -> Result<(), EngineError> {
        if request.message.trim().is_empty() {
            return Err(EngineError::invalid_request("message must not be empty"));
        }

        let length = request.message.chars().count();
        if length > self.max_message_chars {
            return Err(EngineError::invalid_request(format!(
                "message is {length} characters; the limit is {}",
                self.max_message_chars
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("connections", &self.connections)
            .field("invocation_timeout", &self.invocation_timeout)
            .field("max_message_chars", &self.max_message_chars)
            .finish_non_exhaustive()
    }
}
