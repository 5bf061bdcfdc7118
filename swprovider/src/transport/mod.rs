//! Transport trait and the MCP client shared by every channel kind.
//!
//! A [`ProviderTransport`] is one live session to one provider. The stock
//! implementation is [`McpTransport`], which speaks MCP over any [`RpcChannel`]
//! (a child process's stdio or an HTTP endpoint).

use serde_json::{Map, Value, json};

use crate::{ContentPart, OperationDescriptor, ProviderError, ProviderFuture, TransportKind};

#[cfg(feature = "transport-http")]
pub mod http;
pub mod mcp;
pub mod rpc;
#[cfg(feature = "transport-stdio")]
pub mod stdio;

pub trait ProviderTransport: Send + Sync {
    fn kind(&self) -> TransportKind;

    fn list_operations<'a>(
        &'a self,
    ) -> ProviderFuture<'a, Result<Vec<OperationDescriptor>, ProviderError>>;

    fn call_operation<'a>(
        &'a self,
        operation: &'a str,
        arguments: Map<String, Value>,
    ) -> ProviderFuture<'a, Result<Vec<ContentPart>, ProviderError>>;

    fn close<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>>;
}

/// Request/response plumbing below the MCP layer.
pub trait RpcChannel: Send + Sync {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Value,
    ) -> ProviderFuture<'a, Result<Value, ProviderError>>;

    fn notify<'a>(
        &'a self,
        method: &'a str,
        params: Value,
    ) -> ProviderFuture<'a, Result<(), ProviderError>>;

    fn shutdown<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>>;
}

pub struct McpTransport<C> {
    provider: String,
    kind: TransportKind,
    channel: C,
}

impl<C> McpTransport<C>
where
    C: RpcChannel,
{
    /// Performs the `initialize` handshake before handing the session out.
    pub async fn handshake(
        provider: impl Into<String>,
        kind: TransportKind,
        channel: C,
    ) -> Result<Self, ProviderError> {
        let provider = provider.into();
        let info = channel
            .request(mcp::METHOD_INITIALIZE, mcp::initialize_params())
            .await?;

        if !info.is_object() {
            return Err(ProviderError::protocol(format!(
                "provider '{provider}' returned a malformed initialize result"
            )));
        }

        channel.notify(mcp::METHOD_INITIALIZED, json!({})).await?;

        Ok(Self {
            provider,
            kind,
            channel,
        })
    }
}

impl<C> ProviderTransport for McpTransport<C>
where
    C: RpcChannel,
{
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn list_operations<'a>(
        &'a self,
    ) -> ProviderFuture<'a, Result<Vec<OperationDescriptor>, ProviderError>> {
        Box::pin(async move {
            let result = self
                .channel
                .request(mcp::METHOD_LIST_TOOLS, json!({}))
                .await?;
            mcp::decode_tool_list(&self.provider, &result)
        })
    }

    fn call_operation<'a>(
        &'a self,
        operation: &'a str,
        arguments: Map<String, Value>,
    ) -> ProviderFuture<'a, Result<Vec<ContentPart>, ProviderError>> {
        Box::pin(async move {
            let result = self
                .channel
                .request(mcp::METHOD_CALL_TOOL, mcp::call_params(operation, arguments))
                .await?;
            mcp::decode_call_result(&result)
        })
    }

    fn close<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        self.channel.shutdown()
    }
}
