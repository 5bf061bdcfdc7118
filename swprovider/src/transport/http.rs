//! HTTP transport: JSON-RPC over POST with optional SSE-framed responses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use swcommon::EnvMap;

use super::rpc::{RpcRequest, RpcResponse};
use super::{McpTransport, RpcChannel};
use crate::{ProviderConfig, ProviderError, ProviderFuture, TransportDescriptor, TransportKind};

const SESSION_HEADER: &str = "mcp-session-id";

#[derive(Debug)]
pub struct HttpChannel {
    client: Client,
    url: String,
    headers: EnvMap,
    session_id: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl HttpChannel {
    pub fn new(client: Client, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let TransportDescriptor::Http { url } = &config.transport else {
            return Err(ProviderError::configuration(format!(
                "provider '{}' is not configured for http",
                config.name
            )));
        };

        Ok(Self {
            client,
            url: url.clone(),
            headers: config.env.clone(),
            session_id: Mutex::new(None),
            next_id: AtomicU64::new(1),
        })
    }

    fn post(&self) -> RequestBuilder {
        let mut builder = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json, text/event-stream");

        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(session_id) = self.current_session() {
            builder = builder.header(SESSION_HEADER, session_id);
        }

        builder
    }

    fn current_session(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn remember_session(&self, response: &Response) {
        if let Some(value) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            *self.session_id.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(value.to_string());
        }
    }

    async fn send(&self, body: &RpcRequest<'_>) -> Result<Response, ProviderError> {
        let response = self.post().json(body).send().await.map_err(map_reqwest_error)?;
        self.remember_session(&response);

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(status_error(status, detail));
        }

        Ok(response)
    }
}

impl RpcChannel for HttpChannel {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Value,
    ) -> ProviderFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let response = self.send(&RpcRequest::call(id, method, params)).await?;
            let is_event_stream = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with("text/event-stream"));
            let body = response.text().await.map_err(map_reqwest_error)?;

            decode_body(&body, is_event_stream, id)?.into_result()
        })
    }

    fn notify<'a>(
        &'a self,
        method: &'a str,
        params: Value,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.send(&RpcRequest::notification(method, params)).await?;
            Ok(())
        })
    }

    fn shutdown<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            let Some(session_id) = self.current_session() else {
                return Ok(());
            };

            let response = self
                .client
                .delete(&self.url)
                .header(SESSION_HEADER, session_id)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            // Servers without explicit session teardown answer 405.
            match response.status() {
                status if status.is_success() => Ok(()),
                StatusCode::METHOD_NOT_ALLOWED => Ok(()),
                status => Err(status_error(status, String::new())),
            }
        })
    }
}

fn decode_body(body: &str, is_event_stream: bool, id: u64) -> Result<RpcResponse, ProviderError> {
    if !is_event_stream {
        return serde_json::from_str(body)
            .map_err(|err| ProviderError::protocol(format!("invalid JSON-RPC response: {err}")));
    }

    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<RpcResponse>(data.trim()).ok())
        .find(|response| response.numeric_id() == Some(id))
        .ok_or_else(|| {
            ProviderError::protocol(format!("event stream carried no response for request {id}"))
        })
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

fn status_error(status: StatusCode, detail: String) -> ProviderError {
    let message = if detail.trim().is_empty() {
        format!("provider responded with status {status}")
    } else {
        format!("provider responded with status {status}: {}", detail.trim())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::timeout(message),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            ProviderError::unavailable(message)
        }
        _ => ProviderError::transport(message),
    }
}

pub async fn connect(
    client: Client,
    config: &ProviderConfig,
) -> Result<McpTransport<HttpChannel>, ProviderError> {
    let channel = HttpChannel::new(client, config)?;
    McpTransport::handshake(config.name.clone(), TransportKind::Http, channel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn plain_json_bodies_decode_directly() {
        let response = decode_body(r#"{"jsonrpc":"2.0","id":3,"result":{"tools":[]}}"#, false, 3)
            .expect("should decode");
        assert_eq!(response.numeric_id(), Some(3));
    }

    #[test]
    fn event_stream_bodies_pick_the_matching_response() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\"}\n\nevent: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":7,\"result\":{\"ok\":true}}\n\n";
        let response = decode_body(body, true, 7).expect("should decode");
        let result = response.into_result().expect("result");
        assert_eq!(result["ok"], true);
    }

    #[test]
    fn event_stream_without_match_is_a_protocol_error() {
        let error = decode_body("data: {}\n", true, 9).expect_err("should fail");
        assert_eq!(error.kind, ProviderErrorKind::Protocol);
    }

    #[test]
    fn status_errors_are_classified() {
        assert_eq!(
            status_error(StatusCode::GATEWAY_TIMEOUT, String::new()).kind,
            ProviderErrorKind::Timeout
        );
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, "upstream".to_string()).kind,
            ProviderErrorKind::Unavailable
        );
        let other = status_error(StatusCode::UNAUTHORIZED, "bad token".to_string());
        assert_eq!(other.kind, ProviderErrorKind::Transport);
        assert!(other.message.contains("bad token"));
    }

    #[test]
    fn new_rejects_stdio_descriptors() {
        let config = ProviderConfig::stdio("calculator", "python3", ["server.py"]);
        let error = HttpChannel::new(Client::new(), &config).expect_err("should fail");
        assert_eq!(error.kind, ProviderErrorKind::Configuration);
    }
}
