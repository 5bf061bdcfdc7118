//! Child-process transport: newline-delimited JSON-RPC over stdin/stdout.
//!
//! Requests are multiplexed by id, so one session serves concurrent calls. A
//! background task reads responses and completes the matching pending call; when
//! the child's output ends every pending call fails with a transport error.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::rpc::{RpcRequest, RpcResponse};
use super::{McpTransport, RpcChannel};
use crate::{ProviderConfig, ProviderError, ProviderFuture, TransportDescriptor, TransportKind};

type PendingCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, ProviderError>>>>>;
type SessionWriter = Box<dyn AsyncWrite + Send + Unpin>;

pub struct JsonRpcSession {
    writer: tokio::sync::Mutex<SessionWriter>,
    pending: PendingCalls,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl JsonRpcSession {
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let pending = PendingCalls::default();
        let reader = tokio::spawn(read_responses(BufReader::new(reader), Arc::clone(&pending)));

        Self {
            writer: tokio::sync::Mutex::new(Box::new(writer)),
            pending,
            next_id: AtomicU64::new(1),
            reader,
        }
    }

    pub async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        lock_pending(&self.pending).insert(id, sender);
        let _entry = PendingEntry {
            pending: &self.pending,
            id,
        };

        self.write_line(&RpcRequest::call(id, method, params)).await?;

        receiver.await.map_err(|_| {
            ProviderError::transport(format!("session closed before '{method}' completed"))
        })?
    }

    pub async fn notify(&self, method: &str, params: Value) -> Result<(), ProviderError> {
        self.write_line(&RpcRequest::notification(method, params)).await
    }

    pub fn close(&self) {
        self.reader.abort();
        fail_pending(&self.pending, "session closed");
    }

    async fn write_line(&self, message: &RpcRequest<'_>) -> Result<(), ProviderError> {
        let mut line = serde_json::to_vec(message)
            .map_err(|err| ProviderError::protocol(format!("failed to encode request: {err}")))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .await
            .map_err(|err| ProviderError::transport(format!("failed to write request: {err}")))?;
        writer
            .flush()
            .await
            .map_err(|err| ProviderError::transport(format!("failed to flush request: {err}")))
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        lock_pending(&self.pending).len()
    }
}

/// Removes the call's pending slot on every exit path, including a caller
/// dropping the request future before the response arrives.
struct PendingEntry<'a> {
    pending: &'a PendingCalls,
    id: u64,
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        lock_pending(self.pending).remove(&self.id);
    }
}

impl Drop for JsonRpcSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_responses<R>(mut reader: R, pending: PendingCalls)
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(error = %err, "provider output stream failed");
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response: RpcResponse = match serde_json::from_str(trimmed) {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring non JSON-RPC output line");
                continue;
            }
        };

        // Server-initiated requests and notifications carry no id we issued.
        let Some(id) = response.numeric_id() else {
            continue;
        };

        if let Some(sender) = lock_pending(&pending).remove(&id) {
            let _ = sender.send(response.into_result());
        }
    }

    fail_pending(&pending, "provider closed its output stream");
}

fn fail_pending(pending: &PendingCalls, reason: &str) {
    for (_, sender) in lock_pending(pending).drain() {
        let _ = sender.send(Err(ProviderError::transport(reason)));
    }
}

fn lock_pending(
    pending: &PendingCalls,
) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<Result<Value, ProviderError>>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct StdioChannel {
    session: JsonRpcSession,
    child: tokio::sync::Mutex<Child>,
}

impl StdioChannel {
    pub fn spawn(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let TransportDescriptor::Stdio { command, args } = &config.transport else {
            return Err(ProviderError::configuration(format!(
                "provider '{}' is not configured for stdio",
                config.name
            )));
        };

        let mut child = Command::new(command)
            .args(args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ProviderError::spawn(format!("failed to spawn '{command}': {err}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ProviderError::spawn("child stdin was not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProviderError::spawn("child stdout was not captured"))?;

        if let Some(stderr) = child.stderr.take() {
            let provider = config.name.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(provider = %provider, line = %line, "provider stderr");
                }
            });
        }

        Ok(Self {
            session: JsonRpcSession::new(stdout, stdin),
            child: tokio::sync::Mutex::new(child),
        })
    }
}

impl RpcChannel for StdioChannel {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Value,
    ) -> ProviderFuture<'a, Result<Value, ProviderError>> {
        Box::pin(self.session.request(method, params))
    }

    fn notify<'a>(
        &'a self,
        method: &'a str,
        params: Value,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(self.session.notify(method, params))
    }

    fn shutdown<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.session.close();
            let mut child = self.child.lock().await;
            if child
                .try_wait()
                .map_err(|err| ProviderError::transport(err.to_string()))?
                .is_some()
            {
                return Ok(());
            }

            child
                .kill()
                .await
                .map_err(|err| ProviderError::transport(format!("failed to stop provider: {err}")))
        })
    }
}

pub async fn connect(config: &ProviderConfig) -> Result<McpTransport<StdioChannel>, ProviderError> {
    let channel = StdioChannel::spawn(config)?;
    McpTransport::handshake(config.name.clone(), TransportKind::Stdio, channel).await
}
