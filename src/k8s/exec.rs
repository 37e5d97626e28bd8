//! Remote command execution in a pod container
//!
//! Runs a non-interactive command over the pod `exec` sub-resource and
//! pumps the remote stdout/stderr into an [`OutputSink`]. One attempt per
//! call, no retry. The call blocks until the remote process exits, the
//! transport fails, or the cancellation token fires.

use std::future::Future;
use std::io;

use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use kube::{
    Client,
    api::{Api, AttachParams},
};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, Result, ToolboxError};

/// Destination for the remote process' output streams
pub trait OutputSink {
    type Stdout: AsyncWrite + Unpin;
    type Stderr: AsyncWrite + Unpin;

    fn writers(&mut self) -> (&mut Self::Stdout, &mut Self::Stderr);
}

/// Captures both streams in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferSink {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl OutputSink for BufferSink {
    type Stdout = Vec<u8>;
    type Stderr = Vec<u8>;

    fn writers(&mut self) -> (&mut Vec<u8>, &mut Vec<u8>) {
        (&mut self.stdout, &mut self.stderr)
    }
}

/// Forwards both streams to this process' stdout and stderr
pub struct ProcessSink {
    stdout: tokio::io::Stdout,
    stderr: tokio::io::Stderr,
}

impl ProcessSink {
    pub fn new() -> Self {
        Self {
            stdout: tokio::io::stdout(),
            stderr: tokio::io::stderr(),
        }
    }
}

impl Default for ProcessSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ProcessSink {
    type Stdout = tokio::io::Stdout;
    type Stderr = tokio::io::Stderr;

    fn writers(&mut self) -> (&mut tokio::io::Stdout, &mut tokio::io::Stderr) {
        (&mut self.stdout, &mut self.stderr)
    }
}

/// Pod and container a command is sent to
#[derive(Debug, Clone, Copy)]
pub struct ExecTarget<'a> {
    pub namespace: &'a str,
    pub pod: &'a str,
    pub container: &'a str,
}

/// Something that can run a command in a container and stream its output
pub trait RemoteExecutor {
    fn exec<S: OutputSink>(
        &self,
        target: &ExecTarget<'_>,
        command: &[String],
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<()>>;
}

/// Executor backed by the websocket exec sub-resource
#[derive(Clone)]
pub struct KubeExecutor {
    client: Client,
}

impl KubeExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RemoteExecutor for KubeExecutor {
    async fn exec<S: OutputSink>(
        &self,
        target: &ExecTarget<'_>,
        command: &[String],
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), target.namespace);
        let params = AttachParams::default()
            .container(target.container)
            .stdin(false)
            .stdout(true)
            .stderr(true)
            .tty(false);

        tracing::debug!(
            "exec {}/{} [{}]: {:?}",
            target.namespace,
            target.pod,
            target.container,
            command
        );

        // The handshake starts the remote process; a pending cancel goes first.
        let mut attached = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(target.pod)),
            attached = pods.exec(target.pod, command.to_vec(), &params) => {
                attached.map_err(|e| ToolboxError::ExecSetup {
                    pod: target.pod.to_string(),
                    source: Box::new(e),
                })?
            }
        };

        let stdout = attached.stdout();
        let stderr = attached.stderr();
        let status = attached.take_status();

        let streaming = async {
            if let Err(e) = pump(stdout, stderr, sink).await {
                return Err(stream_error(target.pod, e));
            }

            let status = match status {
                Some(status) => status.await,
                None => None,
            };
            match status.as_ref().and_then(status_failure) {
                Some(reason) => Err(stream_error(target.pod, reason)),
                None => Ok(()),
            }
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                attached.abort();
                return Err(cancelled(target.pod));
            }
            outcome = streaming => outcome,
        };

        let joined = attached.join().await;
        outcome?;
        joined.map_err(|e| stream_error(target.pod, e))
    }
}

fn cancelled(pod: &str) -> ToolboxError {
    ToolboxError::Cancelled {
        pod: Some(pod.to_string()),
    }
}

fn stream_error(pod: &str, source: impl Into<BoxError>) -> ToolboxError {
    ToolboxError::Stream {
        pod: pod.to_string(),
        source: source.into(),
    }
}

/// Copy both remote streams into the sink concurrently until EOF.
///
/// Returns the number of bytes written to stdout and stderr.
pub async fn pump<O, E, S>(
    stdout: Option<O>,
    stderr: Option<E>,
    sink: &mut S,
) -> io::Result<(u64, u64)>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
    S: OutputSink,
{
    let (out, err) = sink.writers();
    tokio::try_join!(drain(stdout, out), drain(stderr, err))
}

async fn drain<R, W>(reader: Option<R>, writer: &mut W) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(0);
    };
    let copied = tokio::io::copy(&mut reader, writer).await?;
    writer.flush().await?;
    Ok(copied)
}

/// Describe a terminal status that reports failure, e.g. a non-zero exit
pub fn status_failure(status: &Status) -> Option<String> {
    if status.status.as_deref() != Some("Failure") {
        return None;
    }

    let exit_code = status
        .details
        .as_ref()
        .and_then(|d| d.causes.as_ref())
        .and_then(|causes| {
            causes
                .iter()
                .find(|c| c.reason.as_deref() == Some("ExitCode"))
                .and_then(|c| c.message.clone())
        });

    Some(match (exit_code, &status.message) {
        (Some(code), _) => format!("command terminated with exit code {}", code),
        (None, Some(message)) => message.clone(),
        (None, None) => status
            .reason
            .clone()
            .unwrap_or_else(|| "remote command failed".to_string()),
    })
}
