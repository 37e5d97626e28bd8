//! Run a command in the toolbox pod and collect its output

use std::time::Duration;

use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use tokio_util::sync::CancellationToken;

use crate::config::{Settings, ToolboxTarget};
use crate::error::{Result, ToolboxError};
use crate::k8s::command::{CommandRequest, Tokenizer};
use crate::k8s::connection::ClusterConnection;
use crate::k8s::exec::{
    BufferSink, ExecTarget, KubeExecutor, OutputSink, ProcessSink, RemoteExecutor,
};
use crate::k8s::pods::{KubePodLookup, PodLookup, find_toolbox_pod};

/// Output of a buffered command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Pod the command ran in
    pub pod: String,
    /// Exactly the bytes the remote process wrote to stdout
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Finds the toolbox pod and execs commands in it.
///
/// Each call does one lookup and one exec attempt.
pub struct PodCommandRunner<L = KubePodLookup, X = KubeExecutor> {
    lookup: L,
    executor: X,
    target: ToolboxTarget,
    tokenizer: Tokenizer,
    wait: Option<Duration>,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl PodCommandRunner {
    /// Build a runner against a fresh cluster connection
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let conn = ClusterConnection::connect(&settings.cluster).await?;
        Ok(Self::from_connection(&conn, settings))
    }

    pub fn from_connection(conn: &ClusterConnection, settings: &Settings) -> Self {
        Self::new(
            KubePodLookup::new(conn.client().clone()),
            KubeExecutor::new(conn.client().clone()),
            settings.toolbox.clone(),
        )
        .with_tokenizer(settings.exec.tokenizer)
        .with_wait(settings.exec.wait())
        .with_timeout(settings.exec.timeout())
    }
}

impl<L: PodLookup, X: RemoteExecutor> PodCommandRunner<L, X> {
    pub fn new(lookup: L, executor: X, target: ToolboxTarget) -> Self {
        Self {
            lookup,
            executor,
            target,
            tokenizer: Tokenizer::default(),
            wait: None,
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Wait up to `wait` for the selected pod to be running before exec
    pub fn with_wait(mut self, wait: Option<Duration>) -> Self {
        self.wait = wait;
        self
    }

    /// Cancel commands that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Commands abort when this token is cancelled
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn target(&self) -> &ToolboxTarget {
        &self.target
    }

    /// Pick the pod commands will run in
    pub async fn resolve_pod(&self) -> Result<Pod> {
        let pod = find_toolbox_pod(&self.lookup, &self.target).await?;

        if let Some(wait) = self.wait {
            crate::log_info!(
                "Waiting up to {}s for pod {} to be running",
                wait.as_secs(),
                pod.name_any()
            );
            self.lookup
                .wait_until_running(&self.target.namespace, &pod.name_any(), wait)
                .await?;
        }

        Ok(pod)
    }

    /// Run `command` and return its captured output
    pub async fn run(&self, command: &str) -> Result<ExecutionResult> {
        let mut sink = BufferSink::default();
        let pod = self.execute(command, &mut sink).await?;
        Ok(ExecutionResult {
            pod,
            stdout: sink.stdout,
            stderr: sink.stderr,
        })
    }

    /// Run `command` with its output going straight to this process' stdout/stderr
    pub async fn stream(&self, command: &str) -> Result<String> {
        let mut sink = ProcessSink::new();
        self.execute(command, &mut sink).await
    }

    /// Run `command` writing into `sink`, returning the pod name.
    ///
    /// Cancellation is honoured from the start: nothing runs in the pod once
    /// the token has fired, including while the lookup or `--wait` is pending.
    pub async fn execute<S: OutputSink>(&self, command: &str, sink: &mut S) -> Result<String> {
        let request = CommandRequest::parse_with(command, self.tokenizer)?;
        tracing::debug!("{:?} tokenized as {:?}", request.raw(), request.args());

        let pod = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ToolboxError::Cancelled { pod: None }),
            pod = self.resolve_pod() => pod?,
        };
        let pod_name = pod.name_any();

        let target = ExecTarget {
            namespace: &self.target.namespace,
            pod: &pod_name,
            container: &self.target.container,
        };

        let cancel = self.cancel.child_token();
        let watchdog = self.timeout.map(|limit| {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                token.cancel();
            })
        });

        let outcome = self
            .executor
            .exec(&target, request.args(), sink, &cancel)
            .await;

        if let Some(watchdog) = watchdog {
            watchdog.abort();
        }

        match outcome {
            Ok(()) => Ok(pod_name),
            Err(ToolboxError::Cancelled { pod }) if !self.cancel.is_cancelled() => {
                match self.timeout {
                    Some(limit) => Err(ToolboxError::TimedOut {
                        pod: pod_name,
                        timeout: limit,
                    }),
                    None => Err(ToolboxError::Cancelled { pod }),
                }
            }
            Err(e) => Err(e),
        }
    }
}
