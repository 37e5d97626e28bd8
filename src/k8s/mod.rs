//! Kubernetes operations

pub mod ceph;
pub mod command;
pub mod connection;
pub mod exec;
pub mod pods;
pub mod runner;

pub use ceph::{CephCluster, CephClusterSummary};
pub use command::{CommandRequest, Tokenizer};
pub use connection::ClusterConnection;
pub use exec::{BufferSink, OutputSink, ProcessSink, RemoteExecutor};
pub use pods::{PodLookup, PodSummary};
pub use runner::{ExecutionResult, PodCommandRunner};
