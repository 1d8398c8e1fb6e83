use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;

/// Identity reported by a replica's serverStatus probe. Observability only;
/// routing never depends on it.
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    pub host: Option<String>,
    pub pid: Option<i64>,
}

/// Document written on each routed request. Owned by whichever replica
/// received it; never mutated or deleted by this service.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub host: String,
    pub pid: Option<i64>,
    pub node: String,
}

/// Short-lived handle to one replica (or the proxy), bound to the fixed
/// database. Dropping it releases the underlying connection, on every exit
/// path.
#[async_trait]
pub trait ReplicaConnection: Send {
    /// Liveness probe.
    async fn ping(&self) -> AppResult<()>;

    /// Host and process id of the serving replica.
    async fn identity(&self) -> AppResult<ServerIdentity>;

    /// Inserts one record into the fixed collection and returns the
    /// identifier assigned by the replica.
    async fn insert_record(&self, record: &RequestRecord) -> AppResult<String>;

    /// Unfiltered document count for the fixed collection.
    async fn count_records(&self) -> AppResult<u64>;
}

/// Opens one connection per call; no pooling. Each handler invocation owns
/// exactly one connection per database call it makes.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn connect(&self, endpoint: &str) -> AppResult<Box<dyn ReplicaConnection>>;
}
