use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    registry::NodeRegistry,
    store::{ConnectionFactory, ReplicaConnection, RequestRecord, ServerIdentity},
};

/// In-process stand-in for the replica set. Backs the HTTP tests and the
/// `STORE_BACKEND=memory` mode for running the demo without a live cluster.
pub struct MemoryCluster {
    replicas: HashMap<String, Arc<MemoryReplica>>,
    down: RwLock<HashSet<String>>,
}

struct MemoryReplica {
    host: String,
    pid: i64,
    records: RwLock<Vec<RequestRecord>>,
}

impl MemoryCluster {
    /// One synthetic replica per registry node, keyed by endpoint.
    pub fn for_registry(registry: &NodeRegistry) -> Self {
        let replicas = registry
            .iter()
            .enumerate()
            .map(|(index, node)| {
                (
                    node.endpoint.clone(),
                    Arc::new(MemoryReplica {
                        host: format!("{}:27017", node.name),
                        pid: 1000 + index as i64,
                        records: RwLock::new(Vec::new()),
                    }),
                )
            })
            .collect();

        Self {
            replicas,
            down: RwLock::new(HashSet::new()),
        }
    }

    /// Routes the proxy endpoint to one of the existing replicas, the way a
    /// TCP balancer forwards to an unspecified backing node.
    pub fn with_proxy_alias(mut self, endpoint: &str) -> Self {
        if let Some(replica) = self.replicas.values().next().cloned() {
            self.replicas.insert(endpoint.to_string(), replica);
        }
        self
    }

    /// Simulates an unreachable endpoint; subsequent connects fail.
    pub async fn set_down(&self, endpoint: &str) {
        self.down.write().await.insert(endpoint.to_string());
    }

    pub async fn set_up(&self, endpoint: &str) {
        self.down.write().await.remove(endpoint);
    }
}

#[async_trait]
impl ConnectionFactory for MemoryCluster {
    async fn connect(&self, endpoint: &str) -> AppResult<Box<dyn ReplicaConnection>> {
        if self.down.read().await.contains(endpoint) {
            return Err(AppError::connectivity(format!(
                "{endpoint}: connection refused"
            )));
        }

        let replica = self
            .replicas
            .get(endpoint)
            .ok_or_else(|| AppError::connectivity(format!("{endpoint}: no such host")))?;

        Ok(Box::new(MemoryConnection {
            replica: Arc::clone(replica),
        }))
    }
}

struct MemoryConnection {
    replica: Arc<MemoryReplica>,
}

#[async_trait]
impl ReplicaConnection for MemoryConnection {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn identity(&self) -> AppResult<ServerIdentity> {
        Ok(ServerIdentity {
            host: Some(self.replica.host.clone()),
            pid: Some(self.replica.pid),
        })
    }

    async fn insert_record(&self, record: &RequestRecord) -> AppResult<String> {
        self.replica.records.write().await.push(record.clone());
        Ok(Uuid::new_v4().simple().to_string())
    }

    async fn count_records(&self) -> AppResult<u64> {
        Ok(self.replica.records.read().await.len() as u64)
    }
}
