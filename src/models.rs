use std::collections::BTreeMap;

use serde::Serialize;

/// Success body for `/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub mongo_uri: String,
}

/// Success body for `/request`.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub message: String,
    pub mongo_node: String,
    pub mongo_host: String,
    pub mongo_pid: Option<i64>,
    pub inserted_id: String,
}

/// Per-node slice of the stats fan-out: a count, or the error string for a
/// node that failed its query.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NodeCount {
    Count(u64),
    Error(String),
}

/// Body for `/stats`. The total covers successful nodes only; field names
/// follow the original wire format.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats_por_host: BTreeMap<String, NodeCount>,
    pub total_peticiones: u64,
}
