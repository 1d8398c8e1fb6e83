use std::collections::BTreeMap;

use axum::{Json, extract::State};
use tracing::{info, warn};

use crate::{
    error::AppResult,
    models::{NodeCount, RequestResponse, StatsResponse, StatusResponse},
    state::AppState,
    store::RequestRecord,
};

/// GET `/`
pub async fn index() -> &'static str {
    "Aplicación Escalable con MongoDB y Nginx (demo de balanceo de carga)"
}

/// GET `/status` — liveness probe through the proxy endpoint.
pub async fn status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let connection = state.factory.connect(&state.config.proxy_uri).await?;
    connection.ping().await?;

    Ok(Json(StatusResponse {
        status: "Conectado a MongoDB vía Nginx".to_string(),
        mongo_uri: state.config.proxy_uri.clone(),
    }))
}

/// GET `/request` — writes one record to a node picked uniformly at random.
///
/// No retry and no fallback: a failure anywhere between connect and insert
/// surfaces as the single error response.
pub async fn make_request(State(state): State<AppState>) -> AppResult<Json<RequestResponse>> {
    let node = state.registry.choose();
    info!(node = %node.name, "routing request");

    let connection = state.factory.connect(&node.endpoint).await?;

    let identity = connection.identity().await?;
    let host = identity.host.unwrap_or_else(|| node.name.clone());

    let record = RequestRecord {
        host: host.clone(),
        pid: identity.pid,
        node: node.name.clone(),
    };
    let inserted_id = connection.insert_record(&record).await?;

    Ok(Json(RequestResponse {
        message: "Petición registrada".to_string(),
        mongo_node: node.name.clone(),
        mongo_host: host,
        mongo_pid: identity.pid,
        inserted_id,
    }))
}

/// GET `/stats` — per-node document counts plus the sum of the successful
/// ones. A failing node contributes an error string under its name; it never
/// aborts the aggregate, and the response is always 200.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut stats_por_host = BTreeMap::new();
    let mut total = 0u64;

    for node in state.registry.iter() {
        match count_node(&state, &node.endpoint).await {
            Ok(count) => {
                total += count;
                stats_por_host.insert(node.name.clone(), NodeCount::Count(count));
            }
            Err(err) => {
                warn!(node = %node.name, error = %err, "stats query failed");
                stats_por_host.insert(node.name.clone(), NodeCount::Error(format!("Error: {err}")));
            }
        }
    }

    Json(StatsResponse {
        stats_por_host,
        total_peticiones: total,
    })
}

async fn count_node(state: &AppState, endpoint: &str) -> AppResult<u64> {
    let connection = state.factory.connect(endpoint).await?;
    connection.count_records().await
}
