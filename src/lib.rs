// ============================================================================
// Mongo Balancer Demo Library
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod registry;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use app::build_router;
pub use config::{AppConfig, StoreBackend};
pub use error::{AppError, AppResult};
pub use registry::{Node, NodeRegistry};
pub use state::AppState;
pub use store::{ConnectionFactory, ReplicaConnection, RequestRecord, ServerIdentity};
