use std::sync::Arc;

use crate::{config::AppConfig, registry::NodeRegistry, store::ConnectionFactory};

/// Shared handler state. Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<NodeRegistry>,
    pub factory: Arc<dyn ConnectionFactory>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        registry: NodeRegistry,
        factory: Arc<dyn ConnectionFactory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            factory,
        }
    }
}
