use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    /// Held across load-modify-save so concurrent mutations never interleave.
    pub writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            writer: Arc::new(Mutex::new(())),
        }
    }
}
