use std::sync::Arc;

use crate::config::Config;
use crate::recommendation::generator::Recommender;

/// Shared application state injected into all route handlers via Axum
/// extractors. The recommender is resolved once, before the listener binds,
/// and is read-only afterwards, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub config: Config,
}
