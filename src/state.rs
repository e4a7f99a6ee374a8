use std::sync::Arc;

use crate::auth::{SessionCookies, TokenIssuer};
use crate::config::AppConfig;
use crate::database::DocumentStore;

/// Shared request context: the store handle and the session machinery.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenIssuer>,
    pub cookies: SessionCookies,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenIssuer::from_config(config)),
            cookies: SessionCookies::new(config.environment),
        }
    }
}
