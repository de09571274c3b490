use sqlx::PgPool;
use std::sync::Arc;

use crate::services::{auth::AuthService, result_store::ResultStore};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub store: Arc<ResultStore>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: PgPool, store: ResultStore, auth: AuthService) -> Self {
        Self {
            db,
            store: Arc::new(store),
            auth: Arc::new(auth),
        }
    }
}
