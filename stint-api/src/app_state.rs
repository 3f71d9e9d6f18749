use std::sync::Arc;

use sqlx::PgPool;
use url::Url;

use crate::repositories::{SessionRepository, SessionRepositoryImpl};

#[derive(Clone)]
pub struct AppState {
    pub app_url: Url,
    pub db_pool: Arc<PgPool>,
    pub session_repo: Arc<dyn SessionRepository + Send + Sync>,
}

impl AppState {
    pub fn new(app_url: Url, db_pool: PgPool) -> Self {
        Self {
            app_url,
            db_pool: Arc::new(db_pool.clone()),
            session_repo: Arc::new(SessionRepositoryImpl::new(db_pool)),
        }
    }
}
