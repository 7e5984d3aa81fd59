use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Database;
use crate::services::Mailer;

/// Shared by every handler through axum's `State`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            db,
            mailer,
        }
    }
}
