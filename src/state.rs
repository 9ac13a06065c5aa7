use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::services::ReportExporter;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub exporter: Arc<dyn ReportExporter>,
}
