use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_backend::api::router;
use lms_backend::config::Config;
use lms_backend::db;
use lms_backend::services::ShellReportExporter;
use lms_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "lms_backend=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    tokio::fs::create_dir_all(&config.upload_folder).await?;

    if config.seed_demo_data && db::seed::seed_demo_data(&pool).await? {
        info!("seeded demo data");
    }

    let state = AppState {
        db: pool.clone(),
        exporter: Arc::new(ShellReportExporter::new(config.report_command.clone())),
        config: Arc::new(config.clone()),
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("received ctrl-c, shutting down");
}
