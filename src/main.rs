//! Counseling Desk server entrypoint.
//!
//! Loads configuration, opens the SQLite store, starts the auto-complete
//! scheduler and serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use counseling_desk::adapters::http::{counseling_router, CounselingAppState};
use counseling_desk::adapters::scheduler::{AutoCompleteScheduler, AutoCompleteSchedulerConfig};
use counseling_desk::adapters::sqlite::{self, SqliteCounselingSessionStore};
use counseling_desk::config::AppConfig;
use counseling_desk::ports::CounselingSessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.server.log_level);
    config.validate()?;

    let policy = config.policy()?;
    let clock = config.clock()?;

    let pool = sqlite::connect(&config.database).await?;
    let sqlite_store = SqliteCounselingSessionStore::new(pool, clock);
    sqlite_store.ensure_schema().await?;
    let store: Arc<dyn CounselingSessionStore> = Arc::new(sqlite_store);

    let scheduler = Arc::new(AutoCompleteScheduler::with_config(
        store.clone(),
        policy,
        AutoCompleteSchedulerConfig::default().with_interval(config.scheduler.interval()),
    ));

    info!(
        standard_threshold_minutes = policy.standard_threshold().num_minutes(),
        extended_threshold_minutes = policy.extended_threshold().num_minutes(),
        utc_offset_minutes = clock.offset_minutes(),
        "Auto-complete policy loaded"
    );

    if config.scheduler.enabled {
        scheduler.start();
    } else {
        warn!("Auto-complete scheduler disabled by configuration");
    }

    let state = CounselingAppState::new(store, clock, scheduler.clone());
    let app = counseling_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Counseling desk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await;
    info!("Counseling desk stopped");
    Ok(())
}

fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
