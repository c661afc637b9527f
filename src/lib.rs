pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod logging;
pub mod web;

use config::AppConfig;
use error::AppError;
use infra::init_db;

/// Load configuration, open the database and serve until shutdown.
pub fn run() -> Result<(), AppError> {
    // .env is optional
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    logging::init_logging(&config.log_level)?;

    log::info!("DB path: {:?}", config.db_path);
    let pool = init_db(&config.db_path).map_err(|e| {
        log::error!("DB init failed: {}", e);
        e
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(format!("tokio runtime: {}", e)))?;
    runtime.block_on(web::serve(&config, pool))
}
