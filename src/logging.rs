//! Log output. Code logs through the `log` facade; the subscriber installed
//! here also collects those records, plus the request spans from tower-http.

use crate::error::AppError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(|e| AppError::Config(format!("logging: {}", e)))
}
