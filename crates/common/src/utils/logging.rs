use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Human-readable logs on stdout. `RUST_LOG` overrides the built-in filter,
/// which keeps request traces from `tower_http` at info.
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event, for log shippers. Without `RUST_LOG`,
/// grant and store events from the `service` crate are emitted at debug.
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,service=debug"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
