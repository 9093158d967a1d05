//! Telemetry
//!
//! Sets up `tracing-subscriber`. `RUST_LOG` overrides the default filter.
//! Debug builds print pretty terminal output, release builds emit JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_telemetry_with_level(log_level: &str) {
    let default_filter = format!("{},legion_core={},legion_server={}", log_level, log_level, log_level);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(false))
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .ok();
    }
}

pub fn init_telemetry() {
    init_telemetry_with_level("info");
}
