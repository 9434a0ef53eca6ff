//! Logging setup
//!
//! Console logging through `tracing-subscriber`. `RUST_LOG` overrides the
//! level passed in.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{ClientError, ClientResult};

/// Initialize the global subscriber.
///
/// `json_format` switches the console output to one JSON object per line.
pub fn init_logger(level: &str, json_format: bool) -> ClientResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init()
    };

    result.map_err(|e| ClientError::Config(format!("logger already initialized: {}", e)))
}
