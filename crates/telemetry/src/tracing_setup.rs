//! Tracing setup for structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration.
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "worker=debug")
    pub filter: String,
    /// Whether to output JSON format
    pub json: bool,
    /// Whether to colorize and timestamp output; CloudWatch does its own
    /// timestamping and does not render ANSI codes.
    pub terminal: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            terminal: true,
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// A second call is a no-op, so warm Lambda containers and tests can call
/// this freely.
pub fn init_tracing(config: TracingConfig) {
    let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_current_span(false)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else if config.terminal {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_ansi(false)
            .without_time()
            .with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    if result.is_ok() {
        tracing::info!("Tracing initialized with filter: {}", config.filter);
    }
}

/// Initialize tracing from environment variables.
///
/// `RUST_LOG` sets the filter, `LOG_JSON=1|true` switches to JSON lines, and
/// running inside Lambda drops colors and timestamps.
pub fn init_tracing_from_env() {
    let json = std::env::var("LOG_JSON")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let in_lambda = std::env::var_os("AWS_LAMBDA_FUNCTION_NAME").is_some();

    init_tracing(
        TracingConfig::new()
            .with_filter(filter)
            .with_json(json)
            .with_terminal(!in_lambda),
    );
}
