use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Install a global tracing subscriber for structured logging
///
/// Honours `RUST_LOG`, defaulting to `info`. Returns `false` if a subscriber
/// was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .with_writer(std::io::stdout))
        .with(env_filter)
        .try_init()
        .is_ok()
}
