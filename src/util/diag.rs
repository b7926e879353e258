// Logbook - util/diag.rs
//
// Diagnostic-channel setup. The crate mirrors leveled log calls to
// `tracing` events; hosts that want those mirrors (and the crate's own
// diagnostics) visible on stderr call `init` once at startup. Hosts with
// their own subscriber skip this entirely.
//
// Priority: RUST_LOG env var > explicit level argument > default "info".

use tracing_subscriber::EnvFilter;

/// Initialise the diagnostic subscriber.
///
/// `level` is an optional filter directive, typically from the `[logging]`
/// section of config.toml. Calling this more than once, or after the host
/// installed its own subscriber, is a silent no-op: a logging crate must
/// never panic its host over diagnostics plumbing.
pub fn init(level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if let Some(level) = level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_DIAG_LEVEL)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Diagnostics initialised"
    );
}
