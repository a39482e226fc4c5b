/// Log output setup shared by the binaries.
///
/// Level filtering follows `RUST_LOG` (e.g. `RUST_LOG=tornado_dashboard=debug`)
/// and defaults to `info`. Library code only emits `tracing` events; nothing
/// is printed until a binary calls `init_logging`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a compact stderr subscriber. Calling it twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
