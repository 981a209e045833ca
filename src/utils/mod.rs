pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "expense_core=info";

/// Installs the global tracing subscriber. `RUST_LOG`, when set, replaces the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::fmt;

        // Another subscriber may already be installed by an embedding application.
        let _ = fmt()
            .with_env_filter(default_filter())
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn default_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
