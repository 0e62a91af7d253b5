//! Logging bootstrap built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,trellis_attrib=debug";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Panics if one is already installed.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(filter()).init();
}

/// Like [`init`], but reports an already-installed subscriber instead of panicking.
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter(filter()).try_init()
}
