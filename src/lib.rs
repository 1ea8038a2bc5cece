// Re-export the core oracle functionality
pub use accrual_oracle_core::*;

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. `RUST_LOG` wins when set;
/// otherwise the config's `logging` flag picks between `info` and `warn`.
/// Returns false when a subscriber was already installed.
pub fn init_logging(config: &OracleConfig) -> bool {
    let default_level = if config.logging { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(default_level, "tracing initialised");
    }
    installed
}

#[cfg(test)]
mod tests;
