//! Structured logging for suite definition and execution
//!
//! Dispatch and runner events are emitted with `tracing`. Call [`init`] once
//! (the `suite!` macro does) to print them; the filter comes from
//! `SHOULDA_LOG`, e.g. `SHOULDA_LOG=shoulda=debug` shows every context
//! expansion.

use crate::config::ShouldaConfig;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by the current config
///
/// Safe to call from every test: if a subscriber is already installed the
/// call does nothing.
pub fn init() {
    init_with(&ShouldaConfig::current());
}

/// Install a `fmt` subscriber using `config.log_filter`
pub fn init_with(config: &ShouldaConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_test_writer()
        .try_init();
}

/// `config.log_filter`, or `warn` when it is not a valid directive
fn filter(config: &ShouldaConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = ShouldaConfig::builder().log_filter("shoulda=debug").build();
        init_with(&config);
        init_with(&config);
        init();
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn test_filter_uses_config() {
        let config = ShouldaConfig::builder().log_filter("shoulda=debug").build();
        assert_eq!(filter(&config).to_string(), "shoulda=debug");
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let config = ShouldaConfig::builder().log_filter("shoulda=loudest").build();
        assert_eq!(filter(&config).to_string(), "warn");
    }
}
