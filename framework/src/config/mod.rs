//! Configuration for suites and context expansion
//!
//! Settings come from environment variables, optionally loaded from `.env`
//! files first:
//!
//! | Key | Values | Default |
//! |-----|--------|---------|
//! | `SHOULDA_ENV` | `testing`, `development`, `ci`, any name | `testing` |
//! | `SHOULDA_EXPANSION_POLICY` | `fail-fast`, `validate-first` | `fail-fast` |
//! | `SHOULDA_LOG` | `tracing` filter directive | `warn` |
//! | `SHOULDA_CATCH_PANICS` | `true`, `false` | `true` |
//!
//! # Example
//!
//! ```rust,no_run
//! use shoulda::ShouldaConfig;
//!
//! let config = ShouldaConfig::init(std::path::Path::new(".")).unwrap();
//! println!("Expanding contexts with {} policy", config.expansion_policy);
//! ```

pub mod env;

pub use env::{env, env_optional, load_dotenv, Environment};

use crate::contexts::ExpansionPolicy;
use crate::error::ShouldaError;
use std::path::Path;
use std::sync::OnceLock;

/// Process-wide configuration set by `ShouldaConfig::init`
static CURRENT: OnceLock<ShouldaConfig> = OnceLock::new();

/// Settings for context expansion and suite execution
#[derive(Debug, Clone, PartialEq)]
pub struct ShouldaConfig {
    /// Environment the suites run in
    pub environment: Environment,
    /// How composite expansion treats missing providers
    pub expansion_policy: ExpansionPolicy,
    /// `tracing` filter used by `logging::init`
    pub log_filter: String,
    /// Report panicking test bodies as failures instead of aborting the run
    pub catch_panics: bool,
}

impl ShouldaConfig {
    /// Build config from environment variables
    pub fn from_env() -> Result<Self, ShouldaError> {
        let log_filter: String = env("SHOULDA_LOG", "warn".to_string())?;
        if log_filter.is_empty() {
            return Err(ShouldaError::config("SHOULDA_LOG", "filter must not be empty"));
        }

        Ok(Self {
            environment: Environment::detect(),
            expansion_policy: env("SHOULDA_EXPANSION_POLICY", ExpansionPolicy::default())?,
            log_filter,
            catch_panics: env("SHOULDA_CATCH_PANICS", true)?,
        })
    }

    /// Load `.env` files from `project_root`, then read and store the config
    ///
    /// The first successful call wins; later calls return the stored config.
    pub fn init(project_root: &Path) -> Result<Self, ShouldaError> {
        if let Some(config) = CURRENT.get() {
            return Ok(config.clone());
        }

        load_dotenv(project_root);
        let config = Self::from_env()?;
        Ok(CURRENT.get_or_init(|| config).clone())
    }

    /// The stored config, initializing it from the working directory on
    /// first use
    ///
    /// Falls back to the defaults when the environment holds invalid values;
    /// the fallback is stored so the warning is logged once.
    pub fn current() -> Self {
        if let Some(config) = CURRENT.get() {
            return config.clone();
        }

        Self::init(Path::new(".")).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid shoulda configuration, using defaults");
            CURRENT.get_or_init(Self::default).clone()
        })
    }

    /// Create a builder for customizing config
    pub fn builder() -> ShouldaConfigBuilder {
        ShouldaConfigBuilder::default()
    }
}

impl Default for ShouldaConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Testing,
            expansion_policy: ExpansionPolicy::default(),
            log_filter: "warn".to_string(),
            catch_panics: true,
        }
    }
}

/// Builder for ShouldaConfig
#[derive(Default)]
pub struct ShouldaConfigBuilder {
    environment: Option<Environment>,
    expansion_policy: Option<ExpansionPolicy>,
    log_filter: Option<String>,
    catch_panics: Option<bool>,
}

impl ShouldaConfigBuilder {
    /// Set the environment
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the expansion policy
    pub fn expansion_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.expansion_policy = Some(policy);
        self
    }

    /// Set the log filter
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Set whether panics in test bodies are caught
    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = Some(catch);
        self
    }

    /// Build the config; unset fields keep their defaults
    pub fn build(self) -> ShouldaConfig {
        let default = ShouldaConfig::default();
        ShouldaConfig {
            environment: self.environment.unwrap_or(default.environment),
            expansion_policy: self.expansion_policy.unwrap_or(default.expansion_policy),
            log_filter: self.log_filter.unwrap_or(default.log_filter),
            catch_panics: self.catch_panics.unwrap_or(default.catch_panics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // from_env reads process-wide variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn from_env_with(key: &str, value: &str) -> Result<ShouldaConfig, ShouldaError> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var(key, value);
        let result = ShouldaConfig::from_env();
        std::env::remove_var(key);
        result
    }

    fn config_key(err: &ShouldaError) -> Option<&str> {
        match err {
            ShouldaError::Config { key, .. } => Some(key),
            _ => None,
        }
    }

    #[test]
    fn test_from_env_rejects_unknown_policy() {
        let err = from_env_with("SHOULDA_EXPANSION_POLICY", "sometimes").unwrap_err();
        assert_eq!(config_key(&err), Some("SHOULDA_EXPANSION_POLICY"));
        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn test_from_env_rejects_bad_bool() {
        let err = from_env_with("SHOULDA_CATCH_PANICS", "maybe").unwrap_err();
        assert_eq!(config_key(&err), Some("SHOULDA_CATCH_PANICS"));
    }

    #[test]
    fn test_from_env_rejects_empty_log_filter() {
        let err = from_env_with("SHOULDA_LOG", "  ").unwrap_err();
        assert_eq!(
            err,
            ShouldaError::config("SHOULDA_LOG", "filter must not be empty")
        );
    }

    #[test]
    fn test_current_stores_fallback() {
        {
            let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            std::env::set_var("SHOULDA_EXPANSION_POLICY", "sometimes");
            ShouldaConfig::current();
            std::env::remove_var("SHOULDA_EXPANSION_POLICY");
        }

        let stored = CURRENT.get().cloned();
        assert!(stored.is_some());
        assert_eq!(Some(ShouldaConfig::current()), stored);
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ShouldaConfig::builder()
            .expansion_policy(ExpansionPolicy::ValidateFirst)
            .catch_panics(false)
            .build();

        assert_eq!(config.expansion_policy, ExpansionPolicy::ValidateFirst);
        assert!(!config.catch_panics);
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.environment, Environment::Testing);
    }

    #[test]
    fn test_default_is_fail_fast() {
        let config = ShouldaConfig::default();
        assert_eq!(config.expansion_policy, ExpansionPolicy::FailFast);
        assert!(config.catch_panics);
    }
}
