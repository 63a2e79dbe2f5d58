use crate::error::ShouldaError;
use std::path::Path;

/// Environment a suite runs in
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Testing,
    Development,
    Ci,
    Custom(String),
}

impl Environment {
    /// Detect environment from SHOULDA_ENV or default to Testing
    pub fn detect() -> Self {
        match std::env::var("SHOULDA_ENV").ok().as_deref() {
            Some("development") => Self::Development,
            Some("ci") => Self::Ci,
            Some("testing") | None => Self::Testing,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    /// Get the .env file suffix for this environment
    pub fn env_file_suffix(&self) -> &str {
        match self {
            Self::Testing => "testing",
            Self::Development => "development",
            Self::Ci => "ci",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Check if running under continuous integration
    pub fn is_ci(&self) -> bool {
        matches!(self, Self::Ci)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.env_file_suffix())
    }
}

/// Load environment variables from .env files with proper precedence
///
/// Precedence (later files override earlier):
/// 1. .env (base defaults)
/// 2. .env.local (local overrides, not committed)
/// 3. .env.{environment} (environment-specific)
/// 4. .env.{environment}.local (environment-specific local overrides)
/// 5. Actual system environment variables (highest priority)
pub fn load_dotenv(project_root: &Path) -> Environment {
    let env = Environment::detect();
    let suffix = env.env_file_suffix();

    // dotenvy never overwrites a variable that is already set, so the most
    // specific file is loaded first
    let _ = dotenvy::from_path(project_root.join(format!(".env.{}.local", suffix)));
    let _ = dotenvy::from_path(project_root.join(format!(".env.{}", suffix)));
    let _ = dotenvy::from_path(project_root.join(".env.local"));
    let _ = dotenvy::from_path(project_root.join(".env"));

    env
}

/// Get an environment variable with a default value
///
/// Unset variables yield the default; set but unparsable ones are an error.
///
/// # Example
/// ```
/// use shoulda::config::env;
///
/// let catch: bool = env("SHOULDA_EXAMPLE_UNSET_FLAG", true).unwrap();
/// assert!(catch);
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ShouldaError>
where
    T::Err: std::fmt::Display,
{
    Ok(env_optional(key)?.unwrap_or(default))
}

/// Get an optional environment variable
///
/// # Example
/// ```
/// use shoulda::config::env_optional;
///
/// let filter: Option<String> = env_optional("SHOULDA_EXAMPLE_UNSET_FILTER").unwrap();
/// assert!(filter.is_none());
/// ```
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ShouldaError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ShouldaError::config(key, e.to_string())),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_default_when_unset() {
        let value: u32 = env("SHOULDA_TEST_ENV_UNSET_NUMBER", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_env_parse_error() {
        std::env::set_var("SHOULDA_TEST_ENV_BAD_NUMBER", "seven");
        let err = env::<u32>("SHOULDA_TEST_ENV_BAD_NUMBER", 7).unwrap_err();
        assert!(matches!(err, ShouldaError::Config { ref key, .. } if key == "SHOULDA_TEST_ENV_BAD_NUMBER"));
    }

    #[test]
    fn test_load_dotenv_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "SHOULDA_TEST_DOTENV_VALUE=base\n").unwrap();
        std::fs::write(
            dir.path().join(".env.testing"),
            "SHOULDA_TEST_DOTENV_VALUE=testing\n",
        )
        .unwrap();

        let environment = load_dotenv(dir.path());

        if environment == Environment::Testing {
            assert_eq!(
                std::env::var("SHOULDA_TEST_DOTENV_VALUE").unwrap(),
                "testing"
            );
        } else {
            assert!(std::env::var("SHOULDA_TEST_DOTENV_VALUE").is_ok());
        }
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Testing.to_string(), "testing");
        assert_eq!(Environment::Custom("nightly".into()).to_string(), "nightly");
        assert!(Environment::Ci.is_ci());
    }
}
