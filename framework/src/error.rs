//! Crate-wide error types
//!
//! Every failure raised while defining contexts or dispatching context names
//! is a [`ShouldaError`]. Failed expectations inside test bodies are reported
//! separately as [`crate::testing::AssertionFailure`].

use thiserror::Error;

/// Errors raised while registering providers, dispatching context names or
/// defining a suite
///
/// None of these are retried or recovered internally: a misconfigured suite
/// fails while it is being defined, not while it runs.
///
/// # Example
///
/// ```rust
/// use shoulda::{ContextRegistry, ShouldaError};
///
/// let registry: ContextRegistry<Vec<String>> = ContextRegistry::new();
/// let mut host = Vec::new();
///
/// let err = registry.call(&mut host, "with_nothing", &[], None).unwrap_err();
/// assert_eq!(err, ShouldaError::unresolved("with_nothing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShouldaError {
    /// No provider or fallback could handle the name
    ///
    /// Raised both for names that are not composite and for a constituent
    /// `with_<context>` provider that is not registered.
    #[error("undefined context provider '{name}'")]
    UnresolvedName {
        /// The name that failed to resolve
        name: String,
    },

    /// A composite name was dispatched without a block to run per context
    #[error("block missing for '{name}'")]
    MissingBlock {
        /// The composite name that was dispatched
        name: String,
    },

    /// A provider was registered under a name that can never be dispatched
    #[error("invalid context name '{name}': expected [a-zA-Z][a-zA-Z0-9_]* without '_or_'")]
    InvalidContextName {
        /// The rejected context name
        name: String,
    },

    /// The same context was registered twice
    #[error("context provider '{name}' is already registered")]
    DuplicateProvider {
        /// Full provider name (`with_<context>`)
        name: String,
    },

    /// A suite definition is inconsistent (duplicate test names and the like)
    #[error("invalid suite definition: {message}")]
    Definition {
        /// What went wrong
        message: String,
    },

    /// A configuration value could not be parsed
    #[error("invalid value for {key}: {message}")]
    Config {
        /// The environment key that held the bad value
        key: String,
        /// Why the value was rejected
        message: String,
    },
}

impl ShouldaError {
    /// Create an UnresolvedName error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedName { name: name.into() }
    }

    /// Create a MissingBlock error
    pub fn missing_block(name: impl Into<String>) -> Self {
        Self::MissingBlock { name: name.into() }
    }

    /// Create an InvalidContextName error
    pub fn invalid_context(name: impl Into<String>) -> Self {
        Self::InvalidContextName { name: name.into() }
    }

    /// Create a DuplicateProvider error
    pub fn duplicate_provider(name: impl Into<String>) -> Self {
        Self::DuplicateProvider { name: name.into() }
    }

    /// Create a Definition error
    pub fn definition(message: impl Into<String>) -> Self {
        Self::Definition {
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// The name that failed to resolve, if this is a name resolution error
    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            Self::UnresolvedName { name } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_names_provider() {
        let err = ShouldaError::unresolved("with_bar");
        assert_eq!(err.to_string(), "undefined context provider 'with_bar'");
        assert_eq!(err.unresolved_name(), Some("with_bar"));
    }

    #[test]
    fn test_missing_block_is_not_unresolved() {
        let err = ShouldaError::missing_block("with_foo_or_bar");
        assert_eq!(err.to_string(), "block missing for 'with_foo_or_bar'");
        assert_eq!(err.unresolved_name(), None);
    }

    #[test]
    fn test_config_message() {
        let err = ShouldaError::config("SHOULDA_LOG", "empty filter");
        assert_eq!(err.to_string(), "invalid value for SHOULDA_LOG: empty filter");
    }
}
