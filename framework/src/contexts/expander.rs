//! Composite context expansion
//!
//! Turns `with_string_or_symbol` into one invocation of `with_string` and one
//! of `with_symbol`, each receiving the same block.

use super::name::{provider_name, CompositeName};
use super::registry::ContextRegistry;
use super::Block;
use crate::error::ShouldaError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How a composite expansion treats a constituent with no provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionPolicy {
    /// Invoke providers left to right and fail at the first missing one.
    /// Providers before the gap have already run.
    #[default]
    FailFast,
    /// Check every constituent before invoking anything
    ValidateFirst,
}

impl FromStr for ExpansionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            "validate-first" | "validate_first" => Ok(Self::ValidateFirst),
            other => Err(format!(
                "unknown policy '{}', expected fail-fast or validate-first",
                other
            )),
        }
    }
}

impl fmt::Display for ExpansionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail-fast"),
            Self::ValidateFirst => write!(f, "validate-first"),
        }
    }
}

/// Providers invoked by one dispatch, in invocation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Expansion {
    providers: Vec<String>,
}

impl Expansion {
    pub(crate) fn from_providers(providers: Vec<String>) -> Self {
        Self { providers }
    }

    /// Full provider names (`with_<context>`)
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// Number of providers invoked
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if nothing was invoked (a custom fallback handled the name)
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Last-resort handler for names the registry has no provider for
///
/// Stateless: it only borrows the registry, so dispatching the same name
/// twice invokes the same providers in the same order.
///
/// # Example
///
/// ```rust
/// use shoulda::{ContextRegistry, ShouldaError};
///
/// let registry = ContextRegistry::<Vec<String>>::new()
///     .provider("foo", |host: &mut Vec<String>, block| {
///         host.push("foo".into());
///         block(host)
///     })?
///     .provider("bar", |host: &mut Vec<String>, block| {
///         host.push("bar".into());
///         block(host)
///     })?;
///
/// let block = |host: &mut Vec<String>| -> Result<(), ShouldaError> {
///     host.push("block".into());
///     Ok(())
/// };
/// let mut host = Vec::new();
/// let expansion = registry.expander().expand_composite(&mut host, "with_foo_or_bar", Some(&block))?;
///
/// assert_eq!(expansion.providers(), ["with_foo", "with_bar"]);
/// assert_eq!(host, ["foo", "block", "bar", "block"]);
/// # Ok::<(), ShouldaError>(())
/// ```
pub struct ContextExpander<'r, H> {
    registry: &'r ContextRegistry<H>,
}

impl<'r, H> ContextExpander<'r, H> {
    /// Create an expander over `registry`
    pub fn new(registry: &'r ContextRegistry<H>) -> Self {
        Self { registry }
    }

    /// Handle a name that normal resolution could not find
    ///
    /// Composite names are expanded; anything else goes to the registry's
    /// fallback with its arguments and block untouched. Arguments are never
    /// forwarded to context providers.
    pub fn dispatch(
        &self,
        host: &mut H,
        name: &str,
        args: &[Value],
        block: Option<&Block<'_, H>>,
    ) -> Result<Expansion, ShouldaError> {
        match CompositeName::parse(name) {
            Some(composite) => {
                let block = block.ok_or_else(|| ShouldaError::missing_block(name))?;
                self.conditional_contexts(host, composite.contexts(), block)
            }
            None => {
                tracing::trace!(name, "not a composite context name, using fallback");
                self.registry.fallback().unresolved(host, name, args, block)
            }
        }
    }

    /// Expand a composite name directly
    ///
    /// Unlike [`dispatch`](Self::dispatch) this never consults the fallback:
    /// a name outside the composite grammar is an unresolved name.
    pub fn expand_composite(
        &self,
        host: &mut H,
        name: &str,
        block: Option<&Block<'_, H>>,
    ) -> Result<Expansion, ShouldaError> {
        let composite =
            CompositeName::parse(name).ok_or_else(|| ShouldaError::unresolved(name))?;
        let block = block.ok_or_else(|| ShouldaError::missing_block(name))?;
        self.conditional_contexts(host, composite.contexts(), block)
    }

    /// Invoke `with_<context>` for each context in order, passing `block`
    pub fn conditional_contexts<S: AsRef<str>>(
        &self,
        host: &mut H,
        contexts: &[S],
        block: &Block<'_, H>,
    ) -> Result<Expansion, ShouldaError> {
        let names: Vec<String> = contexts.iter().map(|c| provider_name(c.as_ref())).collect();

        if self.registry.policy() == ExpansionPolicy::ValidateFirst {
            if let Some(missing) = names.iter().find(|n| !self.registry.contains(n)) {
                return Err(ShouldaError::unresolved(missing.as_str()));
            }
        }

        let total = names.len();
        for (index, name) in names.iter().enumerate() {
            let provider = self
                .registry
                .get(name)
                .ok_or_else(|| ShouldaError::unresolved(name.as_str()))?;

            tracing::debug!(provider = %name, index, total, "expanding context");
            provider.provide(host, block)?;
        }

        Ok(Expansion::from_providers(names))
    }
}
