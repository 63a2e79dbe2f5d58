//! Context and composite name grammar

use crate::error::ShouldaError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Prefix shared by every provider name
pub const PROVIDER_PREFIX: &str = "with_";

/// Separator joining context names inside a composite name
pub const SEPARATOR: &str = "_or_";

static CONTEXT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("context name pattern is valid")
});

static COMPOSITE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^with_([a-zA-Z][a-zA-Z0-9_]*(?:_or_[a-zA-Z][a-zA-Z0-9_]*)+)$")
        .expect("composite name pattern is valid")
});

/// A single context identifier such as `string` in `with_string`
///
/// Must match `[a-zA-Z][a-zA-Z0-9_]*` and must not contain the `_or_`
/// separator, otherwise it could never be reached through a composite name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextName(String);

impl ContextName {
    /// Validate a context identifier
    ///
    /// # Example
    /// ```rust
    /// use shoulda::ContextName;
    ///
    /// let name = ContextName::parse("bar_zeta").unwrap();
    /// assert_eq!(name.provider_name(), "with_bar_zeta");
    /// assert!(ContextName::parse("1st").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, ShouldaError> {
        if CONTEXT_NAME.is_match(name) && !name.contains(SEPARATOR) {
            Ok(Self(name.to_string()))
        } else {
            Err(ShouldaError::invalid_context(name))
        }
    }

    /// The bare identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name the provider for this context is registered under
    pub fn provider_name(&self) -> String {
        provider_name(&self.0)
    }
}

impl fmt::Display for ContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the provider name `with_<context>`
pub fn provider_name(context: &str) -> String {
    format!("{}{}", PROVIDER_PREFIX, context)
}

/// A name of the form `with_<a>_or_<b>(_or_<c>...)`
///
/// Parsing only succeeds when at least one separator is present, so a
/// plain provider name such as `with_foo` is never treated as composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeName {
    name: String,
    contexts: Vec<String>,
}

impl CompositeName {
    /// Match `name` against the composite grammar
    ///
    /// The captured group is split on every occurrence of `_or_`, left to
    /// right. Segments are kept as written; a segment with no registered
    /// provider surfaces later as an unresolved name.
    ///
    /// # Example
    /// ```rust
    /// use shoulda::CompositeName;
    ///
    /// let composite = CompositeName::parse("with_foo_or_bar_or_zeta").unwrap();
    /// assert_eq!(composite.contexts(), ["foo", "bar", "zeta"]);
    ///
    /// assert!(CompositeName::parse("with_foo").is_none());
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let captures = COMPOSITE_NAME.captures(name)?;
        let group = captures.get(1)?.as_str();

        Some(Self {
            name: name.to_string(),
            contexts: group.split(SEPARATOR).map(str::to_string).collect(),
        })
    }

    /// Check whether `name` follows the composite grammar
    pub fn is_composite(name: &str) -> bool {
        COMPOSITE_NAME.is_match(name)
    }

    /// The full composite name as dispatched
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Context identifiers in the order they appear in the name
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Provider names to invoke, in order
    pub fn provider_names(&self) -> Vec<String> {
        self.contexts.iter().map(|c| provider_name(c)).collect()
    }
}

impl fmt::Display for CompositeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
