//! Provider registry: the explicit dispatch table for context names

use super::expander::{ContextExpander, Expansion, ExpansionPolicy};
use super::name::ContextName;
use super::Block;
use crate::config::ShouldaConfig;
use crate::error::ShouldaError;
use serde_json::Value;
use std::collections::BTreeMap;

/// A procedure that establishes one named context and runs a block inside it
///
/// Implemented for any `Fn(&mut H, &Block<H>) -> Result<(), ShouldaError>`,
/// so most providers are closures.
///
/// # Example
///
/// ```rust
/// use shoulda::{Block, ContextProvider, ShouldaError};
///
/// struct Uppercase;
///
/// impl ContextProvider<Vec<String>> for Uppercase {
///     fn provide(&self, host: &mut Vec<String>, block: &Block<'_, Vec<String>>) -> Result<(), ShouldaError> {
///         host.push("UPPER".to_string());
///         block(host)
///     }
/// }
/// ```
pub trait ContextProvider<H> {
    /// Establish the context on `host` and run `block` within it
    fn provide(&self, host: &mut H, block: &Block<'_, H>) -> Result<(), ShouldaError>;
}

impl<H, F> ContextProvider<H> for F
where
    F: Fn(&mut H, &Block<'_, H>) -> Result<(), ShouldaError>,
{
    fn provide(&self, host: &mut H, block: &Block<'_, H>) -> Result<(), ShouldaError> {
        self(host, block)
    }
}

/// What happens to a name nobody can resolve
///
/// The default, [`RaiseUnresolved`], fails with
/// [`ShouldaError::UnresolvedName`]. Hosts with their own notion of a
/// missing name plug in a different fallback with
/// [`ContextRegistry::with_fallback`].
pub trait Fallback<H> {
    /// Handle `name`, which is neither a registered provider nor composite
    fn unresolved(
        &self,
        host: &mut H,
        name: &str,
        args: &[Value],
        block: Option<&Block<'_, H>>,
    ) -> Result<Expansion, ShouldaError>;
}

impl<H, F> Fallback<H> for F
where
    F: Fn(&mut H, &str, &[Value], Option<&Block<'_, H>>) -> Result<Expansion, ShouldaError>,
{
    fn unresolved(
        &self,
        host: &mut H,
        name: &str,
        args: &[Value],
        block: Option<&Block<'_, H>>,
    ) -> Result<Expansion, ShouldaError> {
        self(host, name, args, block)
    }
}

/// Default fallback: every unresolvable name is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct RaiseUnresolved;

impl<H> Fallback<H> for RaiseUnresolved {
    fn unresolved(
        &self,
        _host: &mut H,
        name: &str,
        _args: &[Value],
        _block: Option<&Block<'_, H>>,
    ) -> Result<Expansion, ShouldaError> {
        Err(ShouldaError::unresolved(name))
    }
}

/// Registry mapping `with_<context>` names to providers
///
/// The registry is filled while contexts are being defined and only read
/// during dispatch, so providers may call back into it to expand nested
/// composite names.
///
/// # Example
///
/// ```rust
/// use shoulda::{ContextRegistry, ShouldaError};
///
/// let registry = ContextRegistry::<Vec<String>>::new()
///     .provider("string", |host: &mut Vec<String>, block| {
///         host.push("string".to_string());
///         block(host)
///     })?
///     .provider("symbol", |host: &mut Vec<String>, block| {
///         host.push("symbol".to_string());
///         block(host)
///     })?;
///
/// let block = |_host: &mut Vec<String>| -> Result<(), ShouldaError> { Ok(()) };
/// let mut host = Vec::new();
/// registry.call(&mut host, "with_string_or_symbol", &[], Some(&block))?;
/// assert_eq!(host, ["string", "symbol"]);
/// # Ok::<(), ShouldaError>(())
/// ```
pub struct ContextRegistry<H> {
    providers: BTreeMap<String, Box<dyn ContextProvider<H>>>,
    fallback: Box<dyn Fallback<H>>,
    policy: ExpansionPolicy,
}

impl<H> ContextRegistry<H> {
    /// Create an empty registry with the default fallback and policy
    pub fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
            fallback: Box::new(RaiseUnresolved),
            policy: ExpansionPolicy::default(),
        }
    }

    /// Create an empty registry using the configured expansion policy
    pub fn from_config(config: &ShouldaConfig) -> Self {
        Self::new().with_policy(config.expansion_policy)
    }

    /// Register a provider for `context`, reachable as `with_<context>`
    ///
    /// Fails if the context name is invalid or already registered.
    pub fn register<P>(&mut self, context: &str, provider: P) -> Result<(), ShouldaError>
    where
        P: ContextProvider<H> + 'static,
    {
        let context = ContextName::parse(context)?;
        let name = context.provider_name();
        if self.providers.contains_key(&name) {
            return Err(ShouldaError::duplicate_provider(name));
        }

        tracing::trace!(provider = %name, "registered context provider");
        self.providers.insert(name, Box::new(provider));
        Ok(())
    }

    /// Builder-style [`register`](Self::register) taking a closure
    pub fn provider<F>(mut self, context: &str, provider: F) -> Result<Self, ShouldaError>
    where
        F: Fn(&mut H, &Block<'_, H>) -> Result<(), ShouldaError> + 'static,
    {
        self.register(context, provider)?;
        Ok(self)
    }

    /// Replace the fallback used for names nobody can resolve
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fallback<H> + 'static,
    {
        self.fallback = Box::new(fallback);
        self
    }

    /// Choose how missing constituent providers are handled
    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The expansion policy in effect
    pub fn policy(&self) -> ExpansionPolicy {
        self.policy
    }

    /// Look up a provider by its full name (`with_<context>`)
    pub fn get(&self, name: &str) -> Option<&dyn ContextProvider<H>> {
        self.providers.get(name).map(|p| p.as_ref())
    }

    /// Check if a provider is registered under the full name
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if no providers are registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The composite-name expander over this registry
    pub fn expander(&self) -> ContextExpander<'_, H> {
        ContextExpander::new(self)
    }

    /// Resolve and invoke `name`
    ///
    /// A provider registered under `name` itself always wins and requires a
    /// block. Only when no provider matches is the name handed to
    /// [`ContextExpander::dispatch`], which expands composite names and
    /// forwards everything else to the fallback.
    pub fn call(
        &self,
        host: &mut H,
        name: &str,
        args: &[Value],
        block: Option<&Block<'_, H>>,
    ) -> Result<Expansion, ShouldaError> {
        match self.providers.get(name) {
            Some(provider) => {
                let block = block.ok_or_else(|| ShouldaError::missing_block(name))?;
                provider.provide(host, block)?;
                Ok(Expansion::from_providers(vec![name.to_string()]))
            }
            None => self.expander().dispatch(host, name, args, block),
        }
    }

    pub(crate) fn fallback(&self) -> &dyn Fallback<H> {
        self.fallback.as_ref()
    }
}

impl<H> Default for ContextRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> std::fmt::Debug for ContextRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("providers", &self.names())
            .field("policy", &self.policy)
            .finish()
    }
}
