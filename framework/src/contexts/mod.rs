//! Multiple contexts support
//!
//! Runs one block of test definitions within several named contexts. Each
//! context is established by a provider registered as `with_<context>`; a
//! composite name joins contexts with `_or_`:
//!
//! - `with_string` runs the block once, inside the `string` context
//! - `with_string_or_symbol` runs it twice, inside `string` then `symbol`
//!
//! Naming convention:
//! - provider names start with `with_`
//! - context names match `[a-zA-Z][a-zA-Z0-9_]*` and never contain `_or_`
//!
//! # Example
//!
//! ```rust
//! use shoulda::{ContextRegistry, ShouldaError};
//!
//! #[derive(Default)]
//! struct Host {
//!     contexts: Vec<&'static str>,
//!     runs: usize,
//! }
//!
//! let registry = ContextRegistry::<Host>::new()
//!     .provider("string", |host: &mut Host, block| {
//!         host.contexts.push("with string");
//!         block(host)
//!     })?
//!     .provider("symbol", |host: &mut Host, block| {
//!         host.contexts.push("with symbol");
//!         block(host)
//!     })?;
//!
//! let block = |host: &mut Host| -> Result<(), ShouldaError> {
//!     host.runs += 1;
//!     Ok(())
//! };
//!
//! let mut host = Host::default();
//! registry.call(&mut host, "with_string_or_symbol", &[], Some(&block))?;
//!
//! assert_eq!(host.contexts, ["with string", "with symbol"]);
//! assert_eq!(host.runs, 2);
//! # Ok::<(), ShouldaError>(())
//! ```

pub mod expander;
pub mod name;
pub mod registry;

pub use expander::{ContextExpander, Expansion, ExpansionPolicy};
pub use name::{provider_name, CompositeName, ContextName, PROVIDER_PREFIX, SEPARATOR};
pub use registry::{ContextProvider, ContextRegistry, Fallback, RaiseUnresolved};

use crate::error::ShouldaError;

/// The caller-supplied block run once per context
///
/// Borrowed for the duration of one dispatch and possibly invoked several
/// times with the host the current provider hands it.
pub type Block<'a, H> = dyn Fn(&mut H) -> Result<(), ShouldaError> + 'a;
