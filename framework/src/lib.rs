//! Shoulda-style test definitions for Rust
//!
//! Run the same block of tests under several named contexts by joining
//! context names with `_or_`:
//!
//! ```rust
//! use shoulda::{expect, SuiteBuilder, SuiteRegistry};
//!
//! #[derive(Default)]
//! struct State {
//!     foo: String,
//! }
//!
//! let registry = SuiteRegistry::<State>::new()
//!     .provider("string", |c, block| {
//!         c.context("with string", |c| {
//!             c.setup(|s| s.foo = "foo".to_string());
//!             block(c)
//!         })
//!     })?
//!     .provider("symbol", |c, block| {
//!         c.context("with symbol", |c| {
//!             c.setup(|s| s.foo = ":foo".to_string());
//!             block(c)
//!         })
//!     })?;
//!
//! let mut suite = SuiteBuilder::with_registry("Foo", registry);
//! suite.define(|s| {
//!     s.with_contexts("with_string_or_symbol", |c| {
//!         c.context("#to_s", |c| {
//!             c.should("contain foo", |s| expect!(s.foo.as_str()).to_contain("foo"));
//!             Ok(())
//!         })
//!     })?;
//!     Ok(())
//! });
//!
//! let report = suite.build()?.run();
//! assert_eq!(
//!     report.names(),
//!     [
//!         "test: with string #to_s should contain foo. ",
//!         "test: with symbol #to_s should contain foo. ",
//!     ]
//! );
//! # Ok::<(), shoulda::ShouldaError>(())
//! ```

pub mod config;
pub mod contexts;
pub mod error;
pub mod logging;
pub mod suite;
pub mod testing;

pub use config::ShouldaConfig;
pub use contexts::{
    Block, CompositeName, ContextExpander, ContextName, ContextProvider, ContextRegistry,
    Expansion, ExpansionPolicy, Fallback, RaiseUnresolved,
};
pub use error::ShouldaError;
pub use suite::{
    ContextBuilder, Suite, SuiteBuilder, SuiteRegistry, SuiteReport, TestCase, TestOutcome,
    TestResult,
};
pub use testing::{AssertionFailure, AssertionResult, Expect};

pub use shoulda_macros::suite;
