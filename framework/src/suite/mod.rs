//! Test suites built from contexts and should-blocks
//!
//! A suite is defined in two phases:
//!
//! 1. **Definition** - [`SuiteBuilder`] and [`ContextBuilder`] collect
//!    contexts, `setup`/`evaluate` hooks and `should` blocks. Context
//!    providers from a [`SuiteRegistry`] can be applied with
//!    `with_contexts`, including composite names such as
//!    `with_string_or_symbol`.
//! 2. **Execution** - [`SuiteBuilder::build`] freezes everything into a
//!    [`Suite`] of flattened [`TestCase`]s, which [`Suite::run`] executes
//!    against a fresh state per test.
//!
//! Test names follow the `test: <contexts> should <name>. ` convention.
//!
//! # Example
//!
//! ```rust
//! use shoulda::{expect, SuiteBuilder};
//!
//! #[derive(Default)]
//! struct State {
//!     items: Vec<u32>,
//! }
//!
//! let mut suite = SuiteBuilder::<State>::new("Stack");
//! suite.define(|s| {
//!     s.context("with one item", |c| {
//!         c.setup(|state| state.items.push(1));
//!         c.should("not be empty", |state| expect!(state.items.clone()).to_have_length(1));
//!         Ok(())
//!     })
//! });
//!
//! suite.build().unwrap().run().assert_passed();
//! ```

mod builder;
mod report;
mod runner;

pub use builder::{ContextBuilder, SuiteBuilder, SuiteRegistry};
pub use report::{SuiteReport, TestOutcome, TestResult};
pub use runner::{Suite, TestCase};
