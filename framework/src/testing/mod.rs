//! Testing utilities for should-blocks
//!
//! Provides:
//! - `expect!` macro for fluent assertions that return [`AssertionResult`]
//! - [`fail`] for hand-written checks
//! - the current-test-name slot the suite runner fills for failure messages
//!
//! # Example
//!
//! ```rust
//! use shoulda::{expect, AssertionResult};
//!
//! fn contexts_are_split() -> AssertionResult {
//!     let composite = shoulda::CompositeName::parse("with_foo_or_bar").unwrap();
//!     expect!(composite.contexts().to_vec()).to_equal(vec!["foo".to_string(), "bar".to_string()])
//! }
//!
//! assert!(contexts_are_split().is_ok());
//! ```

mod expect;

pub use expect::{
    current_test_name, fail, set_current_test_name, AssertionFailure, AssertionResult, Expect,
};
