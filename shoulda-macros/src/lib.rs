//! Procedural macros for shoulda-rs
//!
//! Provides `suite!`, which wires a shoulda suite into the standard test
//! harness as a single `#[test]` function.

use proc_macro::TokenStream;

mod suite;

/// Define a suite and run it as one `#[test]`
///
/// The generated test initializes logging, builds the suite, runs every
/// test case and panics with a summary if any of them failed. A suite that
/// cannot be defined (unknown context provider, duplicate test names, ...)
/// panics with the definition error.
///
/// # Examples
///
/// ## Plain suite:
/// ```rust,ignore
/// use shoulda::{expect, suite};
///
/// #[derive(Default)]
/// struct State {
///     value: u32,
/// }
///
/// suite!("Counter", State, |s| {
///     s.context("after one increment", |c| {
///         c.setup(|state| state.value += 1);
///         c.should("be one", |state| expect!(state.value).to_equal(1));
///         Ok(())
///     })
/// });
/// ```
///
/// ## With context providers:
/// ```rust,ignore
/// suite!("Foo", State, registry = providers(), |s| {
///     s.with_contexts("with_string_or_symbol", |c| {
///         c.should("be set", |state| expect!(state.foo.is_empty()).to_be_false());
///         Ok(())
///     })?;
///     Ok(())
/// });
/// ```
///
/// The test function is named after the suite in snake_case
/// (`"MultipleContexts"` becomes `fn multiple_contexts()`).
#[proc_macro]
pub fn suite(input: TokenStream) -> TokenStream {
    suite::suite_impl(input)
}
