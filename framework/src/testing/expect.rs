//! Fluent assertion API for should-blocks
//!
//! Matchers return an [`AssertionResult`] instead of panicking, so a
//! should-block can chain them with `?` and the runner reports the first
//! failure with clear expected/received output.

use regex::Regex;
use serde::Serialize;
use std::fmt::{self, Debug};

std::thread_local! {
    /// Thread-local storage for current test name (set by the suite runner)
    pub static CURRENT_TEST_NAME: std::cell::RefCell<Option<String>> = const { std::cell::RefCell::new(None) };
}

/// Set the current test name (called by the suite runner)
pub fn set_current_test_name(name: Option<String>) {
    CURRENT_TEST_NAME.with(|cell| {
        *cell.borrow_mut() = name;
    });
}

/// Get the current test name for error messages
pub fn current_test_name() -> Option<String> {
    CURRENT_TEST_NAME.with(|cell| cell.borrow().clone())
}

/// Outcome of one expectation or of a whole should-block
pub type AssertionResult = Result<(), AssertionFailure>;

/// A failed expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    /// Test that was running when the expectation failed
    pub test: Option<String>,
    /// Source location of the `expect!` call
    pub location: Option<String>,
    /// Matcher description with expected and received values
    pub message: String,
}

impl AssertionFailure {
    /// Create a failure attributed to the currently running test
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            test: current_test_name(),
            location: None,
            message: message.into(),
        }
    }

    /// Attach the source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.test, &self.location) {
            (Some(test), Some(location)) => write!(f, "Test: \"{}\"\n  at {}\n", test, location)?,
            (Some(test), None) => write!(f, "Test: \"{}\"\n", test)?,
            (None, Some(location)) => write!(f, "assertion failed at {}\n", location)?,
            (None, None) => write!(f, "assertion failed\n")?,
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AssertionFailure {}

/// Fail the current should-block with a message
///
/// # Example
/// ```rust
/// use shoulda::testing::{fail, AssertionResult};
///
/// fn check(count: usize) -> AssertionResult {
///     if count > 3 {
///         return fail(format!("too many contexts: {}", count));
///     }
///     Ok(())
/// }
///
/// assert!(check(5).is_err());
/// ```
pub fn fail(message: impl Into<String>) -> AssertionResult {
    Err(AssertionFailure::new(message))
}

/// The main Expect wrapper for fluent assertions
pub struct Expect<T> {
    value: T,
    location: &'static str,
}

impl<T> Expect<T> {
    /// Create a new Expect wrapper (use the expect! macro instead)
    pub fn new(value: T, location: &'static str) -> Self {
        Self { value, location }
    }

    fn check(&self, passed: bool, message: impl FnOnce() -> String) -> AssertionResult {
        if passed {
            Ok(())
        } else {
            Err(AssertionFailure::new(message()).at(self.location))
        }
    }
}

// Equality matchers for Debug + PartialEq types
impl<T: Debug + PartialEq> Expect<T> {
    /// Expect the value to equal the expected value
    ///
    /// # Example
    /// ```rust
    /// use shoulda::expect;
    ///
    /// assert!(expect!(vec!["foo", "bar"]).to_equal(vec!["foo", "bar"]).is_ok());
    /// assert!(expect!(1).to_equal(2).is_err());
    /// ```
    pub fn to_equal(&self, expected: T) -> AssertionResult {
        self.check(self.value == expected, || {
            format!(
                "  expect!(actual).to_equal(expected)\n\n  Expected: {:?}\n  Received: {:?}\n",
                expected, self.value
            )
        })
    }

    /// Expect the value not to equal the unexpected value
    pub fn to_not_equal(&self, unexpected: T) -> AssertionResult {
        self.check(self.value != unexpected, || {
            format!(
                "  expect!(actual).to_not_equal(value)\n\n  Expected NOT: {:?}\n  Received: {:?}\n",
                unexpected, self.value
            )
        })
    }
}

// Boolean matchers
impl Expect<bool> {
    /// Expect the value to be true
    pub fn to_be_true(&self) -> AssertionResult {
        self.check(self.value, || {
            "  expect!(value).to_be_true()\n\n  Expected: true\n  Received: false\n".to_string()
        })
    }

    /// Expect the value to be false
    pub fn to_be_false(&self) -> AssertionResult {
        self.check(!self.value, || {
            "  expect!(value).to_be_false()\n\n  Expected: false\n  Received: true\n".to_string()
        })
    }
}

// Option matchers
impl<T: Debug> Expect<Option<T>> {
    /// Expect the Option to be Some
    pub fn to_be_some(&self) -> AssertionResult {
        self.check(self.value.is_some(), || {
            "  expect!(option).to_be_some()\n\n  Expected: Some(_)\n  Received: None\n".to_string()
        })
    }

    /// Expect the Option to be None
    pub fn to_be_none(&self) -> AssertionResult {
        self.check(self.value.is_none(), || {
            format!(
                "  expect!(option).to_be_none()\n\n  Expected: None\n  Received: {:?}\n",
                self.value
            )
        })
    }
}

// Result matchers
impl<T: Debug, E: Debug> Expect<Result<T, E>> {
    /// Expect the Result to be Ok
    pub fn to_be_ok(&self) -> AssertionResult {
        self.check(self.value.is_ok(), || {
            format!(
                "  expect!(result).to_be_ok()\n\n  Expected: Ok(_)\n  Received: {:?}\n",
                self.value
            )
        })
    }

    /// Expect the Result to be Err
    pub fn to_be_err(&self) -> AssertionResult {
        self.check(self.value.is_err(), || {
            format!(
                "  expect!(result).to_be_err()\n\n  Expected: Err(_)\n  Received: {:?}\n",
                self.value
            )
        })
    }
}

fn contains(value: &str, substring: &str) -> (bool, String) {
    (
        value.contains(substring),
        format!(
            "  expect!(string).to_contain(substring)\n\n  Expected to contain: {:?}\n  Received: {:?}\n",
            substring, value
        ),
    )
}

fn starts_with(value: &str, prefix: &str) -> (bool, String) {
    (
        value.starts_with(prefix),
        format!(
            "  expect!(string).to_start_with(prefix)\n\n  Expected to start with: {:?}\n  Received: {:?}\n",
            prefix, value
        ),
    )
}

fn matches(value: &str, pattern: &str, negate: bool) -> (bool, String) {
    let matcher = if negate { "to_not_match" } else { "to_match" };
    match Regex::new(pattern) {
        Ok(regex) => (
            regex.is_match(value) != negate,
            format!(
                "  expect!(string).{}(pattern)\n\n  Pattern: /{}/\n  Received: {:?}\n",
                matcher, pattern, value
            ),
        ),
        Err(e) => (
            false,
            format!(
                "  expect!(string).{}(pattern)\n\n  Invalid pattern /{}/: {}\n",
                matcher, pattern, e
            ),
        ),
    }
}

// String matchers
impl Expect<String> {
    /// Expect the string to contain the substring
    pub fn to_contain(&self, substring: &str) -> AssertionResult {
        let (passed, message) = contains(&self.value, substring);
        self.check(passed, || message)
    }

    /// Expect the string to start with the prefix
    pub fn to_start_with(&self, prefix: &str) -> AssertionResult {
        let (passed, message) = starts_with(&self.value, prefix);
        self.check(passed, || message)
    }

    /// Expect the string to match a regular expression
    ///
    /// # Example
    /// ```rust
    /// use shoulda::expect;
    ///
    /// assert!(expect!("with_foo_or_bar".to_string()).to_match(r"_or_").is_ok());
    /// ```
    pub fn to_match(&self, pattern: &str) -> AssertionResult {
        let (passed, message) = matches(&self.value, pattern, false);
        self.check(passed, || message)
    }

    /// Expect the string not to match a regular expression
    pub fn to_not_match(&self, pattern: &str) -> AssertionResult {
        let (passed, message) = matches(&self.value, pattern, true);
        self.check(passed, || message)
    }
}

// &str matchers
impl Expect<&str> {
    /// Expect the string to contain the substring
    pub fn to_contain(&self, substring: &str) -> AssertionResult {
        let (passed, message) = contains(self.value, substring);
        self.check(passed, || message)
    }

    /// Expect the string to start with the prefix
    pub fn to_start_with(&self, prefix: &str) -> AssertionResult {
        let (passed, message) = starts_with(self.value, prefix);
        self.check(passed, || message)
    }

    /// Expect the string to match a regular expression
    pub fn to_match(&self, pattern: &str) -> AssertionResult {
        let (passed, message) = matches(self.value, pattern, false);
        self.check(passed, || message)
    }

    /// Expect the string not to match a regular expression
    pub fn to_not_match(&self, pattern: &str) -> AssertionResult {
        let (passed, message) = matches(self.value, pattern, true);
        self.check(passed, || message)
    }
}

// Vec matchers
impl<T: Debug + PartialEq> Expect<Vec<T>> {
    /// Expect the Vec to have the expected length
    pub fn to_have_length(&self, expected: usize) -> AssertionResult {
        self.check(self.value.len() == expected, || {
            format!(
                "  expect!(vec).to_have_length({})\n\n  Expected length: {}\n  Actual length: {}\n  Received: {:?}\n",
                expected,
                expected,
                self.value.len(),
                self.value
            )
        })
    }

    /// Expect the Vec to contain the item
    pub fn to_contain(&self, item: &T) -> AssertionResult {
        self.check(self.value.contains(item), || {
            format!(
                "  expect!(vec).to_contain(item)\n\n  Expected to contain: {:?}\n  Received: {:?}\n",
                item, self.value
            )
        })
    }

    /// Expect the Vec to be empty
    pub fn to_be_empty(&self) -> AssertionResult {
        self.check(self.value.is_empty(), || {
            format!(
                "  expect!(vec).to_be_empty()\n\n  Expected: []\n  Received: {:?}\n",
                self.value
            )
        })
    }
}

/// Wrap a value for fluent assertions, recording the call site
///
/// # Example
/// ```rust
/// use shoulda::expect;
///
/// fn body() -> shoulda::AssertionResult {
///     expect!("with string".to_string()).to_start_with("with")?;
///     expect!(Some(3)).to_be_some()
/// }
///
/// assert!(body().is_ok());
/// ```
#[macro_export]
macro_rules! expect {
    ($value:expr) => {
        $crate::testing::Expect::new($value, concat!(file!(), ":", line!()))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_equal() {
        assert!(expect!(vec!["foo", "bar"]).to_equal(vec!["foo", "bar"]).is_ok());

        let failure = expect!(1).to_equal(2).unwrap_err();
        assert!(failure.message.contains("Expected: 2"));
        assert!(failure.message.contains("Received: 1"));
        assert!(failure.location.unwrap().contains("expect.rs"));
    }

    #[test]
    fn test_failure_carries_test_name() {
        set_current_test_name(Some("test: with string should match. ".to_string()));
        let failure = expect!(false).to_be_true().unwrap_err();
        set_current_test_name(None);

        assert_eq!(failure.test.as_deref(), Some("test: with string should match. "));
        assert!(failure.to_string().starts_with("Test: \"test: with string should match. \""));
    }

    #[test]
    fn test_regex_matchers() {
        assert!(expect!("with_foo_or_bar").to_match(r"^with_\w+_or_\w+$").is_ok());
        assert!(expect!("with_foo").to_not_match(r"_or_").is_ok());
        assert!(expect!("with_foo").to_match(r"_or_").is_err());

        let failure = expect!("anything").to_match("(").unwrap_err();
        assert!(failure.message.contains("Invalid pattern"));
    }

    #[test]
    fn test_option_and_result() {
        assert!(expect!(Some(1)).to_be_some().is_ok());
        assert!(expect!(None::<u8>).to_be_some().is_err());
        assert!(expect!(Ok::<u8, String>(1)).to_be_ok().is_ok());
        assert!(expect!(Err::<u8, String>("no".into())).to_be_ok().is_err());
    }

    #[test]
    fn test_vec_matchers() {
        let contexts = vec!["foo".to_string(), "bar".to_string()];
        assert!(expect!(contexts.clone()).to_have_length(2).is_ok());
        assert!(expect!(contexts.clone()).to_contain(&"bar".to_string()).is_ok());
        assert!(expect!(contexts).to_be_empty().is_err());
    }

    #[test]
    fn test_fail() {
        let failure = fail("boom").unwrap_err();
        assert_eq!(failure.message, "boom");
        assert_eq!(failure.to_string(), "assertion failed\nboom");
    }
}
