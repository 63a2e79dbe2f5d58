//! Results of a suite run

use crate::testing::{AssertionFailure, AssertionResult};
use serde::Serialize;

/// How a single test ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    /// Every expectation held
    Passed,
    /// An expectation failed
    Failed {
        /// Matcher output
        message: String,
        /// Where the failing `expect!` was written
        location: Option<String>,
    },
    /// A hook or the body panicked
    Errored {
        /// Panic message
        message: String,
    },
}

impl TestOutcome {
    /// Check if the test passed
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl From<AssertionFailure> for TestOutcome {
    fn from(failure: AssertionFailure) -> Self {
        Self::Failed {
            message: failure.message,
            location: failure.location,
        }
    }
}

impl From<AssertionResult> for TestOutcome {
    fn from(result: AssertionResult) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(failure) => failure.into(),
        }
    }
}

/// Outcome of one named test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    /// Full test name
    pub name: String,
    /// How it ended
    #[serde(flatten)]
    pub outcome: TestOutcome,
}

/// Outcome of a whole suite run
///
/// # Example
///
/// ```rust
/// use shoulda::SuiteBuilder;
///
/// let mut suite = SuiteBuilder::<()>::new("Report");
/// suite.define(|s| {
///     s.should("pass", |_| Ok(()));
///     Ok(())
/// });
///
/// let report = suite.build().unwrap().run();
/// assert!(report.is_success());
/// assert_eq!(report.to_json()["passed"], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    suite: String,
    passed: usize,
    failed: usize,
    errored: usize,
    results: Vec<TestResult>,
}

impl SuiteReport {
    pub(crate) fn new(suite: String, results: Vec<TestResult>) -> Self {
        let count = |pred: fn(&TestOutcome) -> bool| results.iter().filter(|r| pred(&r.outcome)).count();
        let passed = count(|o| matches!(o, TestOutcome::Passed));
        let failed = count(|o| matches!(o, TestOutcome::Failed { .. }));
        let errored = count(|o| matches!(o, TestOutcome::Errored { .. }));

        Self {
            suite,
            passed,
            failed,
            errored,
            results,
        }
    }

    /// Suite name
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Per-test results in execution order
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Names of the tests that ran, in execution order
    pub fn names(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.name.as_str()).collect()
    }

    /// Outcome of the named test, if it ran
    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.results.iter().find(|r| r.name == name).map(|r| &r.outcome)
    }

    /// Number of passed tests
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failed tests
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Number of errored tests
    pub fn errored(&self) -> usize {
        self.errored
    }

    /// Check if every test passed
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Results that did not pass
    pub fn problems(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.outcome.is_passed()).collect()
    }

    /// Convert to JSON Value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }

    /// One line per test plus a totals line
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let status = match &result.outcome {
                TestOutcome::Passed => "ok",
                TestOutcome::Failed { .. } => "FAILED",
                TestOutcome::Errored { .. } => "ERROR",
            };
            out.push_str(&format!("{} ... {}\n", result.name.trim_end(), status));
        }
        out.push_str(&format!(
            "\n{}: {} passed, {} failed, {} errored\n",
            self.suite, self.passed, self.failed, self.errored
        ));
        out
    }

    /// Panic with every failure message unless the whole suite passed
    ///
    /// Used by the `suite!` macro to turn a suite into a single `#[test]`.
    pub fn assert_passed(&self) {
        if self.is_success() {
            return;
        }

        let mut details = String::new();
        for problem in self.problems() {
            match &problem.outcome {
                TestOutcome::Failed { message, location } => {
                    details.push_str(&format!("\n{}\n", problem.name));
                    if let Some(location) = location {
                        details.push_str(&format!("  at {}\n", location));
                    }
                    details.push_str(message);
                }
                TestOutcome::Errored { message } => {
                    details.push_str(&format!("\n{}\n  panicked: {}\n", problem.name, message));
                }
                TestOutcome::Passed => {}
            }
        }

        panic!("{}{}", self.summary(), details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> SuiteReport {
        SuiteReport::new(
            "Sample".to_string(),
            vec![
                TestResult {
                    name: "test: a should pass. ".to_string(),
                    outcome: TestOutcome::Passed,
                },
                TestResult {
                    name: "test: a should fail. ".to_string(),
                    outcome: TestOutcome::Failed {
                        message: "Expected: 1".to_string(),
                        location: Some("src/lib.rs:1".to_string()),
                    },
                },
            ],
        )
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.errored(), 0);
        assert!(!report.is_success());
        assert_eq!(report.problems().len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json();
        assert_eq!(json["suite"], "Sample");
        assert_eq!(json["results"][0]["status"], "passed");
        assert_eq!(json["results"][1]["status"], "failed");
        assert_eq!(json["results"][1]["location"], "src/lib.rs:1");
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            report().summary(),
            "test: a should pass. ... ok\ntest: a should fail. ... FAILED\n\nSample: 1 passed, 1 failed, 0 errored\n"
        );
    }

    #[test]
    #[should_panic(expected = "Expected: 1")]
    fn test_assert_passed_panics_with_details() {
        report().assert_passed();
    }
}
