//! Execution phase: run the frozen test cases

use super::builder::{Body, Hook};
use super::report::{SuiteReport, TestOutcome, TestResult};
use crate::testing::{set_current_test_name, AssertionResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// One flattened test: its full name, hook chain and body
pub struct TestCase<S> {
    name: String,
    context: String,
    should: String,
    setups: Vec<Hook<S>>,
    evaluates: Vec<Hook<S>>,
    body: Body<S>,
}

impl<S: Default> TestCase<S> {
    pub(crate) fn new(
        context: String,
        should: String,
        setups: Vec<Hook<S>>,
        evaluates: Vec<Hook<S>>,
        body: Body<S>,
    ) -> Self {
        Self {
            name: format!("test: {} should {}. ", context, should),
            context,
            should,
            setups,
            evaluates,
            body,
        }
    }

    /// Full test name, e.g. `test: with string #to_s should be a string. `
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Context chain the test was defined in
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The should-block's own name
    pub fn should(&self) -> &str {
        &self.should
    }

    fn execute(&self) -> AssertionResult {
        let mut state = S::default();
        for setup in &self.setups {
            setup(&mut state);
        }
        for evaluate in &self.evaluates {
            evaluate(&mut state);
        }
        (self.body)(&mut state)
    }

    /// Run the test against a fresh state
    ///
    /// With `catch_panics`, a panicking hook or body is reported as
    /// [`TestOutcome::Errored`] instead of unwinding into the caller.
    pub fn run(&self, catch_panics: bool) -> TestOutcome {
        let _name = CurrentTestName::set(&self.name);

        if catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| self.execute())) {
                Ok(result) => TestOutcome::from(result),
                Err(payload) => TestOutcome::Errored {
                    message: panic_message(payload.as_ref()),
                },
            }
        } else {
            TestOutcome::from(self.execute())
        }
    }
}

/// Holds the thread's current test name until dropped, even on unwind
struct CurrentTestName;

impl CurrentTestName {
    fn set(name: &str) -> Self {
        set_current_test_name(Some(name.to_string()));
        Self
    }
}

impl Drop for CurrentTestName {
    fn drop(&mut self) {
        set_current_test_name(None);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "test panicked with a non-string payload".to_string()
    }
}

/// A frozen suite, ready to run
///
/// Nothing can be added once built; running it any number of times
/// executes the same cases in definition order.
pub struct Suite<S> {
    name: String,
    cases: Vec<TestCase<S>>,
    catch_panics: bool,
}

impl<S: Default> Suite<S> {
    pub(crate) fn new(name: String, cases: Vec<TestCase<S>>, catch_panics: bool) -> Self {
        Self {
            name,
            cases,
            catch_panics,
        }
    }

    /// Suite name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All test cases in definition order
    pub fn cases(&self) -> &[TestCase<S>] {
        &self.cases
    }

    /// Full names of all test cases
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(TestCase::name).collect()
    }

    /// Find a test case by full name
    pub fn find(&self, name: &str) -> Option<&TestCase<S>> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// Number of test cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Check if the suite has no test cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run every test case
    pub fn run(&self) -> SuiteReport {
        self.run_matching(|_| true)
    }

    /// Run the test cases whose full name contains `pattern`
    pub fn run_filtered(&self, pattern: &str) -> SuiteReport {
        self.run_matching(|case| case.name.contains(pattern))
    }

    fn run_matching<F>(&self, selected: F) -> SuiteReport
    where
        F: Fn(&TestCase<S>) -> bool,
    {
        let mut results = Vec::new();

        for case in self.cases.iter().filter(|&case| selected(case)) {
            let outcome = case.run(self.catch_panics);
            match &outcome {
                TestOutcome::Passed => tracing::info!(test = %case.name, "passed"),
                TestOutcome::Failed { message, .. } => {
                    tracing::warn!(test = %case.name, %message, "failed")
                }
                TestOutcome::Errored { message } => {
                    tracing::warn!(test = %case.name, %message, "errored")
                }
            }
            results.push(TestResult {
                name: case.name.clone(),
                outcome,
            });
        }

        let report = SuiteReport::new(self.name.clone(), results);
        tracing::info!(
            suite = %self.name,
            passed = report.passed(),
            failed = report.failed(),
            errored = report.errored(),
            "suite finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{current_test_name, fail};
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        value: u32,
    }

    fn body<F>(f: F) -> Body<Counter>
    where
        F: Fn(&mut Counter) -> AssertionResult + 'static,
    {
        Rc::new(f)
    }

    fn case(should: &str, body: Body<Counter>) -> TestCase<Counter> {
        let setup: Hook<Counter> = Rc::new(|c: &mut Counter| c.value += 1);
        TestCase::new("counter".to_string(), should.to_string(), vec![setup], Vec::new(), body)
    }

    #[test]
    fn test_case_name_format() {
        let case = case("count", body(|_| Ok(())));
        assert_eq!(case.name(), "test: counter should count. ");
        assert_eq!(case.context(), "counter");
        assert_eq!(case.should(), "count");
    }

    #[test]
    fn test_each_run_gets_fresh_state() {
        let case = case(
            "start from one",
            body(|c| {
                if c.value == 1 {
                    Ok(())
                } else {
                    fail(format!("value was {}", c.value))
                }
            }),
        );

        assert_eq!(case.run(true), TestOutcome::Passed);
        assert_eq!(case.run(true), TestOutcome::Passed);
    }

    #[test]
    fn test_failure_is_reported() {
        let case = case("fail", body(|_| fail("nope")));
        match case.run(true) {
            TestOutcome::Failed { message, .. } => assert_eq!(message, "nope"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_panic_is_caught() {
        let case = case("panic", body(|_| panic!("kaboom")));
        assert_eq!(
            case.run(true),
            TestOutcome::Errored {
                message: "kaboom".to_string()
            }
        );
    }

    #[test]
    fn test_name_is_cleared_after_run() {
        let case = case("pass", body(|_| expect_name("test: counter should pass. ")));
        assert_eq!(case.run(true), TestOutcome::Passed);
        assert_eq!(current_test_name(), None);
    }

    #[test]
    fn test_name_is_cleared_when_panic_escapes() {
        let case = case("panic", body(|_| panic!("kaboom")));
        let escaped = panic::catch_unwind(AssertUnwindSafe(|| case.run(false)));

        assert!(escaped.is_err());
        assert_eq!(current_test_name(), None);
    }

    fn expect_name(expected: &str) -> AssertionResult {
        match current_test_name() {
            Some(name) if name == expected => Ok(()),
            other => fail(format!("current test name was {:?}", other)),
        }
    }

    #[test]
    fn test_run_filtered() {
        let suite = Suite::new(
            "Counter".to_string(),
            vec![
                case("one", body(|_| Ok(()))),
                case("two", body(|_| Ok(()))),
            ],
            true,
        );

        let report = suite.run_filtered("two");
        assert_eq!(report.names(), ["test: counter should two. "]);
        assert_eq!(suite.len(), 2);
        assert!(suite.find("test: counter should one. ").is_some());
    }
}
