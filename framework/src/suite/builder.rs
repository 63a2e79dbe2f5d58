//! Definition phase: collect contexts, setups and should-blocks

use super::runner::{Suite, TestCase};
use crate::config::ShouldaConfig;
use crate::contexts::{Block, ContextRegistry, Expansion};
use crate::error::ShouldaError;
use crate::testing::AssertionResult;
use std::collections::HashSet;
use std::rc::Rc;

/// Setup or evaluate hook run against a fresh test state
pub(crate) type Hook<S> = Rc<dyn Fn(&mut S)>;

/// Body of a should-block
pub(crate) type Body<S> = Rc<dyn Fn(&mut S) -> AssertionResult>;

/// Registry whose providers define contexts on a [`ContextBuilder`]
pub type SuiteRegistry<S> = ContextRegistry<ContextBuilder<S>>;

enum Item<S> {
    Should { name: String, body: Body<S> },
    Context(ContextBuilder<S>),
}

/// One context being defined
///
/// Everything registered here applies to the tests of this context and of
/// every nested context.
///
/// # Example
///
/// ```rust
/// use shoulda::{expect, SuiteBuilder};
///
/// #[derive(Default)]
/// struct State {
///     value: String,
/// }
///
/// let mut suite = SuiteBuilder::<State>::new("Greeting");
/// suite.define(|s| {
///     s.context("with a name", |c| {
///         c.setup(|state| state.value = "hello bob".to_string());
///         c.should("mention the name", |state| expect!(state.value.as_str()).to_contain("bob"));
///         Ok(())
///     })
/// });
///
/// let report = suite.build().unwrap().run();
/// assert_eq!(report.names(), ["test: with a name should mention the name. "]);
/// ```
pub struct ContextBuilder<S> {
    name: Option<String>,
    setups: Vec<Hook<S>>,
    evaluates: Vec<Hook<S>>,
    items: Vec<Item<S>>,
    registry: Rc<SuiteRegistry<S>>,
}

impl<S: Default + 'static> ContextBuilder<S> {
    fn new(name: Option<String>, registry: Rc<SuiteRegistry<S>>) -> Self {
        Self {
            name,
            setups: Vec::new(),
            evaluates: Vec::new(),
            items: Vec::new(),
            registry,
        }
    }

    /// Name of this context (`None` for the suite root)
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Define a nested context
    ///
    /// Nested names are joined with spaces in the final test names.
    pub fn context<F>(&mut self, name: impl Into<String>, define: F) -> Result<(), ShouldaError>
    where
        F: FnOnce(&mut ContextBuilder<S>) -> Result<(), ShouldaError>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ShouldaError::definition("context name must not be empty"));
        }

        let mut child = ContextBuilder::new(Some(name), Rc::clone(&self.registry));
        define(&mut child)?;
        self.items.push(Item::Context(child));
        Ok(())
    }

    /// Run `f` before every test in this context, after the parent's setups
    pub fn setup<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut S) + 'static,
    {
        self.setups.push(Rc::new(f));
        self
    }

    /// Run `f` once every setup of the test's context chain has run
    ///
    /// Lets an outer context act on state that nested contexts prepare.
    /// Evaluates run outer-to-inner, like setups.
    pub fn evaluate<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut S) + 'static,
    {
        self.evaluates.push(Rc::new(f));
        self
    }

    /// Register a test
    pub fn should<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut S) -> AssertionResult + 'static,
    {
        self.items.push(Item::Should {
            name: name.into(),
            body: Rc::new(body),
        });
        self
    }

    /// Run `block` through the registry under `name`
    ///
    /// `with_string` runs it in the `string` context;
    /// `with_string_or_symbol` runs it once per context.
    pub fn with_contexts<F>(&mut self, name: &str, block: F) -> Result<Expansion, ShouldaError>
    where
        F: Fn(&mut ContextBuilder<S>) -> Result<(), ShouldaError>,
    {
        let registry = Rc::clone(&self.registry);
        let block: &Block<'_, Self> = &block;
        registry.call(self, name, &[], Some(block))
    }

    /// Registry the context names are resolved against
    pub fn contexts(&self) -> &SuiteRegistry<S> {
        &self.registry
    }

    fn collect(
        &self,
        suite_name: &str,
        chain: &mut Vec<String>,
        setups: &mut Vec<Hook<S>>,
        evaluates: &mut Vec<Hook<S>>,
        cases: &mut Vec<TestCase<S>>,
    ) -> Result<(), ShouldaError> {
        let pushed = match &self.name {
            Some(name) => {
                chain.push(name.clone());
                true
            }
            None => false,
        };
        let setup_mark = setups.len();
        let evaluate_mark = evaluates.len();
        setups.extend(self.setups.iter().cloned());
        evaluates.extend(self.evaluates.iter().cloned());

        for item in &self.items {
            match item {
                Item::Should { name, body } => {
                    if name.trim().is_empty() {
                        return Err(ShouldaError::definition("should-block name must not be empty"));
                    }
                    let context = if chain.is_empty() {
                        suite_name.to_string()
                    } else {
                        chain.join(" ")
                    };
                    cases.push(TestCase::new(
                        context,
                        name.clone(),
                        setups.clone(),
                        evaluates.clone(),
                        Rc::clone(body),
                    ));
                }
                Item::Context(child) => {
                    child.collect(suite_name, chain, setups, evaluates, cases)?;
                }
            }
        }

        setups.truncate(setup_mark);
        evaluates.truncate(evaluate_mark);
        if pushed {
            chain.pop();
        }
        Ok(())
    }
}

/// Collects a suite's definitions, then freezes them into a [`Suite`]
///
/// The first definition error is kept and returned by
/// [`build`](Self::build); later `define` calls are skipped.
///
/// # Example
///
/// ```rust
/// use shoulda::{expect, SuiteBuilder, SuiteRegistry};
///
/// #[derive(Default)]
/// struct State {
///     foo: String,
/// }
///
/// let registry = SuiteRegistry::<State>::new()
///     .provider("string", |c, block| {
///         c.context("with string", |c| {
///             c.setup(|s| s.foo = "foo".to_string());
///             block(c)
///         })
///     })?
///     .provider("symbol", |c, block| {
///         c.context("with symbol", |c| {
///             c.setup(|s| s.foo = "bar".to_string());
///             block(c)
///         })
///     })?;
///
/// let mut suite = SuiteBuilder::with_registry("Foo", registry);
/// suite.define(|s| {
///     s.with_contexts("with_string_or_symbol", |c| {
///         c.should("be lowercase", |s| expect!(s.foo.clone()).to_equal(s.foo.to_lowercase()));
///         Ok(())
///     })?;
///     Ok(())
/// });
///
/// let report = suite.build()?.run();
/// assert_eq!(
///     report.names(),
///     ["test: with string should be lowercase. ", "test: with symbol should be lowercase. "]
/// );
/// report.assert_passed();
/// # Ok::<(), shoulda::ShouldaError>(())
/// ```
pub struct SuiteBuilder<S> {
    name: String,
    root: ContextBuilder<S>,
    config: ShouldaConfig,
    error: Option<ShouldaError>,
}

impl<S: Default + 'static> SuiteBuilder<S> {
    /// Create a suite using the current config and an empty registry
    pub fn new(name: impl Into<String>) -> Self {
        let config = ShouldaConfig::current();
        let registry = ContextRegistry::from_config(&config);
        Self::build_with(name.into(), registry, config)
    }

    /// Create a suite whose contexts resolve against `registry`
    pub fn with_registry(name: impl Into<String>, registry: SuiteRegistry<S>) -> Self {
        Self::build_with(name.into(), registry, ShouldaConfig::current())
    }

    fn build_with(name: String, registry: SuiteRegistry<S>, config: ShouldaConfig) -> Self {
        Self {
            name,
            root: ContextBuilder::new(None, Rc::new(registry)),
            config,
            error: None,
        }
    }

    /// Replace the config used when the suite runs
    pub fn config(mut self, config: ShouldaConfig) -> Self {
        self.config = config;
        self
    }

    /// Suite name, used for top-level should-blocks
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add definitions to the suite root
    pub fn define<F>(&mut self, define: F) -> &mut Self
    where
        F: FnOnce(&mut ContextBuilder<S>) -> Result<(), ShouldaError>,
    {
        if self.error.is_none() {
            if let Err(e) = define(&mut self.root) {
                tracing::warn!(suite = %self.name, error = %e, "suite definition failed");
                self.error = Some(e);
            }
        }
        self
    }

    /// Direct access to the root context
    pub fn root(&mut self) -> &mut ContextBuilder<S> {
        &mut self.root
    }

    /// Freeze the definitions into a runnable suite
    ///
    /// Fails on the first recorded definition error, on duplicate test
    /// names and on a suite without tests.
    pub fn build(self) -> Result<Suite<S>, ShouldaError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut cases = Vec::new();
        self.root.collect(
            &self.name,
            &mut Vec::new(),
            &mut Vec::new(),
            &mut Vec::new(),
            &mut cases,
        )?;

        if cases.is_empty() {
            return Err(ShouldaError::definition(format!(
                "suite '{}' defines no tests",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for case in &cases {
            if !seen.insert(case.name()) {
                return Err(ShouldaError::definition(format!(
                    "'{}' is defined more than once",
                    case.name()
                )));
            }
        }

        tracing::debug!(suite = %self.name, tests = cases.len(), "suite defined");
        Ok(Suite::new(self.name, cases, self.config.catch_panics))
    }
}
