use shoulda::{
    expect, suite, Block, CompositeName, ContextBuilder, ContextRegistry, Expansion,
    ExpansionPolicy, ShouldaError,
};

/// Host handed to the providers under test
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
    block_runs: usize,
}

#[derive(Default)]
struct State {
    method: &'static str,
    provided: Vec<&'static str>,
    policy: ExpansionPolicy,
    block_given: bool,
    calls: Vec<String>,
    block_runs: usize,
    result: Option<Result<Expansion, ShouldaError>>,
    parsed: Option<CompositeName>,
}

fn dispatch(state: &mut State) {
    let mut registry = ContextRegistry::<Recorder>::new().with_policy(state.policy);
    for context in &state.provided {
        let name = format!("with_{}", context);
        registry = registry
            .provider(context, move |host: &mut Recorder, block| {
                host.calls.push(name.clone());
                block(host)
            })
            .expect("context names in this suite are valid");
    }

    let block = |host: &mut Recorder| -> Result<(), ShouldaError> {
        host.block_runs += 1;
        Ok(())
    };
    let block: &Block<'_, Recorder> = &block;

    let mut host = Recorder::default();
    let result = registry.expander().dispatch(
        &mut host,
        state.method,
        &[],
        state.block_given.then_some(block),
    );

    state.calls = host.calls;
    state.block_runs = host.block_runs;
    state.result = Some(result);
}

fn should_match_composite(
    c: &mut ContextBuilder<State>,
    name: &'static str,
    contexts: &'static [&'static str],
) -> Result<(), ShouldaError> {
    c.context(format!("matching {:?}", name), |c| {
        c.evaluate(move |s| s.parsed = CompositeName::parse(name));
        c.should("match", |s| expect!(s.parsed.is_some()).to_be_true());
        c.should(format!("capture contexts {:?}", contexts), move |s| {
            let captured = s
                .parsed
                .as_ref()
                .map(|p| p.contexts().to_vec())
                .unwrap_or_default();
            expect!(captured).to_equal(contexts.iter().map(|c| c.to_string()).collect())
        });
        Ok(())
    })
}

fn should_not_match_composite(
    c: &mut ContextBuilder<State>,
    name: &'static str,
) -> Result<(), ShouldaError> {
    c.context(format!("not matching {:?}", name), |c| {
        c.evaluate(move |s| s.parsed = CompositeName::parse(name));
        c.should("not match", |s| expect!(s.parsed.is_none()).to_be_true());
        Ok(())
    })
}

suite!("MultipleContexts", State, |s| {
    s.should("pass truthitest", |_| Ok(()));

    s.context("#dispatch", |c| {
        c.setup(|s| s.block_given = true);
        c.evaluate(dispatch);

        c.context("for 'with_foo_or_bar'", |c| {
            c.setup(|s| {
                s.method = "with_foo_or_bar";
                s.provided = vec!["foo", "bar"];
            });
            c.should("recognize the contexts", |s| {
                expect!(s.calls.clone()).to_equal(vec!["with_foo".to_string(), "with_bar".to_string()])
            });
            c.should("forward the block", |s| expect!(s.block_runs).to_equal(2));
            c.should("report the expansion", |s| {
                let providers = s
                    .result
                    .as_ref()
                    .and_then(|r| r.as_ref().ok())
                    .map(|e| e.providers().to_vec())
                    .unwrap_or_default();
                expect!(providers).to_have_length(2)
            });
            Ok(())
        })?;

        c.context("with two contexts", |c| {
            c.setup(|s| {
                s.method = "with_foo_or_bar_zeta";
                s.provided = vec!["foo", "bar_zeta"];
            });
            c.should("invoke 'with_foo' then 'with_bar_zeta'", |s| {
                expect!(s.calls.clone())
                    .to_equal(vec!["with_foo".to_string(), "with_bar_zeta".to_string()])
            });
            Ok(())
        })?;

        c.context("without a block", |c| {
            c.setup(|s| {
                s.method = "with_foo_or_bar";
                s.provided = vec!["foo", "bar"];
                s.block_given = false;
            });
            c.should("fail with a missing block", |s| {
                expect!(s.result.clone())
                    .to_equal(Some(Err(ShouldaError::missing_block("with_foo_or_bar"))))
            });
            c.should("not invoke any provider", |s| expect!(s.calls.clone()).to_be_empty());
            Ok(())
        })?;

        c.context("with a missing constituent", |c| {
            c.setup(|s| {
                s.method = "with_foo_or_bar";
                s.provided = vec!["foo"];
            });
            c.should("name the missing provider", |s| {
                expect!(s.result.clone()).to_equal(Some(Err(ShouldaError::unresolved("with_bar"))))
            });

            c.context("failing fast", |c| {
                c.should("have invoked 'with_foo' first", |s| {
                    expect!(s.calls.clone()).to_equal(vec!["with_foo".to_string()])
                });
                Ok(())
            })?;

            c.context("validating first", |c| {
                c.setup(|s| s.policy = ExpansionPolicy::ValidateFirst);
                c.should("not invoke any provider", |s| expect!(s.calls.clone()).to_be_empty());
                Ok(())
            })
        })?;

        c.context("for 'with_foo'", |c| {
            c.setup(|s| {
                s.method = "with_foo";
                s.provided = vec!["foo"];
            });
            c.should("fall through to the fallback", |s| {
                expect!(s.result.clone()).to_equal(Some(Err(ShouldaError::unresolved("with_foo"))))
            });
            c.should("not invoke 'with_foo'", |s| expect!(s.calls.clone()).to_be_empty());
            Ok(())
        })
    })?;

    s.context("#composite_name", |c| {
        should_match_composite(c, "with_foo_or_bar", &["foo", "bar"])?;
        should_not_match_composite(c, "with_foo")?;
        should_match_composite(c, "with_foo_or_bar_or_zeta", &["foo", "bar", "zeta"])?;
        should_not_match_composite(c, "with_1foo_or_bar")
    })
});
