//! Integration tests for before/after hooks

use super::test_utils::{run_all, Journal};
use givens::{CaseError, Spec};
use std::time::Duration;

fn hooked_spec(journal: &Journal) -> Spec {
    let before = journal.clone();
    let after = journal.clone();
    let body = journal.clone();
    Spec::new("Hooks")
        .before_each(move || {
            before.record("before");
            Ok(())
        })
        .after_each(move || {
            after.record("after");
            Ok(())
        })
        .behavior("deep", move |s| {
            let j = body.clone();
            s.when("acting", || Ok(()));
            s.given("level one", j.recorder("one"))?.attach(move |s| {
                let j = j.clone();
                s.given_unnamed(j.recorder("unnamed")).attach(move |s| {
                    s.given("level three", j.recorder("three"))?.attach(|s| {
                        s.then("first check", || Ok(()))
                            .then("second check", || Ok(()));
                        Ok(())
                    });
                    Ok(())
                });
                Ok(())
            });
            Ok(())
        })
        .behavior("shallow", |s| {
            s.when("acting", || Ok(())).then("top level check", || Ok(()));
            Ok(())
        })
}

#[tokio::test]
async fn test_hooks_run_once_per_case() {
    let journal = Journal::new();
    let cases = hooked_spec(&journal).cases().unwrap();
    assert_eq!(cases.len(), 3);

    run_all(&cases).await;
    assert_eq!(
        journal.take(),
        vec![
            "before", "one", "unnamed", "three", "after", //
            "before", "one", "unnamed", "three", "after", //
            "before", "after",
        ]
    );
}

#[tokio::test]
async fn test_after_runs_when_case_fails() {
    let journal = Journal::new();
    let before = journal.clone();
    let after = journal.clone();
    let spec = Spec::new("Failing")
        .before_each(move || {
            before.record("before");
            Ok(())
        })
        .after_each(move || {
            after.record("after");
            Ok(())
        })
        .behavior("b", |s| {
            s.when("exploding", || anyhow::bail!("boom"));
            s.then("ignores it", || Ok(()));
            Ok(())
        });

    let results = run_all(&spec.cases().unwrap()).await;
    assert!(matches!(results[0], Err(CaseError::Fault(_))));
    assert_eq!(journal.take(), vec!["before", "after"]);
}

#[tokio::test]
async fn test_after_hook_failure_is_reported_with_case_failure() {
    let spec = Spec::new("Teardown")
        .after_each(|| anyhow::bail!("could not clean up"))
        .behavior("b", |s| {
            s.when("acting", || Ok(()));
            s.then("fails", || anyhow::bail!("wrong total"));
            s.then("passes", || Ok(()));
            Ok(())
        });

    let results = run_all(&spec.cases().unwrap()).await;
    match &results[0] {
        Err(err @ CaseError::WithAfterHook { .. }) => {
            let text = err.to_string();
            assert!(text.contains("wrong total"));
            assert!(text.contains("could not clean up"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(results[1], Err(CaseError::AfterHook(_))));
}

#[tokio::test]
async fn test_failing_before_hook_fails_case_without_after() {
    let journal = Journal::new();
    let after = journal.clone();
    let spec = Spec::new("BrokenSetup")
        .before_each(|| anyhow::bail!("no database"))
        .after_each(move || {
            after.record("after");
            Ok(())
        })
        .behavior("b", |s| {
            s.when("acting", || Ok(())).then("never checked", || Ok(()));
            Ok(())
        });

    let results = run_all(&spec.cases().unwrap()).await;
    match &results[0] {
        Err(CaseError::Setup { source, .. }) => assert_eq!(source.to_string(), "no database"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(journal.take().is_empty());
}

#[tokio::test]
async fn test_abandoned_case_does_not_skip_next_before_hook() {
    let journal = Journal::new();
    let before = journal.clone();
    let after = journal.clone();
    let spec = Spec::new("Abandoned")
        .before_each(move || {
            before.record("before");
            Ok(())
        })
        .after_each(move || {
            after.record("after");
            Ok(())
        })
        .behavior("hangs", |s| {
            s.when_async("waiting forever", || {
                std::future::pending::<anyhow::Result<()>>()
            });
            s.then("never settles", || Ok(()));
            Ok(())
        })
        .behavior("returns", |s| {
            s.when("acting", || Ok(())).then("settles", || Ok(()));
            Ok(())
        });

    let cases = spec.cases().unwrap();
    let timed_out = tokio::time::timeout(Duration::from_millis(20), cases[0].run()).await;
    assert!(timed_out.is_err());
    assert_eq!(journal.take(), vec!["before"]);

    cases[1].run().await.unwrap();
    assert_eq!(journal.take(), vec!["before", "after"]);
}
