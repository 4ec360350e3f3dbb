//! Integration tests for asserting on faults raised by the trigger

use givens::{CaseError, FaultAssertionError, Panicked, Spec};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("insufficient funds: requested {requested}, available {available}")]
struct InsufficientFunds {
    requested: u32,
    available: u32,
}

#[derive(Debug, Error)]
#[error("account locked")]
struct AccountLocked;

fn withdrawal_spec(raise: bool, outcome: fn(&mut givens::Scope)) -> Spec {
    Spec::new("Withdrawal").behavior("withdraw", move |s| {
        s.when("withdrawing 150", move || {
            if raise {
                return Err(InsufficientFunds {
                    requested: 150,
                    available: 100,
                }
                .into());
            }
            Ok(())
        });
        s.given("a balance of 100", || {})?.attach(move |s| {
            outcome(s);
            Ok(())
        });
        Ok(())
    })
}

async fn run_single(spec: Spec) -> Result<(), CaseError> {
    let cases = spec.cases().unwrap();
    assert_eq!(cases.len(), 1);
    cases[0].run().await
}

#[tokio::test]
async fn test_asserted_fault_passes() {
    let spec = withdrawal_spec(true, |s| {
        let faults = s.faults();
        s.then("the withdrawal is refused", move || {
            faults.assert_raised::<InsufficientFunds>()
        });
    });
    run_single(spec).await.unwrap();
}

#[tokio::test]
async fn test_unasserted_fault_fails_with_original_fault() {
    let spec = withdrawal_spec(true, |s| {
        s.then("nothing is checked", || Ok(()));
    });
    let err = run_single(spec).await.unwrap_err();
    assert!(matches!(err, CaseError::Fault(_)));
    assert_eq!(
        err.cause().unwrap().downcast_ref::<InsufficientFunds>(),
        Some(&InsufficientFunds {
            requested: 150,
            available: 100
        })
    );
}

#[tokio::test]
async fn test_assert_without_fault_reports_not_raised() {
    let spec = withdrawal_spec(false, |s| {
        let faults = s.faults();
        s.then("the withdrawal is refused", move || {
            faults.assert_raised::<InsufficientFunds>()
        });
    });
    let err = run_single(spec).await.unwrap_err();
    assert!(matches!(
        err.cause().unwrap().downcast_ref::<FaultAssertionError>(),
        Some(FaultAssertionError::NotRaised { .. })
    ));
    assert!(err.to_string().starts_with("Expected fault was not raised"));
}

#[tokio::test]
async fn test_wrong_fault_type_reports_not_raised() {
    let spec = withdrawal_spec(true, |s| {
        let faults = s.faults();
        s.then("the account is locked", move || {
            faults.assert_raised::<AccountLocked>()
        });
    });
    let err = run_single(spec).await.unwrap_err();
    assert!(matches!(err, CaseError::Outcome(_)));
    assert!(err.to_string().contains("AccountLocked"));
}

#[tokio::test]
async fn test_swallowed_failed_assertion_still_fails_with_fault() {
    let spec = withdrawal_spec(true, |s| {
        let faults = s.faults();
        s.then("a lock is tolerated", move || {
            let _ = faults.assert_raised::<AccountLocked>();
            Ok(())
        });
    });
    let err = run_single(spec).await.unwrap_err();
    assert!(matches!(err, CaseError::Fault(_)));
    assert!(err
        .cause()
        .unwrap()
        .downcast_ref::<InsufficientFunds>()
        .is_some());
}

#[tokio::test]
async fn test_refinement_checks_fault_payload() {
    let passing = withdrawal_spec(true, |s| {
        let faults = s.faults();
        s.then("the shortfall is reported", move || {
            faults.assert_raised_with::<InsufficientFunds, _>(|e| {
                anyhow::ensure!(e.requested - e.available == 50, "shortfall mismatch");
                Ok(())
            })
        });
    });
    run_single(passing).await.unwrap();

    let failing = withdrawal_spec(true, |s| {
        let faults = s.faults();
        s.then("the balance is reported as zero", move || {
            faults.assert_raised_with::<InsufficientFunds, _>(|e| {
                assert_eq!(e.available, 0);
                Ok(())
            })
        });
    });
    let err = run_single(failing).await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("the specified constraint failed"));
    assert!(text.contains("InsufficientFunds"));
}

#[tokio::test]
async fn test_pending_fault_wins_over_failing_check() {
    let spec = withdrawal_spec(true, |s| {
        s.then("the balance is untouched", || {
            anyhow::bail!("balance check could not run")
        });
    });
    let err = run_single(spec).await.unwrap_err();
    assert!(matches!(err, CaseError::Fault(_)));
    assert!(err.to_string().starts_with("insufficient funds"));
}

#[tokio::test]
async fn test_check_error_after_assert_is_reported() {
    let spec = withdrawal_spec(true, |s| {
        let faults = s.faults();
        s.then("the refusal is logged", move || {
            faults.assert_raised::<InsufficientFunds>()?;
            anyhow::bail!("audit log is empty")
        });
    });
    let err = run_single(spec).await.unwrap_err();
    assert!(matches!(err, CaseError::Outcome(_)));
    assert_eq!(err.to_string(), "audit log is empty");
}

#[tokio::test]
async fn test_plain_assertion_failure_surfaces_verbatim() {
    let spec = withdrawal_spec(false, |s| {
        s.then("the balance is 50", || {
            assert_eq!(100, 50, "balance mismatch");
            Ok(())
        });
    });
    let err = run_single(spec).await.unwrap_err();
    let panicked = err.cause().unwrap().downcast_ref::<Panicked>().unwrap();
    assert!(panicked.message.contains("balance mismatch"));
}

#[tokio::test]
async fn test_panicking_trigger_can_be_asserted() {
    let spec = Spec::new("Panics").behavior("b", |s| {
        let faults = s.faults();
        s.when("dividing by zero", || {
            let divisor = std::hint::black_box(0);
            let _ = 10 / divisor;
            Ok(())
        });
        s.then("the division panics", move || faults.assert_raised::<Panicked>());
        Ok(())
    });
    run_single(spec).await.unwrap();
}

#[tokio::test]
async fn test_fault_state_does_not_leak_between_cases() {
    let spec = Spec::new("Isolation").behavior("b", |s| {
        s.for_when("failing", || Err(AccountLocked.into())).attach(|s| {
            let faults = s.faults();
            s.then("it is locked", move || faults.assert_raised::<AccountLocked>());
            Ok(())
        });
        s.for_when("succeeding", || Ok(())).attach(|s| {
            s.then("nothing is pending", || Ok(()));
            Ok(())
        });
        Ok(())
    });

    let cases = spec.cases().unwrap();
    assert_eq!(cases.len(), 2);
    for case in &cases {
        case.run().await.unwrap();
    }
    // and in reverse, after a fault has been consumed
    for case in cases.iter().rev() {
        case.run().await.unwrap();
    }
}
