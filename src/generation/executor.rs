//! Case executor: replays one captured path, fires the trigger and settles the
//! outcome check under the fault-deferral rules in [`crate::fault`].

use crate::error::CaseError;
use crate::generation::plan::CasePlan;
use tracing::{debug, trace};

/// Run setups root-to-leaf, then the trigger, then the check, then the after hook.
///
/// The after hook runs on every path. Its own failure replaces a pass but never
/// hides a case failure; both are reported together.
pub(crate) async fn execute(plan: &CasePlan) -> Result<(), CaseError> {
    plan.lifecycle.begin_case();
    let verdict = run_steps(plan).await;
    let after = plan.lifecycle.after().await;

    match (verdict, after) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(hook)) => Err(CaseError::AfterHook(hook)),
        (Err(case), Ok(())) => Err(case),
        (Err(case), Err(hook)) => Err(CaseError::WithAfterHook {
            case: Box::new(case),
            hook,
        }),
    }
}

async fn run_steps(plan: &CasePlan) -> Result<(), CaseError> {
    for context in plan.path.iter() {
        trace!(context = %context.label(), "Running setup");
        context
            .setup()
            .run()
            .await
            .map_err(|source| CaseError::Setup {
                context: context.label().to_string(),
                source,
            })?;
    }

    plan.faults.reset();
    trace!(trigger = %plan.trigger.description, "Running trigger");
    if let Err(fault) = plan.trigger.effect.run().await {
        plan.faults.capture(fault);
    }

    plan.faults.begin_outcome();
    trace!(outcome = %plan.outcome, "Running outcome check");
    let checked = plan.check.run().await;
    let verdict = plan.faults.settle(checked);
    if let Err(err) = &verdict {
        debug!(outcome = %plan.outcome, error = %err, "Case failed");
    }
    verdict
}
