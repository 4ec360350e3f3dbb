//! Fault-under-test bookkeeping
//!
//! A trigger that fails does not fail its case straight away. The fault is parked
//! here, and the outcome check decides what happens to it:
//!
//! - the check calls [`Faults::assert_raised`] (or `_with`), which consumes a fault
//!   of the expected type or fails with [`FaultAssertionError`];
//! - the check ignores it, in which case the parked fault becomes the case failure,
//!   even if the check itself failed for some other reason.
//!
//! One slot exists per [`Spec`](crate::spec::Spec) and is reset before every
//! trigger, so cases of one spec must not run concurrently.

use crate::effect::panic_fault;
use crate::error::{CaseError, FaultAssertionError};
use parking_lot::Mutex;
use std::any::type_name;
use std::fmt::{Debug, Display};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct FaultState {
    pending: Option<anyhow::Error>,
    /// Set as soon as the check asserts on the fault, whatever the verdict.
    consumed: bool,
}

/// Shared handle to the fault slot of one spec instance.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    state: Arc<Mutex<FaultState>>,
}

impl Faults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert that the trigger raised a fault of type `T`.
    pub fn assert_raised<T>(&self) -> anyhow::Result<()>
    where
        T: Display + Debug + Send + Sync + 'static,
    {
        self.assert_raised_with::<T, _>(|_| Ok(()))
    }

    /// Assert that the trigger raised a fault of type `T` satisfying `constraint`.
    ///
    /// A constraint that returns an error or panics fails the assertion with
    /// [`FaultAssertionError::ConstraintFailed`].
    pub fn assert_raised_with<T, F>(&self, constraint: F) -> anyhow::Result<()>
    where
        T: Display + Debug + Send + Sync + 'static,
        F: FnOnce(&T) -> anyhow::Result<()>,
    {
        let expected = type_name::<T>();
        let fault = {
            let mut state = self.state.lock();
            state.consumed = true;
            state.pending.take()
        };
        let Some(fault) = fault else {
            debug!(expected, "Expected fault was not raised");
            return Err(FaultAssertionError::NotRaised { expected }.into());
        };

        let verdict = match fault.downcast_ref::<T>() {
            None => Err(FaultAssertionError::NotRaised { expected }),
            Some(matched) => {
                match std::panic::catch_unwind(AssertUnwindSafe(move || constraint(matched))) {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(FaultAssertionError::ConstraintFailed { expected, source }),
                    Err(payload) => Err(FaultAssertionError::ConstraintFailed {
                        expected,
                        source: panic_fault(payload),
                    }),
                }
            }
        };

        if let Err(err) = &verdict {
            debug!(expected, error = %err, "Fault assertion failed");
            self.state.lock().pending = Some(fault);
        }
        verdict.map_err(anyhow::Error::from)
    }

    /// Whether a fault is still parked. A fault survives a failed assertion, in
    /// which case it still fails the case once the check settles.
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Clear the slot before a trigger runs.
    pub(crate) fn reset(&self) {
        let mut state = self.state.lock();
        state.pending = None;
        state.consumed = false;
    }

    pub(crate) fn capture(&self, fault: anyhow::Error) {
        debug!(fault = %fault, "Trigger raised a fault; deferring");
        self.state.lock().pending = Some(fault);
    }

    pub(crate) fn begin_outcome(&self) {
        self.state.lock().consumed = false;
    }

    /// Decide the case verdict once the outcome check has settled.
    pub(crate) fn settle(&self, checked: anyhow::Result<()>) -> Result<(), CaseError> {
        let mut state = self.state.lock();
        match checked {
            Err(err) => {
                if !state.consumed {
                    if let Some(fault) = state.pending.take() {
                        debug!(discarded = %err, "Outcome failed while a fault was pending; reporting the fault");
                        return Err(CaseError::Fault(fault));
                    }
                }
                Err(CaseError::Outcome(err))
            }
            Ok(()) => match state.pending.take() {
                Some(fault) => Err(CaseError::Fault(fault)),
                None => Ok(()),
            },
        }
    }
}
