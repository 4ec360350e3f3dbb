//! Before/after hooks around each case.
//!
//! The before hook runs as the setup of an anonymous context wrapped around each
//! behavior; a per-instance flag makes sure it fires at most once per case and
//! that the after hook fires only if it did.

use crate::effect::Effect;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
pub(crate) struct Lifecycle {
    before: Effect,
    after: Effect,
    before_ran: Arc<AtomicBool>,
}

impl Lifecycle {
    pub(crate) fn new(before: Effect, after: Effect) -> Self {
        Self {
            before,
            after,
            before_ran: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Disarm the flag before a case starts. A case whose future was dropped
    /// mid-run never reached its after hook and must not leak its state.
    pub(crate) fn begin_case(&self) {
        if self.before_ran.swap(false, Ordering::SeqCst) {
            trace!("Previous case was abandoned before its after hook");
        }
    }

    /// Setup effect that invokes the before hook once per case.
    pub(crate) fn before_setup(&self) -> Effect {
        let lifecycle = self.clone();
        Effect::task(move || {
            let lifecycle = lifecycle.clone();
            async move { lifecycle.before().await }
        })
    }

    async fn before(&self) -> anyhow::Result<()> {
        if self.before_ran.load(Ordering::SeqCst) {
            return Ok(());
        }
        trace!("Running before hook");
        self.before.run().await?;
        self.before_ran.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Run the after hook if the before hook ran for this case.
    pub(crate) async fn after(&self) -> anyhow::Result<()> {
        if !self.before_ran.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        trace!("Running after hook");
        self.after.run().await
    }
}
