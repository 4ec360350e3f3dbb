use crate::effect::Effect;
use crate::error::CaseError;
use crate::fault::Faults;
use crate::generation::executor;
use crate::lifecycle::Lifecycle;
use crate::tree::{ContextNode, Trigger};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::sync::Arc;

/// Everything one case needs at execution time, copied out of the tree walk.
#[derive(Debug)]
pub(crate) struct CasePlan {
    pub(crate) path: Arc<[ContextNode]>,
    pub(crate) trigger: Trigger,
    pub(crate) outcome: String,
    pub(crate) check: Effect,
    pub(crate) faults: Faults,
    pub(crate) lifecycle: Lifecycle,
}

/// One named, independently executable (path, outcome) pair.
#[derive(Clone)]
pub struct Case {
    name: String,
    plan: Arc<CasePlan>,
}

impl Case {
    pub(crate) fn new(name: String, plan: CasePlan) -> Self {
        Self {
            name,
            plan: Arc::new(plan),
        }
    }

    /// Display name; exact-match contract with the host.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> &str {
        &self.plan.trigger.description
    }

    pub fn outcome(&self) -> &str {
        &self.plan.outcome
    }

    /// Contexts whose setups run before the trigger, root first.
    pub fn path(&self) -> &[ContextNode] {
        &self.plan.path
    }

    /// Execute the case. Each call replays setups, trigger and check from scratch.
    pub fn run(&self) -> BoxFuture<'static, Result<(), CaseError>> {
        let plan = Arc::clone(&self.plan);
        async move { executor::execute(&plan).await }.boxed()
    }

    /// Split into the `(name, run)` pair shape most host runners consume.
    pub fn into_runnable(
        self,
    ) -> (
        String,
        impl Fn() -> BoxFuture<'static, Result<(), CaseError>> + Send + Sync + 'static,
    ) {
        let plan = self.plan;
        (self.name, move || {
            let plan = Arc::clone(&plan);
            async move { executor::execute(&plan).await }.boxed()
        })
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("depth", &self.plan.path.len())
            .finish()
    }
}
