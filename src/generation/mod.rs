//! Case generation: depth-first expansion of the context tree into flat cases.
//!
//! Every context variant is visited as a sibling of its group. Visiting runs the
//! group's attachments against a fresh scope seeded with the trigger that was
//! bound when the parent level was entered, so nothing a branch declares leaks to
//! its siblings. Each level is both a potential leaf (its own outcomes) and the
//! parent of the next level.

pub mod executor;
pub mod plan;

pub use plan::Case;

use crate::effect::Effect;
use crate::error::BuildError;
use crate::fault::Faults;
use crate::lifecycle::Lifecycle;
use crate::naming::{self, LineEnding};
use crate::tree::{AnonymousIds, ContextGroup, ContextNode, Scope, Trigger};
use indexmap::IndexMap;
use plan::CasePlan;
use std::sync::Arc;
use tracing::{debug, instrument};

pub(crate) struct Materializer {
    faults: Faults,
    lifecycle: Lifecycle,
    ids: AnonymousIds,
    line_ending: LineEnding,
}

impl Materializer {
    pub(crate) fn new(
        faults: Faults,
        lifecycle: Lifecycle,
        ids: AnonymousIds,
        line_ending: LineEnding,
    ) -> Self {
        Self {
            faults,
            lifecycle,
            ids,
            line_ending,
        }
    }

    /// Expand root groups into cases. Roots themselves never appear in a path.
    #[instrument(skip_all, fields(roots = roots.len()))]
    pub(crate) fn materialize(&self, roots: &[ContextGroup]) -> Result<Vec<Case>, BuildError> {
        let mut cases = Vec::new();
        self.enumerate(roots, None, &[], 0, &mut cases)?;
        Ok(cases)
    }

    fn enumerate(
        &self,
        groups: &[ContextGroup],
        inherited: Option<&Trigger>,
        path: &[ContextNode],
        depth: usize,
        cases: &mut Vec<Case>,
    ) -> Result<(), BuildError> {
        for group in groups {
            for variant in &group.variants {
                let mut scope = Scope::new(inherited.cloned(), self.faults.clone(), self.ids.clone());
                for attachment in &group.attachments {
                    attachment(&mut scope)?;
                }

                let mut branch = path.to_vec();
                if depth > 0 {
                    branch.push(variant.clone());
                }

                let (children, trigger, outcomes) = scope.into_parts();
                self.emit_leaf(&branch, trigger.as_ref(), outcomes, cases)?;
                self.enumerate(&children, trigger.as_ref(), &branch, depth + 1, cases)?;
            }
        }
        Ok(())
    }

    fn emit_leaf(
        &self,
        path: &[ContextNode],
        trigger: Option<&Trigger>,
        outcomes: IndexMap<String, Effect>,
        cases: &mut Vec<Case>,
    ) -> Result<(), BuildError> {
        if outcomes.is_empty() {
            return Ok(());
        }
        let Some(trigger) = trigger else {
            let outcome = outcomes.keys().next().cloned().unwrap_or_default();
            return Err(BuildError::MissingTrigger { outcome });
        };

        let prefix = naming::leaf_prefix(
            path.iter().map(|node| (node.label(), node.conjunction())),
            &trigger.description,
            self.line_ending,
        );
        let shared_path: Arc<[ContextNode]> = Arc::from(path);

        for (outcome, check) in outcomes {
            let name = naming::case_name(&prefix, &outcome, self.line_ending);
            debug!(depth = path.len(), name = %name.escape_debug(), "Generated case");
            cases.push(Case::new(
                name,
                CasePlan {
                    path: Arc::clone(&shared_path),
                    trigger: trigger.clone(),
                    outcome,
                    check,
                    faults: self.faults.clone(),
                    lifecycle: self.lifecycle.clone(),
                },
            ));
        }
        Ok(())
    }
}
