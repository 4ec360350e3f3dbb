//! Specification
//!
//! A `Spec` is a set of explicitly registered behaviors plus optional
//! before/after hooks. Each behavior becomes a top-level context whose body runs
//! inside an anonymous context that fires the before hook, so every case gets
//! exactly one before/after pair regardless of how deep its path is.

use crate::config::NamingConfig;
use crate::effect::Effect;
use crate::error::BuildError;
use crate::fault::Faults;
use crate::generation::{Case, Materializer};
use crate::lifecycle::Lifecycle;
use crate::naming::LineEnding;
use crate::tree::{AnonymousIds, ContextGroup, ContextNode, Label, Scope};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{info, instrument};

type Body = Rc<dyn Fn(&mut Scope) -> Result<(), BuildError>>;

struct Behavior {
    name: String,
    body: Body,
}

pub struct Spec {
    name: String,
    behaviors: Vec<Behavior>,
    before_each: Effect,
    after_each: Effect,
    line_ending: LineEnding,
    faults: Faults,
}

impl Spec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviors: Vec::new(),
            before_each: Effect::noop(),
            after_each: Effect::noop(),
            line_ending: LineEnding::default(),
            faults: Faults::new(),
        }
    }

    pub fn with_naming(mut self, naming: &NamingConfig) -> Self {
        self.line_ending = naming.line_ending;
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn before_each<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before_each = Effect::fallible(hook);
        self
    }

    pub fn after_each<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after_each = Effect::fallible(hook);
        self
    }

    /// Register a behavior. The body declares givens, a trigger and outcomes.
    pub fn behavior<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Scope) -> Result<(), BuildError> + 'static,
    {
        self.behaviors.push(Behavior {
            name: name.into(),
            body: Rc::new(body),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fault slot shared by every case of this spec.
    pub fn faults(&self) -> Faults {
        self.faults.clone()
    }

    /// Build the tree and expand it into cases.
    ///
    /// Fails on the first build error without returning any case.
    #[instrument(skip(self), fields(spec = %self.name))]
    pub fn cases(&self) -> Result<Vec<Case>, BuildError> {
        let lifecycle = Lifecycle::new(self.before_each.clone(), self.after_each.clone());
        let roots = self.roots(&lifecycle)?;
        let materializer = Materializer::new(
            self.faults.clone(),
            lifecycle,
            AnonymousIds::default(),
            self.line_ending,
        );
        let cases = materializer.materialize(&roots)?;
        info!(
            behaviors = self.behaviors.len(),
            case_count = cases.len(),
            "Case generation completed"
        );
        Ok(cases)
    }

    fn roots(&self, lifecycle: &Lifecycle) -> Result<Vec<ContextGroup>, BuildError> {
        let mut seen = HashSet::new();
        let mut roots = Vec::with_capacity(self.behaviors.len());
        for behavior in &self.behaviors {
            if !seen.insert(behavior.name.as_str()) {
                return Err(BuildError::DuplicateBehavior {
                    name: behavior.name.clone(),
                });
            }

            let body = Rc::clone(&behavior.body);
            let before = lifecycle.before_setup();
            let mut group = ContextGroup::new(ContextNode::new(
                Label::Named(behavior.name.clone()),
                None,
                Effect::noop(),
            ));
            group
                .attachments
                .push(Rc::new(move |s: &mut Scope| -> Result<(), BuildError> {
                    let body = Rc::clone(&body);
                    s.declare_anonymous(before.clone())
                        .attach(move |s| body(s));
                    Ok(())
                }));
            roots.push(group);
        }
        Ok(roots)
    }
}
