//! Builder state for one nesting level
//!
//! A `Scope` collects the child contexts, the trigger and the outcome set that a
//! context's attachments declare. The materializer creates a fresh scope for every
//! branch it visits, seeded with the trigger inherited from the parent level.

use crate::effect::Effect;
use crate::error::BuildError;
use crate::fault::Faults;
use crate::naming::Conjunction;
use crate::tree::context::{AnonymousIds, Attachment, ContextGroup, ContextNode, Label, Trigger};
use indexmap::IndexMap;
use std::future::Future;
use std::rc::Rc;
use tracing::trace;

pub struct Scope {
    groups: Vec<ContextGroup>,
    trigger: Option<Trigger>,
    outcomes: IndexMap<String, Effect>,
    faults: Faults,
    ids: AnonymousIds,
}

impl Scope {
    pub(crate) fn new(inherited: Option<Trigger>, faults: Faults, ids: AnonymousIds) -> Self {
        Self {
            groups: Vec::new(),
            trigger: inherited,
            outcomes: IndexMap::new(),
            faults,
            ids,
        }
    }

    /// Handle used by outcome checks to assert on a fault raised by the trigger.
    pub fn faults(&self) -> Faults {
        self.faults.clone()
    }

    /// Declare a named child context.
    ///
    /// Fails if a sibling (or a sibling's variant) already uses `description`.
    pub fn declare(
        &mut self,
        description: impl Into<String>,
        setup: Effect,
        conjunction: Option<Conjunction>,
    ) -> Result<ContextRef<'_>, BuildError> {
        let description = description.into();
        self.ensure_unique(&description)?;
        Ok(self.push_group(ContextNode::new(
            Label::Named(description),
            conjunction,
            setup,
        )))
    }

    pub fn given<F>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.declare(description, Effect::sync(setup), None)
    }

    pub fn given_async<F, Fut>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.declare(description, Effect::task(setup), None)
    }

    /// Same as [`Scope::given`]; reads better after the first line.
    pub fn and<F>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.declare(description, Effect::sync(setup), None)
    }

    /// A contrastive context, rendered with `but`.
    pub fn but<F>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.declare(description, Effect::sync(setup), Some(Conjunction::But))
    }

    /// Like [`Scope::given`], for setups that can fail. An error fails the
    /// case as a setup failure naming this context.
    pub fn try_given<F>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.declare(description, Effect::fallible(setup), None)
    }

    pub fn try_and<F>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.declare(description, Effect::fallible(setup), None)
    }

    pub fn try_but<F>(
        &mut self,
        description: impl Into<String>,
        setup: F,
    ) -> Result<ContextRef<'_>, BuildError>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.declare(description, Effect::fallible(setup), Some(Conjunction::But))
    }

    /// A context that runs `setup` but never shows up in case names.
    pub fn given_unnamed<F>(&mut self, setup: F) -> ContextRef<'_>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.declare_anonymous(Effect::sync(setup))
    }

    pub(crate) fn declare_anonymous(&mut self, setup: Effect) -> ContextRef<'_> {
        let label = self.ids.next_label();
        self.push_group(ContextNode::new(label, None, setup))
    }

    /// An anonymous context whose branch binds its own trigger.
    pub fn for_when<F>(&mut self, description: impl Into<String>, action: F) -> ContextRef<'_>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let trigger = Trigger {
            description: description.into(),
            effect: Effect::fallible(action),
        };
        self.declare_anonymous(Effect::noop()).attach(move |s| {
            s.bind_trigger(trigger.clone());
            Ok(())
        })
    }

    pub fn when<F>(&mut self, description: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bind_trigger(Trigger {
            description: description.into(),
            effect: Effect::fallible(action),
        })
    }

    pub fn when_async<F, Fut>(&mut self, description: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.bind_trigger(Trigger {
            description: description.into(),
            effect: Effect::task(action),
        })
    }

    pub fn bind_trigger(&mut self, trigger: Trigger) -> &mut Self {
        trace!(trigger = %trigger.description, "Trigger bound");
        self.trigger = Some(trigger);
        self
    }

    /// Declare an outcome at this level. Re-using a description replaces the
    /// earlier check in place.
    pub fn then<F>(&mut self, description: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_outcome(description, Effect::fallible(check))
    }

    pub fn then_async<F, Fut>(&mut self, description: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.add_outcome(description, Effect::task(check))
    }

    pub fn add_outcome(&mut self, description: impl Into<String>, check: Effect) -> &mut Self {
        self.outcomes.insert(description.into(), check);
        self
    }

    pub(crate) fn into_parts(self) -> (Vec<ContextGroup>, Option<Trigger>, IndexMap<String, Effect>) {
        (self.groups, self.trigger, self.outcomes)
    }

    fn ensure_unique(&self, description: &str) -> Result<(), BuildError> {
        if self.groups.iter().any(|g| g.has_description(description)) {
            return Err(BuildError::DuplicateDescription {
                description: description.to_string(),
            });
        }
        Ok(())
    }

    fn push_group(&mut self, node: ContextNode) -> ContextRef<'_> {
        self.groups.push(ContextGroup::new(node));
        let index = self.groups.len() - 1;
        ContextRef { scope: self, index }
    }
}

/// Handle to a just-declared context for attaching descendants and variants.
pub struct ContextRef<'s> {
    scope: &'s mut Scope,
    index: usize,
}

impl<'s> ContextRef<'s> {
    /// Attach descendants. Every attachment runs, in call order, for every
    /// variant of this context.
    pub fn attach<F>(self, descendants: F) -> Self
    where
        F: Fn(&mut Scope) -> Result<(), BuildError> + 'static,
    {
        let attachment: Attachment = Rc::new(descendants);
        self.scope.groups[self.index].attachments.push(attachment);
        self
    }

    /// Declare an interchangeable alternative sharing this context's descendants.
    pub fn alternative(self, description: impl Into<String>, setup: Effect) -> Result<Self, BuildError> {
        let description = description.into();
        self.scope.ensure_unique(&description)?;
        let group = &mut self.scope.groups[self.index];
        let conjunction = group.conjunction();
        group
            .variants
            .push(ContextNode::new(Label::Named(description), conjunction, setup));
        Ok(self)
    }

    pub fn or<F>(self, description: impl Into<String>, setup: F) -> Result<Self, BuildError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.alternative(description, Effect::sync(setup))
    }

    pub fn try_or<F>(self, description: impl Into<String>, setup: F) -> Result<Self, BuildError>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.alternative(description, Effect::fallible(setup))
    }

    pub fn or_async<F, Fut>(self, description: impl Into<String>, setup: F) -> Result<Self, BuildError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.alternative(description, Effect::task(setup))
    }

    /// Number of variants declared so far, including the original.
    pub fn variant_count(&self) -> usize {
        self.scope.groups[self.index].variants.len()
    }
}
