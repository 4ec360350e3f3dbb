//! Context nodes and variant groups

use crate::effect::Effect;
use crate::error::BuildError;
use crate::naming::Conjunction;
use crate::tree::scope::Scope;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Identity of a context: an author-supplied description, or a placeholder
/// that never appears in case names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Named(String),
    Anonymous(u64),
}

impl Label {
    pub fn is_named(&self) -> bool {
        matches!(self, Label::Named(_))
    }

    /// The description shown in case names, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            Label::Named(description) => Some(description),
            Label::Anonymous(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Named(description) => f.write_str(description),
            Label::Anonymous(id) => write!(f, "<anonymous #{}>", id),
        }
    }
}

/// Placeholder id source, scoped to one case generation run.
#[derive(Debug, Clone, Default)]
pub struct AnonymousIds {
    next: Rc<Cell<u64>>,
}

impl AnonymousIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Rc::new(Cell::new(first)),
        }
    }

    pub fn next_label(&self) -> Label {
        let id = self.next.get();
        self.next.set(id + 1);
        Label::Anonymous(id)
    }
}

/// One precondition branch as captured into a case path.
#[derive(Debug, Clone)]
pub struct ContextNode {
    label: Label,
    conjunction: Option<Conjunction>,
    setup: Effect,
}

impl ContextNode {
    pub fn new(label: Label, conjunction: Option<Conjunction>, setup: Effect) -> Self {
        Self {
            label,
            conjunction,
            setup,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn conjunction(&self) -> Option<Conjunction> {
        self.conjunction
    }

    pub fn setup(&self) -> &Effect {
        &self.setup
    }
}

/// The action under test bound at some nesting level.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub description: String,
    pub effect: Effect,
}

/// Build closure that declares a context's descendants.
pub(crate) type Attachment = Rc<dyn Fn(&mut Scope) -> Result<(), BuildError>>;

/// A context together with its `or` variants.
///
/// Attachments belong to the group, so every variant sees every attachment
/// regardless of whether it was added before or after the variant.
pub(crate) struct ContextGroup {
    pub(crate) variants: Vec<ContextNode>,
    pub(crate) attachments: Vec<Attachment>,
}

impl ContextGroup {
    pub(crate) fn new(node: ContextNode) -> Self {
        Self {
            variants: vec![node],
            attachments: Vec::new(),
        }
    }

    pub(crate) fn has_description(&self, description: &str) -> bool {
        self.variants
            .iter()
            .any(|node| node.label.description() == Some(description))
    }

    pub(crate) fn conjunction(&self) -> Option<Conjunction> {
        self.variants.first().and_then(ContextNode::conjunction)
    }
}
