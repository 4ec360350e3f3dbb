//! Context Tree
//!
//! Preconditions form a tree of contexts. Each context may carry interchangeable
//! variants, and descendants are attached as build closures that run against a
//! fresh [`Scope`] every time a branch is enumerated.

pub mod context;
pub mod scope;

pub use context::{AnonymousIds, ContextNode, Label, Trigger};
pub use scope::{ContextRef, Scope};

pub(crate) use context::{Attachment, ContextGroup};
