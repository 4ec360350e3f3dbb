//! Integration tests for the givens specification engine

mod fault_protocol;
mod lifecycle_hooks;
mod spec_naming;
