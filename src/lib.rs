//! Givens: nested given/when/then specifications
//!
//! Authors describe nested preconditions, a trigger and outcome checks; every
//! combination of alternative preconditions is expanded into a flat list of
//! independently named, independently runnable cases.
//!
//! ```no_run
//! use givens::Spec;
//!
//! let spec = Spec::new("Account").behavior("withdrawal", |s| {
//!     s.when("withdrawing 10", || Ok(()));
//!     s.given("a balance of 100", || {})?
//!         .or("a balance of 50", || {})?
//!         .attach(|s| {
//!             s.then("the withdrawal succeeds", || Ok(()));
//!             Ok(())
//!         });
//!     Ok(())
//! });
//! let cases = spec.cases().unwrap();
//! assert_eq!(cases.len(), 2);
//! ```

pub mod config;
pub mod effect;
pub mod error;
pub mod fault;
pub mod generation;
mod lifecycle;
pub mod logging;
pub mod naming;
pub mod runner;
pub mod spec;
pub mod tree;

pub use config::{ConfigLoader, GivensConfig};
pub use effect::Effect;
pub use error::{BuildError, CaseError, FaultAssertionError, Panicked};
pub use fault::Faults;
pub use generation::Case;
pub use naming::{Conjunction, LineEnding};
pub use runner::{RunSummary, Runner};
pub use spec::Spec;
pub use tree::{ContextRef, Scope};
