//! Asynchronous zero-argument effects
//!
//! Setups, triggers, outcome checks and lifecycle hooks all share one shape: a
//! cloneable closure producing a boxed future that settles to `anyhow::Result<()>`.
//! Panics raised while polling are caught and surfaced as [`Panicked`] faults.

use crate::error::Panicked;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type EffectFn = dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync;

/// A shareable, repeatable asynchronous effect.
#[derive(Clone)]
pub struct Effect {
    inner: Arc<EffectFn>,
}

impl Effect {
    /// An effect that does nothing.
    pub fn noop() -> Self {
        Self::fallible(|| Ok(()))
    }

    /// Wrap a synchronous closure that cannot fail.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::fallible(move || {
            f();
            Ok(())
        })
    }

    /// Wrap a synchronous closure that may fail.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move || {
                let result = f();
                async move { result }.boxed()
            }),
        }
    }

    /// Wrap a closure returning a future.
    pub fn task<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move || f().boxed()),
        }
    }

    /// Run the effect once. A panic, whether raised while creating the future
    /// or while polling it, settles as an `Err` carrying [`Panicked`].
    pub async fn run(&self) -> anyhow::Result<()> {
        let inner = Arc::clone(&self.inner);
        let future = match std::panic::catch_unwind(AssertUnwindSafe(move || inner())) {
            Ok(future) => future,
            Err(payload) => return Err(panic_fault(payload)),
        };
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(panic_fault(payload)),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Effect")
    }
}

/// Convert a caught panic payload into a fault.
pub(crate) fn panic_fault(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    anyhow::Error::new(Panicked { message })
}
