//! Ctrl+C handling outside the line editor
//!
//! rustyline reports Ctrl+C itself while it owns the terminal. While a turn
//! runs or a confirmation prompt waits on stdin the terminal is in cooked
//! mode and the key press arrives as SIGINT instead. [`Interrupt`] turns
//! that signal into a future that work can be raced against.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::warn;

type Wait = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Source of user interrupts, cloned into every component that blocks
#[derive(Clone)]
pub struct Interrupt {
    source: Arc<dyn Fn() -> Wait + Send + Sync>,
}

impl Interrupt {
    /// Interrupts raised by Ctrl+C (SIGINT)
    pub fn ctrl_c() -> Self {
        Self::from_fn(|| async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
    }

    /// Interrupts raised whenever a future made by `source` completes
    pub fn from_fn<F, Fut>(source: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            source: Arc::new(move || Box::pin(source())),
        }
    }

    /// Resolves on the next interrupt
    pub fn wait(&self) -> Wait {
        (*self.source)()
    }

    /// Run `work` until it finishes or the user interrupts.
    ///
    /// Returns `None` when interrupted; `work` is dropped unfinished.
    pub async fn guard<F: Future>(&self, work: F) -> Option<F::Output> {
        tokio::pin!(work);
        tokio::select! {
            biased;
            _ = self.wait() => None,
            output = &mut work => Some(output),
        }
    }
}
