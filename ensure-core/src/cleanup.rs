//! Cleanups that only run when the process is interrupted.

use std::{
    mem,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::CancelToken;

/// Error returned by a cleanup callback.
pub type CleanupError = Box<dyn std::error::Error + Send + Sync>;

type Callback = Box<dyn FnOnce() -> Result<(), CleanupError> + Send>;

/// Registry of cleanup callbacks tied to one invocation of the CLI.
///
/// When the process receives SIGINT or SIGTERM, every [`CancelToken`] handed
/// out by [`ExitCleanup::token`] is cancelled. Registered callbacks run in
/// [`ExitCleanup::finish`], and only if the process was interrupted.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct ExitCleanup {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    terminated: AtomicBool,
    callbacks: Mutex<Vec<Callback>>,
    tokens: Mutex<Vec<CancelToken>>,
}

impl ExitCleanup {
    /// Create a registry without installing a signal handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and install it as the process SIGINT/SIGTERM handler.
    ///
    /// Can only succeed once per process.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let cleanup = Self::new();
        let handle = cleanup.clone();
        ctrlc::set_handler(move || {
            tracing::info!("interrupted, cancelling in-flight work");
            handle.trigger();
        })?;
        Ok(cleanup)
    }

    /// Hand out a token that is cancelled when the process is interrupted.
    pub fn token(&self) -> CancelToken {
        let token = CancelToken::new();
        let mut tokens = self.inner.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.push(token.clone());
        if self.is_terminated() {
            token.cancel();
        }
        token
    }

    /// Register a callback to run if the process is interrupted.
    pub fn register<F>(&self, callback: F)
    where
        F: FnOnce() -> Result<(), CleanupError> + Send + 'static,
    {
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    /// Mark the process as interrupted and cancel every issued token.
    pub fn trigger(&self) {
        self.inner.terminated.store(true, Ordering::SeqCst);
        let tokens = self.inner.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        for token in tokens.iter() {
            token.cancel();
        }
    }

    /// Whether the process has been interrupted.
    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.load(Ordering::SeqCst)
    }

    /// Run the registered callbacks if the process was interrupted.
    ///
    /// Should be called once, right before the process exits. Callback
    /// failures are logged and never stop the remaining callbacks. Returns
    /// whether the process was interrupted, in which case the caller should
    /// exit with a failure status.
    pub fn finish(&self) -> bool {
        if !self.is_terminated() {
            return false;
        }

        let callbacks = mem::take(
            &mut *self
                .inner
                .callbacks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        for callback in callbacks {
            if let Err(err) = callback() {
                tracing::warn!(error = %err, "cleanup failed");
            }
        }
        true
    }
}
