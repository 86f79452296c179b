//! Cooperative cancellation for a scraping run.
//!
//! A [`Cancellation`] is shared by the binary's interrupt handler and every
//! awaiting stage of the pipeline. [`Cancellation::guard`] races a stage
//! against the flag so an interrupt ends a slow request at once instead of
//! after its timeout.

use crate::error::{Result, ScraperError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable cancellation handle.
///
/// Every clone observes the same flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone)]
pub struct Cancellation {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Cancellation {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }
}

impl Cancellation {
    /// A fresh, uncancelled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether any clone has called [`cancel`](Self::cancel).
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this can't observe a close.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Run `work` unless cancellation wins first.
    ///
    /// # Arguments
    ///
    /// * `work` - The stage to run; dropped unfinished on cancellation
    ///
    /// # Returns
    ///
    /// The stage's own result, or [`ScraperError::Cancelled`] if the flag was
    /// already raised or is raised before `work` completes.
    pub async fn guard<T, F>(&self, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(ScraperError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ScraperError::Cancelled),
            result = work => result,
        }
    }
}
