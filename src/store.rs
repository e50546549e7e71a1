//! Remote task store seam.
//!
//! The document database behind this trait is an external collaborator:
//! storage, indexing, replication, and offline caching are its problem.
//! The client sees ordered full-set snapshots pushed over a channel and
//! issues discrete mutation calls, each all-or-nothing.

use std::sync::mpsc::{Receiver, TryRecvError};

use crate::error::Result;
use crate::task::{TaskDraft, TaskPatch, TaskRecord};

/// Messages delivered on a subscription: the snapshot stream plus the
/// error channel of the external query.
#[derive(Debug, Clone)]
pub enum StoreMsg {
    /// Complete result set for the subscribed namespace, ordered by
    /// creation time descending. Delivered whenever any member changes.
    Snapshot(Vec<TaskRecord>),
    /// Permission or connectivity failure reported by the service.
    Error(String),
}

/// Live subscription to a namespace.
///
/// Cancellation is an explicit unsubscribe; dropping the handle
/// unsubscribes as well, so subscription lifetime is scoped to whoever
/// owns the handle.
pub struct Subscription {
    receiver: Receiver<StoreMsg>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(receiver: Receiver<StoreMsg>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            receiver,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Next pending message, if any. Never blocks; the UI loop polls.
    pub fn try_recv(&self) -> Option<StoreMsg> {
        match self.receiver.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Unsubscribe from the store.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Operations offered by the remote task store.
///
/// Every call is a discrete round trip with no partial-success
/// reporting; `delete_many` is atomic. Mutations do not return the new
/// state, the result set arrives through the subscription.
pub trait TaskStore: Send + Sync {
    /// Create a document; the store assigns id and timestamps.
    fn create(&self, namespace: &str, draft: TaskDraft) -> Result<String>;

    /// Apply a partial update to a single document.
    fn update(&self, namespace: &str, id: &str, patch: TaskPatch) -> Result<()>;

    /// Delete a single document.
    fn delete(&self, namespace: &str, id: &str) -> Result<()>;

    /// Atomically delete a batch of documents.
    fn delete_many(&self, namespace: &str, ids: &[String]) -> Result<()>;

    /// Subscribe to the namespace, ordered by creation time descending.
    /// The current result set is delivered immediately.
    fn subscribe(&self, namespace: &str) -> Result<Subscription>;
}

/// Per-user scope under which all of that user's task documents live.
pub fn namespace_for(principal_id: &str) -> String {
    format!("users/{principal_id}/tasks")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;

    #[test]
    fn namespace_is_scoped_per_principal() {
        assert_eq!(namespace_for("u1"), "users/u1/tasks");
        assert_ne!(namespace_for("u1"), namespace_for("u2"));
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let (_tx, rx) = mpsc::channel();
        let subscription = Subscription::new(rx, move || flag.store(true, Ordering::SeqCst));
        drop(subscription);
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn explicit_cancel_runs_once() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = count.clone();
        let (_tx, rx) = mpsc::channel();
        let subscription = Subscription::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        subscription.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
