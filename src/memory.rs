//! In-process task store backend.
//!
//! Stands in for the remote document database when running locally and
//! in tests, honoring its contract: store-assigned ids and timestamps,
//! creation-time-descending snapshots, atomic batch delete, and a push
//! of the full result set to every live subscriber after each change.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{StoreMsg, Subscription, TaskStore};
use crate::task::{TaskDraft, TaskPatch, TaskRecord};

struct Subscriber {
    id: u64,
    sender: Sender<StoreMsg>,
}

#[derive(Default)]
struct Inner {
    // Documents per namespace in insertion order; snapshots iterate
    // newest-first, which is creation-time descending.
    documents: HashMap<String, Vec<TaskRecord>>,
    subscribers: HashMap<String, Vec<Subscriber>>,
    next_subscriber: u64,
}

/// Shared in-memory store. Cloning yields another handle to the same
/// documents, so one instance can back every component in a process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::OperationFailed("store state poisoned".to_string()))
    }

    fn snapshot_of(inner: &Inner, namespace: &str) -> Vec<TaskRecord> {
        inner
            .documents
            .get(namespace)
            .map(|docs| docs.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    fn broadcast(inner: &mut Inner, namespace: &str) {
        let snapshot = Self::snapshot_of(inner, namespace);
        if let Some(subscribers) = inner.subscribers.get_mut(namespace) {
            subscribers
                .retain(|sub| sub.sender.send(StoreMsg::Snapshot(snapshot.clone())).is_ok());
        }
    }

    fn unsubscribe(&self, namespace: &str, subscriber_id: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(subscribers) = inner.subscribers.get_mut(namespace) {
                subscribers.retain(|sub| sub.id != subscriber_id);
            }
        }
    }
}

impl TaskStore for MemoryStore {
    fn create(&self, namespace: &str, draft: TaskDraft) -> Result<String> {
        let mut inner = self.lock()?;
        let now = Utc::now();
        let record = TaskRecord {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            completed: false,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };
        let id = record.id.clone();
        tracing::debug!(namespace, task = %id, "create");
        inner
            .documents
            .entry(namespace.to_string())
            .or_default()
            .push(record);
        Self::broadcast(&mut inner, namespace);
        Ok(id)
    }

    fn update(&self, namespace: &str, id: &str, patch: TaskPatch) -> Result<()> {
        let mut inner = self.lock()?;
        let docs = inner
            .documents
            .get_mut(namespace)
            .ok_or_else(|| Error::OperationFailed(format!("no such task: {id}")))?;
        let record = docs
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| Error::OperationFailed(format!("no such task: {id}")))?;
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(completed) = patch.completed {
            record.completed = completed;
        }
        record.updated_at = Utc::now();
        tracing::debug!(namespace, task = %id, "update");
        Self::broadcast(&mut inner, namespace);
        Ok(())
    }

    fn delete(&self, namespace: &str, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let Some(docs) = inner.documents.get_mut(namespace) else {
            return Ok(());
        };
        let before = docs.len();
        docs.retain(|record| record.id != id);
        // Deleting an absent document succeeds, matching the service.
        if docs.len() != before {
            tracing::debug!(namespace, task = %id, "delete");
            Self::broadcast(&mut inner, namespace);
        }
        Ok(())
    }

    fn delete_many(&self, namespace: &str, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut inner = self.lock()?;
        let Some(docs) = inner.documents.get_mut(namespace) else {
            return Ok(());
        };
        let before = docs.len();
        docs.retain(|record| !ids.contains(&record.id));
        if docs.len() != before {
            tracing::debug!(namespace, removed = before - docs.len(), "batch delete");
            Self::broadcast(&mut inner, namespace);
        }
        Ok(())
    }

    fn subscribe(&self, namespace: &str) -> Result<Subscription> {
        let mut inner = self.lock()?;
        let (tx, rx) = mpsc::channel();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;

        // The current result set is delivered before any change, the
        // same as the service firing the listener on attach.
        let snapshot = Self::snapshot_of(&inner, namespace);
        let _ = tx.send(StoreMsg::Snapshot(snapshot));

        inner
            .subscribers
            .entry(namespace.to_string())
            .or_default()
            .push(Subscriber { id, sender: tx });
        tracing::debug!(namespace, subscriber = id, "subscribe");

        let store = self.clone();
        let ns = namespace.to_string();
        Ok(Subscription::new(rx, move || store.unsubscribe(&ns, id)))
    }
}
