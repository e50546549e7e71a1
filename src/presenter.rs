//! Task list presenter.
//!
//! Holds the last snapshot received from the store and the active
//! filter, derives a pure view model for the rendering layer, and
//! issues mutation requests back to the store. The cache is never
//! mutated optimistically: a write only becomes visible once the store
//! pushes the next snapshot, and a failed write never does.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::session::Session;
use crate::store::TaskStore;
use crate::task::{normalize_title, Filter, Summary, TaskDraft, TaskPatch, TaskRecord};

/// One visible task row.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub due_label: Option<String>,
}

/// Pure rendering input: visible rows under the active filter plus a
/// summary over the entire cached set.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub rows: Vec<TaskRow>,
    pub summary: Summary,
    pub filter: Filter,
}

pub struct Presenter {
    store: Arc<dyn TaskStore>,
    tasks: Vec<TaskRecord>,
    filter: Filter,
}

impl Presenter {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            filter: Filter::default(),
        }
    }

    /// Replace the cached list wholesale. Snapshots arrive already
    /// ordered by creation time descending; the presenter does not
    /// re-sort or merge.
    pub fn receive_snapshot(&mut self, tasks: Vec<TaskRecord>) {
        self.tasks = tasks;
    }

    /// Drop the cached list, e.g. after sign-out.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Derive the view model from the cached snapshot and active filter.
    pub fn view(&self) -> ViewModel {
        let rows = self
            .tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .map(|task| TaskRow {
                id: task.id.clone(),
                title: task.title.clone(),
                completed: task.completed,
                due_label: task.due_date.map(|due| format!("Due {due}")),
            })
            .collect();
        ViewModel {
            rows,
            summary: Summary::of(&self.tasks),
            filter: self.filter,
        }
    }

    /// Create a task. A missing session or blank title is refused
    /// locally with zero store calls; returns whether a request was
    /// issued.
    pub fn request_add(
        &self,
        session: Option<&Session>,
        title: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<bool> {
        let Some(session) = session else {
            return Ok(false);
        };
        let Some(title) = normalize_title(title) else {
            return Ok(false);
        };
        self.store
            .create(&session.namespace(), TaskDraft { title, due_date })?;
        Ok(true)
    }

    /// Set the completed flag on a single task.
    pub fn request_toggle(
        &self,
        session: Option<&Session>,
        id: &str,
        completed: bool,
    ) -> Result<bool> {
        let Some(session) = session else {
            return Ok(false);
        };
        self.store
            .update(&session.namespace(), id, TaskPatch::completed(completed))?;
        Ok(true)
    }

    /// Rename a single task; blank titles are refused locally.
    pub fn request_retitle(&self, session: Option<&Session>, id: &str, title: &str) -> Result<bool> {
        let Some(session) = session else {
            return Ok(false);
        };
        let Some(title) = normalize_title(title) else {
            return Ok(false);
        };
        self.store
            .update(&session.namespace(), id, TaskPatch::title(title))?;
        Ok(true)
    }

    /// Delete a single task.
    pub fn request_delete(&self, session: Option<&Session>, id: &str) -> Result<bool> {
        let Some(session) = session else {
            return Ok(false);
        };
        self.store.delete(&session.namespace(), id)?;
        Ok(true)
    }

    /// Batch-delete every cached task with `completed == true`, as one
    /// atomic request. No call at all when the set is empty.
    pub fn request_clear_completed(&self, session: Option<&Session>) -> Result<bool> {
        let Some(session) = session else {
            return Ok(false);
        };
        let ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.id.clone())
            .collect();
        if ids.is_empty() {
            return Ok(false);
        }
        self.store.delete_many(&session.namespace(), &ids)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Principal;
    use crate::store::{StoreMsg, Subscription};
    use chrono::Utc;
    use std::sync::mpsc;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create { title: String, due: Option<NaiveDate> },
        Update { id: String, title: Option<String>, completed: Option<bool> },
        Delete { id: String },
        DeleteMany { ids: Vec<String> },
    }

    /// Store double that records every call instead of persisting.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls").clone()
        }
    }

    impl TaskStore for RecordingStore {
        fn create(&self, _namespace: &str, draft: TaskDraft) -> Result<String> {
            self.calls.lock().expect("calls").push(Call::Create {
                title: draft.title,
                due: draft.due_date,
            });
            Ok("new-id".to_string())
        }

        fn update(&self, _namespace: &str, id: &str, patch: TaskPatch) -> Result<()> {
            self.calls.lock().expect("calls").push(Call::Update {
                id: id.to_string(),
                title: patch.title,
                completed: patch.completed,
            });
            Ok(())
        }

        fn delete(&self, _namespace: &str, id: &str) -> Result<()> {
            self.calls
                .lock()
                .expect("calls")
                .push(Call::Delete { id: id.to_string() });
            Ok(())
        }

        fn delete_many(&self, _namespace: &str, ids: &[String]) -> Result<()> {
            self.calls
                .lock()
                .expect("calls")
                .push(Call::DeleteMany { ids: ids.to_vec() });
            Ok(())
        }

        fn subscribe(&self, _namespace: &str) -> Result<Subscription> {
            let (_tx, rx) = mpsc::channel::<StoreMsg>();
            Ok(Subscription::new(rx, || {}))
        }
    }

    fn session() -> Session {
        Session {
            principal: Principal {
                id: "u1".to_string(),
                display_name: "Ada".to_string(),
                email: None,
                photo_url: None,
            },
        }
    }

    fn task(id: &str, title: &str, completed: bool) -> TaskRecord {
        let now = Utc::now();
        TaskRecord {
            id: id.to_string(),
            title: title.to_string(),
            completed,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixture() -> (Arc<RecordingStore>, Presenter) {
        let store = Arc::new(RecordingStore::default());
        let presenter = Presenter::new(store.clone());
        (store, presenter)
    }

    #[test]
    fn add_issues_exactly_one_create_with_trimmed_title() {
        let (store, presenter) = fixture();
        let due = NaiveDate::from_ymd_opt(2026, 9, 1);
        let issued = presenter
            .request_add(Some(&session()), "  Buy milk  ", due)
            .expect("add");
        assert!(issued);
        assert_eq!(
            store.calls(),
            vec![Call::Create {
                title: "Buy milk".to_string(),
                due,
            }]
        );
    }

    #[test]
    fn blank_titles_issue_zero_store_calls() {
        let (store, presenter) = fixture();
        let session = session();
        assert!(!presenter
            .request_add(Some(&session), "   ", None)
            .expect("add"));
        assert!(!presenter
            .request_retitle(Some(&session), "t1", "\t ")
            .expect("retitle"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn mutations_are_no_ops_without_a_session() {
        let (store, mut presenter) = fixture();
        presenter.receive_snapshot(vec![task("t1", "One", true)]);
        assert!(!presenter.request_add(None, "Buy milk", None).expect("add"));
        assert!(!presenter.request_toggle(None, "t1", true).expect("toggle"));
        assert!(!presenter.request_retitle(None, "t1", "New").expect("retitle"));
        assert!(!presenter.request_delete(None, "t1").expect("delete"));
        assert!(!presenter.request_clear_completed(None).expect("clear"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn toggle_and_retitle_issue_single_document_updates() {
        let (store, presenter) = fixture();
        let session = session();
        presenter
            .request_toggle(Some(&session), "t1", true)
            .expect("toggle");
        presenter
            .request_retitle(Some(&session), "t1", " New title ")
            .expect("retitle");
        assert_eq!(
            store.calls(),
            vec![
                Call::Update {
                    id: "t1".to_string(),
                    title: None,
                    completed: Some(true),
                },
                Call::Update {
                    id: "t1".to_string(),
                    title: Some("New title".to_string()),
                    completed: None,
                },
            ]
        );
    }

    #[test]
    fn clear_completed_batches_exactly_the_completed_ids() {
        let (store, mut presenter) = fixture();
        presenter.receive_snapshot(vec![
            task("t1", "One", true),
            task("t2", "Two", false),
            task("t3", "Three", true),
        ]);
        let issued = presenter
            .request_clear_completed(Some(&session()))
            .expect("clear");
        assert!(issued);
        assert_eq!(
            store.calls(),
            vec![Call::DeleteMany {
                ids: vec!["t1".to_string(), "t3".to_string()],
            }]
        );
    }

    #[test]
    fn clear_completed_with_nothing_completed_issues_no_call() {
        let (store, mut presenter) = fixture();
        presenter.receive_snapshot(vec![task("t1", "One", false)]);
        let issued = presenter
            .request_clear_completed(Some(&session()))
            .expect("clear");
        assert!(!issued);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn view_partitions_rows_by_filter_but_counts_everything() {
        let (_store, mut presenter) = fixture();
        presenter.receive_snapshot(vec![
            task("t1", "One", false),
            task("t2", "Two", true),
            task("t3", "Three", false),
        ]);

        presenter.set_filter(Filter::Active);
        let view = presenter.view();
        let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert_eq!(view.summary.total, 3);
        assert_eq!(view.summary.completed, 1);

        presenter.set_filter(Filter::Completed);
        let view = presenter.view();
        let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["t2"]);
        assert_eq!(view.summary.total, 3);

        presenter.set_filter(Filter::All);
        assert_eq!(presenter.view().rows.len(), 3);
    }

    #[test]
    fn single_open_task_renders_one_row_and_full_summary() {
        let (_store, mut presenter) = fixture();
        presenter.receive_snapshot(vec![task("1", "Buy milk", false)]);
        let view = presenter.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].title, "Buy milk");
        assert_eq!(
            view.summary.to_string(),
            "1 active \u{2022} 0 completed \u{2022} 1 total"
        );
    }

    #[test]
    fn completion_becomes_visible_only_through_the_next_snapshot() {
        let (store, mut presenter) = fixture();
        let session = session();
        presenter.receive_snapshot(vec![task("1", "Buy milk", false)]);
        presenter.set_filter(Filter::Active);

        presenter
            .request_toggle(Some(&session), "1", true)
            .expect("toggle");
        // No optimistic mutation: the row is still visible.
        assert_eq!(presenter.view().rows.len(), 1);
        assert_eq!(store.calls().len(), 1);

        presenter.receive_snapshot(vec![task("1", "Buy milk", true)]);
        let view = presenter.view();
        assert!(view.rows.is_empty());
        assert_eq!(
            view.summary.to_string(),
            "0 active \u{2022} 1 completed \u{2022} 1 total"
        );
    }

    #[test]
    fn due_dates_render_as_labels() {
        let (_store, mut presenter) = fixture();
        let mut record = task("t1", "One", false);
        record.due_date = NaiveDate::from_ymd_opt(2026, 8, 24);
        presenter.receive_snapshot(vec![record]);
        let view = presenter.view();
        assert_eq!(view.rows[0].due_label.as_deref(), Some("Due 2026-08-24"));
    }
}
