//! Task documents and local filtering.
//!
//! A task is a flat document owned by the remote store; the client only
//! ever holds read-only snapshots of it. Filtering and counting happen
//! locally over the cached snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A task document as delivered by the store.
///
/// Field names follow the wire format of the document database
/// (camelCase). `id` and both timestamps are assigned by the store;
/// `created_at` never changes, `updated_at` is refreshed on every
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a new task. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: Option<NaiveDate>,
}

/// Partial update applied to a single task document.
///
/// Absent fields are left untouched; the store refreshes `updated_at`
/// on apply.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Visibility filter over the cached task list. UI state only, never
/// persisted; defaults to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Whether a task is visible under this filter.
    pub fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Cycle order used by the filter keybinding.
    pub fn next(&self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }
}

/// Counts over the entire cached set, independent of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

impl Summary {
    pub fn of(tasks: &[TaskRecord]) -> Self {
        let total = tasks.len();
        let active = tasks.iter().filter(|task| !task.completed).count();
        Self {
            active,
            completed: total - active,
            total,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} active \u{2022} {} completed \u{2022} {} total",
            self.active, self.completed, self.total
        )
    }
}

/// Trim a title, returning `None` when nothing remains. Blank titles are
/// never sent to the store.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn filter_predicates_partition_by_completed() {
        let open = task("t1", "Buy milk", false);
        let done = task("t2", "Ship release", true);

        assert!(Filter::All.matches(&open));
        assert!(Filter::All.matches(&done));
        assert!(Filter::Active.matches(&open));
        assert!(!Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&open));
        assert!(Filter::Completed.matches(&done));
    }

    #[test]
    fn filter_cycles_through_all_states() {
        assert_eq!(Filter::All.next(), Filter::Active);
        assert_eq!(Filter::Active.next(), Filter::Completed);
        assert_eq!(Filter::Completed.next(), Filter::All);
    }

    #[test]
    fn summary_counts_full_set() {
        let tasks = vec![
            task("t1", "One", false),
            task("t2", "Two", true),
            task("t3", "Three", true),
        ];
        let summary = Summary::of(&tasks);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.to_string(),
            "1 active \u{2022} 2 completed \u{2022} 3 total"
        );
    }

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  Buy milk  ").as_deref(), Some("Buy milk"));
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("   \t "), None);
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = task("t1", "Buy milk", false);
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("due_date").is_none());
    }
}
