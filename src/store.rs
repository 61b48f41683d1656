// Task state container with storage-backed persistence

use crate::filter::FilterCriterion;
use crate::models::{Task, TaskStats, normalize_text};
use crate::storage::Storage;
use eyre::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

/// Storage key holding the serialized task collection
pub const TASKS_KEY: &str = "tasks";

/// Single owner of the task list, its view state and its persistence
///
/// Every mutator ends in `commit()`, which writes the whole collection to
/// the injected storage. A failed write is logged and remembered but never
/// rolls back the in-memory state.
pub struct TaskStore<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    filter: FilterCriterion,
    search_term: String,
    editing: Option<String>,
    last_persist_error: Option<String>,
}

impl<S: Storage> TaskStore<S> {
    /// Load the task collection from `storage`
    ///
    /// Missing, unreadable or corrupt data yields an empty collection.
    pub fn open(storage: S) -> Self {
        let tasks = Self::load_tasks(&storage);
        info!(count = tasks.len(), "Opened task store");

        Self {
            storage,
            tasks,
            filter: FilterCriterion::default(),
            search_term: String::new(),
            editing: None,
            last_persist_error: None,
        }
    }

    fn load_tasks(storage: &S) -> Vec<Task> {
        let raw = match storage.read(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored tasks, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read stored tasks, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => Self::drop_invalid(tasks),
            Err(e) => {
                warn!(error = ?e, "Failed to parse stored tasks, starting empty");
                Vec::new()
            }
        }
    }

    /// Skip records with blank or untrimmed text and any repeated id
    fn drop_invalid(tasks: Vec<Task>) -> Vec<Task> {
        let mut seen = HashSet::new();
        tasks
            .into_iter()
            .filter(|task| {
                if normalize_text(&task.text).as_deref() != Some(task.text.as_str()) {
                    warn!(id = %task.id, text = ?task.text, "Skipping stored task with invalid text");
                    return false;
                }
                if !seen.insert(task.id.clone()) {
                    warn!(id = %task.id, "Skipping stored task with duplicate id");
                    return false;
                }
                true
            })
            .collect()
    }

    /// Get a reference to the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get a mutable reference to the underlying storage
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // ========================================================================
    // Read API
    // ========================================================================

    /// The full collection in display order, ignoring filter and search
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> FilterCriterion {
        self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The task currently being edited, resolved by id
    pub fn edit_task(&self) -> Option<&Task> {
        self.editing.as_deref().and_then(|id| self.get(id))
    }

    /// Tasks matching both the active filter and the search term
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.matches(t) && t.matches(&self.search_term))
            .collect()
    }

    /// Counts over the full collection
    pub fn task_stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Message of the most recent failed write, cleared by the next successful one
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new task; `false` when the text is blank
    pub fn add_task(&mut self, raw_text: &str) -> bool {
        let Some(text) = normalize_text(raw_text) else {
            debug!("add_task: rejected blank text");
            return false;
        };

        let task = Task::new(text);
        debug!(id = %task.id, "add_task: appending");
        self.tasks.push(task);
        self.commit();
        true
    }

    /// Replace a task's text; `false` when the text is blank or the id is unknown
    pub fn edit_task_text(&mut self, id: &str, raw_text: &str) -> bool {
        let Some(text) = normalize_text(raw_text) else {
            debug!(id, "edit_task_text: rejected blank text");
            return false;
        };
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "edit_task_text: unknown id");
            return false;
        };

        task.text = text;
        self.clear_edit_cursor_for(id);
        self.commit();
        true
    }

    pub fn toggle_task(&mut self, id: &str) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        task.completed = !task.completed;
        debug!(id, completed = task.completed, "toggle_task");
        self.commit();
    }

    pub fn delete_task(&mut self, id: &str) {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return;
        };

        self.tasks.remove(index);
        self.clear_edit_cursor_for(id);
        debug!(id, "delete_task");
        self.commit();
    }

    /// Move the task at `from` to `to`, both positions in the full collection
    ///
    /// An out-of-range `from` is ignored and an out-of-range `to` is clamped
    /// to the last position.
    pub fn reorder_tasks(&mut self, from: usize, to: usize) {
        let len = self.tasks.len();
        if from >= len {
            warn!(from, len, "reorder_tasks: source index out of range");
            return;
        }

        let to = to.min(len - 1);
        if from == to {
            return;
        }

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        debug!(from, to, "reorder_tasks");
        self.commit();
    }

    /// Reorder using positions in the current filtered view
    pub fn reorder_visible(&mut self, drag: usize, drop: usize) {
        if drag == drop {
            return;
        }

        let (drag_id, drop_id) = {
            let visible = self.filtered_tasks();
            match (visible.get(drag), visible.get(drop)) {
                (Some(a), Some(b)) => (a.id.clone(), b.id.clone()),
                _ => return,
            }
        };

        let from = self.tasks.iter().position(|t| t.id == drag_id);
        let to = self.tasks.iter().position(|t| t.id == drop_id);
        if let (Some(from), Some(to)) = (from, to) {
            self.reorder_tasks(from, to);
        }
    }

    /// Complete every pending task; always persists, even when nothing was pending
    pub fn mark_all_completed(&mut self) {
        let mut changed = 0;
        for task in self.tasks.iter_mut().filter(|t| !t.completed) {
            task.completed = true;
            changed += 1;
        }

        debug!(changed, "mark_all_completed");
        self.commit();
    }

    /// Drop every pending task, returning how many were removed
    pub fn remove_pending_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            if self.edit_task().is_none() {
                self.editing = None;
            }
            debug!(removed, "remove_pending_tasks");
            self.commit();
        }
        removed
    }

    // ========================================================================
    // View state
    // ========================================================================

    pub fn set_filter(&mut self, criterion: FilterCriterion) {
        self.filter = criterion;
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_lowercase();
    }

    /// Point the edit cursor at `id`; unknown ids clear it
    pub fn set_edit_task(&mut self, id: Option<&str>) {
        self.editing = id.filter(|id| self.get(id).is_some()).map(str::to_string);
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn clear_edit_cursor_for(&mut self, id: &str) {
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
    }

    /// Write the full collection to storage, keeping memory authoritative on failure
    fn commit(&mut self) {
        match self.persist() {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                error!(error = ?e, count = self.tasks.len(), "Failed to persist tasks, continuing in memory");
                self.last_persist_error = Some(format!("{:#}", e));
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks).context("Failed to serialize tasks")?;
        self.storage
            .write(TASKS_KEY, &json)
            .context("Failed to write tasks to storage")
    }
}
