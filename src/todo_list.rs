//! The authoritative task collection.
//!
//! `TodoList` owns every [`Task`] plus the session-only state around it
//! (selection and zen mode). Each command that changes the collection is
//! written through [`Persistence`] before it returns. Commands naming an id
//! that no longer exists are silent no-ops: a view may still be showing a
//! task another command just deleted.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, FixedOffset};

use crate::filter::now_local;
use crate::models::{Category, Priority, Task, TaskDraft, TaskId, TaskStatus};
use crate::store::Persistence;

pub struct TodoList {
    // sorted by position, positions dense 0..N-1 after every structural change
    tasks: Vec<Task>,
    // ids only; never persisted
    selection: HashSet<TaskId>,
    zen_mode: bool,
    persistence: Persistence,
}

impl TodoList {
    /// Load the stored collection. Stored positions are normalised to a
    /// dense sequence in their stored order.
    pub fn load(persistence: Persistence) -> Self {
        let tasks = persistence.load_tasks();
        tracing::info!(count = tasks.len(), "loaded todos");
        let mut list = Self {
            tasks,
            selection: HashSet::new(),
            zen_mode: false,
            persistence,
        };
        list.resequence();
        list
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_selected(&self, id: &TaskId) -> bool {
        self.selection.contains(id)
    }

    // Derived on read so it cannot drift from the selection set.
    pub fn selected_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| self.selection.contains(&t.id))
            .count()
    }

    pub fn zen_mode(&self) -> bool {
        self.zen_mode
    }

    // -----------------------------
    // Creation
    // -----------------------------

    /// Seed the three welcome tasks into an empty list. Does nothing once
    /// any task exists.
    pub fn initialize(&mut self) {
        self.initialize_at(now_local());
    }

    pub fn initialize_at(&mut self, now: DateTime<FixedOffset>) {
        if !self.tasks.is_empty() {
            return;
        }
        tracing::info!("seeding sample todos");
        self.add_bulk(sample_drafts(now));
    }

    pub fn add(&mut self, draft: TaskDraft) -> TaskId {
        let position = self.next_position();
        let id = self.push_draft(draft, position);
        self.commit();
        id
    }

    /// Append drafts in order with contiguous positions after the current max.
    pub fn add_bulk(&mut self, drafts: impl IntoIterator<Item = TaskDraft>) -> Vec<TaskId> {
        let start = self.next_position();
        let ids: Vec<TaskId> = drafts
            .into_iter()
            .zip(start..)
            .map(|(draft, position)| self.push_draft(draft, position))
            .collect();
        self.commit();
        ids
    }

    fn next_position(&self) -> i64 {
        self.tasks.iter().map(|t| t.position).max().map_or(0, |max| max + 1)
    }

    fn push_draft(&mut self, draft: TaskDraft, position: i64) -> TaskId {
        let mut tags: Vec<String> = Vec::with_capacity(draft.tags.len());
        for tag in draft.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let id = TaskId::generate();
        let task = Task {
            id: id.clone(),
            title: draft.title.trim().to_string(),
            status: draft.status,
            category: draft.category,
            priority: draft.priority,
            tags,
            due_date: draft.due_date,
            reminder: draft.reminder,
            position,
            notes: draft.notes,
        };
        tracing::debug!(%id, position, "task added");
        self.tasks.push(task);
        id
    }

    // -----------------------------
    // Single-field updates
    // -----------------------------

    pub fn toggle_status(&mut self, id: &TaskId) {
        self.update(id, |t| t.status = t.status.toggled());
    }

    pub fn set_status(&mut self, id: &TaskId, status: TaskStatus) {
        self.update(id, |t| t.status = status);
    }

    pub fn set_priority(&mut self, id: &TaskId, priority: Priority) {
        self.update(id, |t| t.priority = priority);
    }

    pub fn set_due_date(&mut self, id: &TaskId, due_date: Option<DateTime<FixedOffset>>) {
        self.update(id, |t| t.due_date = due_date);
    }

    pub fn set_title(&mut self, id: &TaskId, title: &str) {
        self.update(id, |t| t.title = title.trim().to_string());
    }

    pub fn set_notes(&mut self, id: &TaskId, notes: Option<String>) {
        self.update(id, |t| t.notes = notes);
    }

    /// Title and notes together, as the edit dialog submits them.
    /// `None` leaves existing notes untouched.
    pub fn edit(&mut self, id: &TaskId, title: &str, notes: Option<String>) {
        self.update(id, |t| {
            t.title = title.trim().to_string();
            if let Some(notes) = notes {
                t.notes = Some(notes);
            }
        });
    }

    pub fn set_category(&mut self, id: &TaskId, category: Category) {
        self.update(id, |t| t.category = category);
    }

    pub fn toggle_reminder(&mut self, id: &TaskId) {
        self.update(id, |t| t.reminder = !t.reminder);
    }

    pub fn add_tag(&mut self, id: &TaskId, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        self.update(id, |t| {
            if !t.has_tag(tag) {
                t.tags.push(tag.to_string());
            }
        });
    }

    pub fn remove_tag(&mut self, id: &TaskId, tag: &str) {
        let tag = tag.trim();
        self.update(id, |t| t.tags.retain(|existing| existing != tag));
    }

    fn update(&mut self, id: &TaskId, apply: impl FnOnce(&mut Task)) {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(%id, "update ignored, task not found");
            return;
        };
        apply(task);
        self.commit();
    }

    // -----------------------------
    // Ordering
    // -----------------------------

    /// Give each listed id the position of its index in `ids`.
    ///
    /// Ids not in the collection are ignored; if an id repeats, its last
    /// occurrence wins. Tasks left out of `ids` keep their previous
    /// position, sorting after any listed task that claimed the same slot,
    /// and the whole collection is then re-sequenced.
    pub fn reorder(&mut self, ids: &[TaskId]) {
        let wanted: HashMap<&TaskId, i64> = ids.iter().zip(0_i64..).collect();

        for task in &mut self.tasks {
            if let Some(&position) = wanted.get(&task.id) {
                task.position = position;
            }
        }
        self.tasks
            .sort_by_key(|t| (t.position, !wanted.contains_key(&t.id)));
        self.resequence();
        self.commit();
    }

    // -----------------------------
    // Removal
    // -----------------------------

    pub fn remove(&mut self, id: &TaskId) {
        self.remove_where(|t| &t.id == id);
    }

    pub fn remove_bulk(&mut self, ids: &[TaskId]) {
        let ids: HashSet<&TaskId> = ids.iter().collect();
        self.remove_where(|t| ids.contains(&t.id));
    }

    pub fn clear_completed(&mut self) {
        self.remove_where(Task::is_completed);
    }

    pub fn clear_all(&mut self) {
        self.tasks.clear();
        self.selection.clear();
        self.commit();
    }

    fn remove_where(&mut self, mut doomed: impl FnMut(&Task) -> bool) {
        let before = self.tasks.len();
        let selection = &mut self.selection;
        self.tasks.retain(|t| {
            let remove = doomed(t);
            if remove {
                selection.remove(&t.id);
            }
            !remove
        });

        if self.tasks.len() == before {
            return;
        }
        tracing::debug!(removed = before - self.tasks.len(), "tasks removed");
        self.resequence();
        self.commit();
    }

    // -----------------------------
    // Selection (session only)
    // -----------------------------

    pub fn toggle_selection(&mut self, id: &TaskId) {
        if self.get(id).is_none() {
            return;
        }
        if !self.selection.remove(id) {
            self.selection.insert(id.clone());
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.tasks.iter().map(|t| t.id.clone()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn delete_selected(&mut self) {
        let selection = std::mem::take(&mut self.selection);
        self.remove_where(|t| selection.contains(&t.id));
    }

    pub fn complete_selected(&mut self) {
        self.set_selected_status(TaskStatus::Completed);
    }

    pub fn uncomplete_selected(&mut self) {
        self.set_selected_status(TaskStatus::NotCompleted);
    }

    fn set_selected_status(&mut self, status: TaskStatus) {
        for task in &mut self.tasks {
            if self.selection.contains(&task.id) {
                task.status = status;
            }
        }
        self.commit();
    }

    pub fn toggle_zen_mode(&mut self) -> bool {
        self.zen_mode = !self.zen_mode;
        self.zen_mode
    }

    // -----------------------------
    // Internals
    // -----------------------------

    fn resequence(&mut self) {
        self.tasks.sort_by_key(|t| t.position);
        for (task, position) in self.tasks.iter_mut().zip(0_i64..) {
            task.position = position;
        }
    }

    fn commit(&self) {
        self.persistence.save_tasks(&self.tasks);
    }
}

fn sample_drafts(now: DateTime<FixedOffset>) -> Vec<TaskDraft> {
    vec![
        TaskDraft {
            title: "Welcome to EasyTodo! Double-click to edit this task".to_string(),
            category: Category::Admin,
            tags: vec!["sample".to_string()],
            ..TaskDraft::default()
        },
        TaskDraft {
            title: "Drag and drop tasks to reorder them".to_string(),
            category: Category::Admin,
            priority: Priority::Low,
            tags: vec!["tutorial".to_string()],
            ..TaskDraft::default()
        },
        TaskDraft {
            title: "Important tasks are highlighted with red".to_string(),
            category: Category::Admin,
            priority: Priority::High,
            tags: vec!["important".to_string()],
            due_date: Some(now + Duration::days(1)),
            reminder: true,
            ..TaskDraft::default()
        },
    ]
}
