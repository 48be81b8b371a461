// --------------------------------------------------
// Handles API endpoints for task list commands
// and app settings.
//
// Responsibilities:
// - Create / edit / delete / reorder tasks
// - Selection and bulk actions
// - Get / update / reset app settings
//
// Every command answers with the full list snapshot. Unknown task ids
// are ignored (the snapshot simply shows no change); a blank id is a 400.
// --------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{AppSettings, Category, Priority, Task, TaskDraft, TaskId, TaskStatus};
use crate::todo_list::TodoList;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksResponse {
    pub tasks: Vec<TaskView>,
    pub selected_count: usize,
    pub zen_mode: bool,
}

pub fn task_views(list: &TodoList, tasks: impl IntoIterator<Item = Task>) -> Vec<TaskView> {
    tasks
        .into_iter()
        .map(|task| TaskView {
            selected: list.is_selected(&task.id),
            task,
        })
        .collect()
}

pub fn snapshot(list: &TodoList) -> TasksResponse {
    TasksResponse {
        tasks: task_views(list, list.tasks().iter().cloned()),
        selected_count: list.selected_count(),
        zen_mode: list.zen_mode(),
    }
}

fn parse_id(raw: &str) -> ApiResult<TaskId> {
    TaskId::parse(raw).ok_or_else(|| ApiError::BadRequest("missing task id".to_string()))
}

// Run one command under the list lock and answer with the result
fn command(state: &AppState, apply: impl FnOnce(&mut TodoList)) -> Json<TasksResponse> {
    let mut list = state.todos.lock();
    apply(&mut list);
    Json(snapshot(&list))
}

fn task_command(
    state: &AppState,
    raw_id: &str,
    apply: impl FnOnce(&mut TodoList, &TaskId),
) -> ApiResult<Json<TasksResponse>> {
    let id = parse_id(raw_id)?;
    Ok(command(state, |list| apply(list, &id)))
}

// -----------------------------
// GET /api/tasks
// -----------------------------
pub async fn get_tasks(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    Json(snapshot(&state.todos.lock()))
}

// -----------------------------
// POST /api/tasks
// POST /api/tasks/bulk
// -----------------------------
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Json<TasksResponse> {
    command(&state, |list| {
        list.add(draft);
    })
}

pub async fn create_tasks(
    State(state): State<Arc<AppState>>,
    Json(drafts): Json<Vec<TaskDraft>>,
) -> Json<TasksResponse> {
    command(&state, |list| {
        list.add_bulk(drafts);
    })
}

#[derive(Debug, Deserialize)]
pub struct EditInput {
    pub title: String,
    pub notes: Option<String>,
}

// -----------------------------
// PUT /api/tasks/:id
// Title plus optional notes, as the edit dialog submits them
// -----------------------------
pub async fn edit_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<EditInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.edit(id, &input.title, input.notes))
}

#[derive(Debug, Deserialize)]
pub struct TitleInput {
    pub title: String,
}

pub async fn set_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<TitleInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.set_title(id, &input.title))
}

#[derive(Debug, Deserialize)]
pub struct NotesInput {
    pub notes: Option<String>,
}

pub async fn set_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<NotesInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.set_notes(id, input.notes))
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: TaskStatus,
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<StatusInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.set_status(id, input.status))
}

#[derive(Debug, Deserialize)]
pub struct PriorityInput {
    pub priority: Priority,
}

pub async fn set_priority(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<PriorityInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.set_priority(id, input.priority))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueDateInput {
    #[serde(default, with = "crate::models::due_date")]
    pub due_date: Option<DateTime<FixedOffset>>,
}

// -----------------------------
// PUT /api/tasks/:id/due-date
// { "dueDate": null } clears it
// -----------------------------
pub async fn set_due_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<DueDateInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.set_due_date(id, input.due_date))
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub category: Category,
}

pub async fn set_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.set_category(id, input.category))
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Toggles status between NOT_COMPLETED and COMPLETED
// -----------------------------
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, TodoList::toggle_status)
}

pub async fn toggle_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, TodoList::toggle_reminder)
}

#[derive(Debug, Deserialize)]
pub struct TagInput {
    pub tag: String,
}

// -----------------------------
// POST   /api/tasks/:id/tags
// DELETE /api/tasks/:id/tags/:tag
// -----------------------------
pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<TagInput>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.add_tag(id, &input.tag))
}

pub async fn remove_tag(
    State(state): State<Arc<AppState>>,
    Path((id, tag)): Path<(String, String)>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, |list, id| list.remove_tag(id, &tag))
}

// -----------------------------
// DELETE /api/tasks/:id
// -----------------------------
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, TodoList::remove)
}

#[derive(Debug, Deserialize)]
pub struct IdsInput {
    pub ids: Vec<TaskId>,
}

// -----------------------------
// POST /api/tasks/delete
// POST /api/tasks/reorder
// -----------------------------
pub async fn delete_tasks(
    State(state): State<Arc<AppState>>,
    Json(input): Json<IdsInput>,
) -> Json<TasksResponse> {
    command(&state, |list| list.remove_bulk(&input.ids))
}

pub async fn reorder_tasks(
    State(state): State<Arc<AppState>>,
    Json(input): Json<IdsInput>,
) -> Json<TasksResponse> {
    command(&state, |list| list.reorder(&input.ids))
}

pub async fn clear_completed(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::clear_completed)
}

pub async fn clear_all(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::clear_all)
}

// -----------------------------
// Selection
// -----------------------------
pub async fn toggle_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TasksResponse>> {
    task_command(&state, &id, TodoList::toggle_selection)
}

pub async fn select_all(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::select_all)
}

pub async fn deselect_all(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::deselect_all)
}

pub async fn delete_selected(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::delete_selected)
}

pub async fn complete_selected(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::complete_selected)
}

pub async fn uncomplete_selected(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, TodoList::uncomplete_selected)
}

pub async fn toggle_zen_mode(State(state): State<Arc<AppState>>) -> Json<TasksResponse> {
    command(&state, |list| {
        list.toggle_zen_mode();
    })
}

// -----------------------------
// GET /api/settings
// PUT /api/settings
// POST /api/settings/reset
// -----------------------------
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<AppSettings> {
    Json(state.settings.lock().clone())
}

pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<AppSettings>,
) -> Json<AppSettings> {
    let mut current = state.settings.lock();
    *current = settings;
    state.persistence.save_settings(&current);
    Json(current.clone())
}

pub async fn reset_settings(State(state): State<Arc<AppState>>) -> Json<AppSettings> {
    let mut current = state.settings.lock();
    *current = AppSettings::default();
    state.persistence.save_settings(&current);
    tracing::info!("app settings reset to defaults");
    Json(current.clone())
}
