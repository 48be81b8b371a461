use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use parking_lot::Mutex;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::ai_client::AiClient;
use crate::models::AppSettings;
use crate::store::Persistence;
use crate::todo_list::TodoList;
use crate::{routes_ai, routes_tasks, routes_view};

/// Shared application state.
///
/// Commands are applied one at a time under the list mutex, each running
/// to completion (persistence write included) before the next starts.
pub struct AppState {
    pub todos: Mutex<TodoList>,
    pub settings: Mutex<AppSettings>,
    pub persistence: Persistence,
    pub ai_client: Option<AiClient>,
}

impl AppState {
    pub fn new(persistence: Persistence, ai_client: Option<AiClient>) -> Arc<Self> {
        let todos = TodoList::load(persistence.clone());
        let settings = persistence.load_settings();
        Arc::new(Self {
            todos: Mutex::new(todos),
            settings: Mutex::new(settings),
            persistence,
            ai_client,
        })
    }
}

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route("/tasks/bulk", post(routes_tasks::create_tasks))
        .route("/tasks/delete", post(routes_tasks::delete_tasks))
        .route("/tasks/reorder", post(routes_tasks::reorder_tasks))
        .route("/tasks/clear-completed", post(routes_tasks::clear_completed))
        .route("/tasks/clear", post(routes_tasks::clear_all))
        .route("/tasks/:id", put(routes_tasks::edit_task).delete(routes_tasks::delete_task))
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        .route("/tasks/:id/title", put(routes_tasks::set_title))
        .route("/tasks/:id/notes", put(routes_tasks::set_notes))
        .route("/tasks/:id/status", put(routes_tasks::set_status))
        .route("/tasks/:id/priority", put(routes_tasks::set_priority))
        .route("/tasks/:id/due-date", put(routes_tasks::set_due_date))
        .route("/tasks/:id/category", put(routes_tasks::set_category))
        .route("/tasks/:id/reminder/toggle", post(routes_tasks::toggle_reminder))
        .route("/tasks/:id/tags", post(routes_tasks::add_tag))
        .route("/tasks/:id/tags/:tag", delete(routes_tasks::remove_tag))
        // selection
        .route("/tasks/:id/select/toggle", post(routes_tasks::toggle_selection))
        .route("/selection/all", post(routes_tasks::select_all))
        .route("/selection/none", post(routes_tasks::deselect_all))
        .route("/selection/delete", post(routes_tasks::delete_selected))
        .route("/selection/complete", post(routes_tasks::complete_selected))
        .route("/selection/uncomplete", post(routes_tasks::uncomplete_selected))
        .route("/zen-mode/toggle", post(routes_tasks::toggle_zen_mode))
        // views
        .route("/view", get(routes_view::get_view))
        .route("/reminders", get(routes_view::get_reminders))
        // settings
        .route("/settings", get(routes_tasks::get_settings).put(routes_tasks::put_settings))
        .route("/settings/reset", post(routes_tasks::reset_settings))
        // text generation
        .route("/create-todo-ai", post(routes_ai::create_todo_ai))
}

/// Build the application: JSON API under `/api`, static UI everywhere else.
pub fn create_app(state: Arc<AppState>, static_dir: &Path) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    Router::new()
        .nest("/api", api_router())
        .fallback_service(ServeDir::new(static_dir))
        .layer(trace_layer)
        .with_state(state)
}
