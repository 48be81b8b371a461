// --------------------------------------------------
// POST /api/create-todo-ai
//
// Sends free text to the text-generation service and adds each returned
// draft to the list, in order, with a fresh id and position. The list is
// only touched when the service reports success.
//
// Always answers with { success, message, todos }:
// - 400 for blank or malformed input
// - 503 when no service is configured
// - 502 when the service fails
// --------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::ai_client::validate_input;
use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{Task, TaskDraft};
use crate::todo_list::TodoList;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    pub todos: Vec<Task>,
}

impl GenerateResponse {
    fn failure(status: StatusCode, message: String) -> Response {
        let body = GenerateResponse {
            success: false,
            message,
            todos: Vec::new(),
        };
        (status, Json(body)).into_response()
    }

    fn from_error(err: ApiError) -> Response {
        if let ApiError::Internal(e) = &err {
            tracing::error!(error = ?e, "task generation failed");
        } else {
            tracing::warn!(error = %err, "task generation rejected");
        }
        Self::failure(err.status_code(), err.public_message())
    }
}

/// Add drafts one by one, in the order returned, and hand back the stored tasks.
pub fn ingest_drafts(list: &mut TodoList, drafts: Vec<TaskDraft>) -> Vec<Task> {
    drafts
        .into_iter()
        .map(|draft| list.add(draft))
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(|id| list.get(&id).cloned())
        .collect()
}

pub async fn create_todo_ai(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return GenerateResponse::from_error(ApiError::BadRequest(rejection.body_text()));
        }
    };

    let input = match validate_input(request.input.as_deref()) {
        Ok(input) => input,
        Err(e) => return GenerateResponse::from_error(e),
    };

    let Some(client) = &state.ai_client else {
        return GenerateResponse::from_error(ApiError::ServiceUnavailable(
            "Text generation is not configured".to_string(),
        ));
    };

    let envelope = match client.generate(input).await {
        Ok(envelope) => envelope,
        Err(e) => return GenerateResponse::from_error(e),
    };

    if !envelope.success {
        tracing::info!(message = %envelope.message, "text generation declined input");
        return GenerateResponse::failure(StatusCode::OK, envelope.message);
    }

    let todos = {
        let mut list = state.todos.lock();
        ingest_drafts(&mut list, envelope.todos)
    };
    tracing::info!(count = todos.len(), "generated tasks added");

    Json(GenerateResponse {
        success: true,
        message: envelope.message,
        todos,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use crate::store::Persistence;
    use pretty_assertions::assert_eq;

    #[test]
    fn ingest_appends_in_returned_order() {
        let mut list = TodoList::load(Persistence::new(Arc::new(MemoryKvStore::new())));
        list.add(TaskDraft::titled("existing"));

        let added = ingest_drafts(
            &mut list,
            vec![TaskDraft::titled("first"), TaskDraft::titled("second")],
        );

        let titles: Vec<&str> = added.iter().map(|t| t.title.as_str()).collect();
        let positions: Vec<i64> = added.iter().map(|t| t.position).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(positions, vec![1, 2]);
        assert_ne!(added[0].id, added[1].id);
        assert_eq!(list.len(), 3);
    }
}
