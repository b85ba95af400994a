use axum::extract::{Path, State};
use axum::Json;

use crate::tasks::{TaskId, TaskStatus};
use crate::web::error::{AppError, AppResult};
use crate::web::state::AppState;

/// GET /api/tasks/{task_id}
pub async fn task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<TaskStatus>> {
    TaskId::parse(&task_id)
        .and_then(|id| state.tasks.get(id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound("unknown task".to_string()))
}
