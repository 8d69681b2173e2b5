use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{TaskInput, TaskQuery},
    repo_types::{Task, TaskFields},
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiResult, AppError},
    http::{created, parse_path_id, ApiResponse, JsonBody},
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

/// Referenced project and category must belong to the caller too.
async fn check_refs(state: &AppState, user_id: i64, fields: &TaskFields) -> ApiResult<()> {
    if let Some(project_id) = fields.project_id {
        if state.store.get_project(user_id, project_id).await?.is_none() {
            warn!(user_id, project_id, "task references unknown project");
            return Err(AppError::validation("Project not found"));
        }
    }
    if let Some(category_id) = fields.category_id {
        if state.store.get_category(user_id, category_id).await?.is_none() {
            warn!(user_id, category_id, "task references unknown category");
            return Err(AppError::validation("Category not found"));
        }
    }
    Ok(())
}

#[instrument(skip(state, user, query), fields(user_id = user.user_id))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<TaskQuery>,
) -> ApiResult<ApiResponse<Vec<Task>>> {
    let filter = query.filter()?;
    let rows = state.store.list_tasks(user.user_id, filter).await?;
    Ok(ApiResponse::data(rows))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Task>> {
    let id = parse_path_id(&id)?;
    let row = state
        .store
        .get_task(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    Ok(ApiResponse::data(row))
}

#[instrument(skip(state, user, input), fields(user_id = user.user_id))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(input): JsonBody<TaskInput>,
) -> ApiResult<Response> {
    let fields = input.validate()?;
    check_refs(&state, user.user_id, &fields).await?;
    let row = state.store.create_task(user.user_id, &fields).await?;
    info!(task_id = row.id, "task created");
    Ok(created(row))
}

#[instrument(skip(state, user, input), fields(user_id = user.user_id))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<TaskInput>,
) -> ApiResult<ApiResponse<Task>> {
    let id = parse_path_id(&id)?;
    let fields = input.validate()?;
    check_refs(&state, user.user_id, &fields).await?;
    let row = state
        .store
        .update_task(user.user_id, id, &fields)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    Ok(ApiResponse::data(row))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_path_id(&id)?;
    if !state.store.delete_task(user.user_id, id).await? {
        return Err(AppError::not_found("Task not found"));
    }
    info!(task_id = id, "task deleted");
    Ok(ApiResponse::message("Task deleted successfully"))
}
