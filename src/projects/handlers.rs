use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use super::{dto::ProjectInput, repo_types::Project};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiResult, AppError},
    http::{created, parse_path_id, ApiResponse, JsonBody},
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<ApiResponse<Vec<Project>>> {
    let rows = state.store.list_projects(user.user_id).await?;
    Ok(ApiResponse::data(rows))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Project>> {
    let id = parse_path_id(&id)?;
    let row = state
        .store
        .get_project(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    Ok(ApiResponse::data(row))
}

#[instrument(skip(state, user, input), fields(user_id = user.user_id))]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(input): JsonBody<ProjectInput>,
) -> ApiResult<Response> {
    let fields = input.validate()?;
    let row = state.store.create_project(user.user_id, &fields).await?;
    info!(project_id = row.id, "project created");
    Ok(created(row))
}

#[instrument(skip(state, user, input), fields(user_id = user.user_id))]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ProjectInput>,
) -> ApiResult<ApiResponse<Project>> {
    let id = parse_path_id(&id)?;
    let fields = input.validate()?;
    let row = state
        .store
        .update_project(user.user_id, id, &fields)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    Ok(ApiResponse::data(row))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_path_id(&id)?;
    if !state.store.delete_project(user.user_id, id).await? {
        return Err(AppError::not_found("Project not found"));
    }
    info!(project_id = id, "project deleted");
    Ok(ApiResponse::message("Project deleted"))
}
