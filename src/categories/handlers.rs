use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use super::{dto::CategoryInput, repo_types::Category};
use crate::{
    auth::extractors::AuthUser,
    db::StoreError,
    error::{ApiResult, AppError},
    http::{created, parse_path_id, required_text, ApiResponse, JsonBody},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

fn duplicate_name(e: StoreError) -> AppError {
    match e {
        StoreError::UniqueViolation(_) => AppError::Conflict("Category already exists".into()),
        other => other.into(),
    }
}

fn category_name(input: &CategoryInput) -> ApiResult<String> {
    required_text(input.name.as_deref())
        .ok_or_else(|| AppError::validation("Category name is required"))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<ApiResponse<Vec<Category>>> {
    let rows = state.store.list_categories(user.user_id).await?;
    Ok(ApiResponse::data(rows))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Category>> {
    let id = parse_path_id(&id)?;
    let row = state
        .store
        .get_category(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(ApiResponse::data(row))
}

#[instrument(skip(state, user, input), fields(user_id = user.user_id))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(input): JsonBody<CategoryInput>,
) -> ApiResult<Response> {
    let name = category_name(&input)?;
    let row = state
        .store
        .create_category(user.user_id, &name)
        .await
        .map_err(duplicate_name)?;
    info!(category_id = row.id, "category created");
    Ok(created(row))
}

#[instrument(skip(state, user, input), fields(user_id = user.user_id))]
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> ApiResult<ApiResponse<Category>> {
    let id = parse_path_id(&id)?;
    let name = category_name(&input)?;
    let row = state
        .store
        .update_category(user.user_id, id, &name)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(ApiResponse::data(row))
}

#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_path_id(&id)?;
    if !state.store.delete_category(user.user_id, id).await? {
        return Err(AppError::not_found("Category not found"));
    }
    info!(category_id = id, "category deleted");
    Ok(ApiResponse::message("Category deleted successfully"))
}
