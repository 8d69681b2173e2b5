use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use super::dto::Dashboard;
use crate::{
    auth::extractors::AuthUser, error::ApiResult, http::ApiResponse, state::AppState,
    tasks::repo_types::TaskFilter,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(get_dashboard))
}

/// Everything the caller owns plus aggregate counts.
#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<ApiResponse<Dashboard>> {
    let (tasks, projects, categories) = tokio::try_join!(
        state.store.list_tasks(user.user_id, TaskFilter::default()),
        state.store.list_projects(user.user_id),
        state.store.list_categories(user.user_id),
    )?;
    Ok(ApiResponse::data(Dashboard::new(tasks, projects, categories)))
}
