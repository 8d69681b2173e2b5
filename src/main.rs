mod app;
mod auth;
mod categories;
mod config;
mod dashboard;
mod db;
mod error;
mod http;
mod projects;
mod state;
mod tasks;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "taskboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    tracing::info!(
        session_ttl_minutes = app_state.config.auth.session_ttl_minutes,
        cookie_secure = app_state.config.auth.cookie_secure,
        "configuration loaded"
    );

    app::serve(app::build_app(app_state)).await
}
