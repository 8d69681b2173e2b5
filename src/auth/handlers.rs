use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::{
    claims::Identity,
    dto::{LoginRequest, LoginResponse, LogoutResponse, PublicUser, SignupRequest, SignupResponse},
    extractors::{AuthUser, CurrentSession},
    password::{hash_password_blocking, verify_password_blocking, MIN_PASSWORD_LEN},
    repo_types::{NewUser, User},
};
use crate::{
    db::StoreError,
    error::{ApiResult, AppError, AuthError},
    http::ApiResponse,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/api/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload
        .map(|Json(v)| v)
        .map_err(|_| AuthError(AppError::validation("Invalid request body")))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), AuthError> {
    let payload = body(payload)?;

    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default().to_string();
    let password = payload.password.unwrap_or_default();
    if email.is_empty() || name.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email, password, and name are required.").into());
    }

    if !is_valid_email(&email) {
        warn!(%email, "signup with invalid email");
        return Err(AppError::validation("Invalid email format.").into());
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!(%email, "signup password too short");
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        ))
        .into());
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("User already exists.".into()).into());
    }

    let password_hash = hash_password_blocking(password).await?;

    let user = state
        .store
        .create_user(NewUser {
            name: &name,
            email: &email,
            password_hash: &password_hash,
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent signup
            StoreError::UniqueViolation(_) => AppError::Conflict("User already exists.".into()),
            other => other.into(),
        })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully.",
            user,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let payload = body(payload)?;

    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and Password are required.").into());
    }

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()).into());
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(%email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()).into());
    }

    let identity = Identity {
        user_id: user.id,
        email: user.email.clone(),
    };
    let issued = state.tokens.issue(&identity)?;

    let now = OffsetDateTime::now_utc();
    state
        .store
        .create_session(issued.claims.jti, user.id, issued.expires_at())
        .await?;
    match state.store.purge_expired_sessions(now).await {
        Ok(0) => {}
        Ok(n) => info!(purged = n, "expired sessions removed"),
        Err(e) => warn!(error = %e, user_id = user.id, "purging expired sessions failed"),
    }

    let mut headers = HeaderMap::new();
    state
        .cookie_policy()
        .attach(&mut headers, &issued.token)
        .map_err(|e| anyhow::anyhow!("session cookie header: {e}"))?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(LoginResponse {
            message: "Login successful",
            user: PublicUser::from(user),
        }),
    )
        .into_response())
}

/// Deletes the session row and always clears the cookie.
#[instrument(skip(state, session), fields(user_id = session.identity.user_id))]
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Response {
    let mut headers = HeaderMap::new();
    state.cookie_policy().clear(&mut headers);

    match state
        .store
        .delete_session(session.token_id, session.identity.user_id)
        .await
    {
        Ok(removed) => {
            info!(removed, "user logged out");
            (
                headers,
                Json(LogoutResponse {
                    message: "Logged out successfully",
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "delete session failed");
            (headers, AuthError::from(e)).into_response()
        }
    }
}

#[instrument(skip(state, identity), fields(user_id = identity.user_id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<ApiResponse<User>> {
    let user = state
        .store
        .find_user_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ApiResponse::data(user))
}
