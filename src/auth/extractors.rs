use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::claims::{Claims, Identity};
use crate::error::AppError;

/// Session resolved by the gate and stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
    pub token_id: Uuid,
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self {
            identity: claims.identity(),
            token_id: claims.jti,
        }
    }
}

fn session_from(parts: &Parts) -> Result<AuthSession, AppError> {
    parts
        .extensions
        .get::<AuthSession>()
        .cloned()
        .ok_or_else(|| AppError::Unauthenticated("Authentication required".into()))
}

/// Identity of the authenticated caller.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from(parts).map(|s| AuthUser(s.identity))
    }
}

/// Full session, for handlers that act on the session row itself.
pub struct CurrentSession(pub AuthSession);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from(parts).map(CurrentSession)
    }
}
