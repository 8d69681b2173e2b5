//! Request gate. Runs ahead of every handler and is the only place that
//! decides whether a request is authenticated.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{
    claims::Claims,
    cookie,
    extractors::AuthSession,
    jwt::Verification,
};
use crate::{error::AppError, state::AppState};

pub const LANDING_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";
const API_PREFIX: &str = "/api/";

/// Reachable without a session. Must list every new public route.
const PUBLIC_PATHS: &[&str] = &["/", "/login", "/signup", "/api/auth/login", "/api/auth/signup"];

/// Never gated and never redirected.
const OPEN_PATHS: &[&str] = &["/health"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Open,
    Public,
    Api,
    Page,
}

pub fn classify(path: &str) -> PathClass {
    if OPEN_PATHS.contains(&path) {
        PathClass::Open
    } else if PUBLIC_PATHS.contains(&path) {
        PathClass::Public
    } else if path.starts_with(API_PREFIX) {
        PathClass::Api
    } else {
        PathClass::Page
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Missing,
    Invalid,
    Valid(Claims),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass through, with the resolved session for protected routes.
    Allow(Option<Claims>),
    RedirectToLanding,
    RejectUnauthenticated,
    RedirectToLogin,
    ClearAndRedirectToLogin,
}

pub fn decide(class: PathClass, credential: Credential) -> GateDecision {
    match (class, credential) {
        (PathClass::Open, _) => GateDecision::Allow(None),
        (PathClass::Public, Credential::Valid(_)) => GateDecision::RedirectToLanding,
        (PathClass::Public, _) => GateDecision::Allow(None),
        (PathClass::Api, Credential::Missing) => GateDecision::RejectUnauthenticated,
        (PathClass::Page, Credential::Missing) => GateDecision::RedirectToLogin,
        (_, Credential::Invalid) => GateDecision::ClearAndRedirectToLogin,
        (_, Credential::Valid(claims)) => GateDecision::Allow(Some(claims)),
    }
}

/// Cookie -> signature/expiry -> live session row.
async fn resolve_credential(state: &AppState, headers: &HeaderMap) -> Result<Credential, AppError> {
    let Some(token) = cookie::read(headers) else {
        return Ok(Credential::Missing);
    };

    let now = OffsetDateTime::now_utc();
    let claims = match state.tokens.verify_at(&token, now) {
        Verification::Valid(claims) => claims,
        Verification::Invalid(reason) => {
            debug!(?reason, "invalid session token");
            return Ok(Credential::Invalid);
        }
    };

    if state
        .store
        .session_active(claims.jti, claims.sub, now)
        .await?
    {
        Ok(Credential::Valid(claims))
    } else {
        debug!(user_id = claims.sub, jti = %claims.jti, "session revoked or expired");
        Ok(Credential::Invalid)
    }
}

pub async fn gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let class = classify(req.uri().path());

    let credential = if class == PathClass::Open {
        Credential::Missing
    } else {
        match resolve_credential(&state, req.headers()).await {
            Ok(c) => c,
            Err(e) => return e.into_response(),
        }
    };

    match decide(class, credential) {
        GateDecision::Allow(session) => {
            if let Some(claims) = session {
                req.extensions_mut().insert(AuthSession::from(claims));
            }
            next.run(req).await
        }
        GateDecision::RedirectToLanding => Redirect::to(LANDING_PATH).into_response(),
        GateDecision::RejectUnauthenticated => {
            AppError::Unauthenticated("Authentication required".into()).into_response()
        }
        GateDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        GateDecision::ClearAndRedirectToLogin => {
            info!(path = %req.uri().path(), "clearing dead session cookie");
            let mut res = Redirect::to(LOGIN_PATH).into_response();
            state.cookie_policy().clear(res.headers_mut());
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims() -> Claims {
        Claims {
            v: 1,
            sub: 1,
            email: "a@b.com".into(),
            jti: Uuid::new_v4(),
            iat: 0,
            exp: 1,
            iss: "i".into(),
            aud: "a".into(),
        }
    }

    #[test]
    fn classifies_paths() {
        assert_eq!(classify("/health"), PathClass::Open);
        assert_eq!(classify("/"), PathClass::Public);
        assert_eq!(classify("/login"), PathClass::Public);
        assert_eq!(classify("/api/auth/signup"), PathClass::Public);
        assert_eq!(classify("/api/auth/logout"), PathClass::Api);
        assert_eq!(classify("/api/tasks"), PathClass::Api);
        assert_eq!(classify("/dashboard"), PathClass::Page);
        assert_eq!(classify("/login/extra"), PathClass::Page);
    }

    #[test]
    fn public_paths() {
        assert_eq!(
            decide(PathClass::Public, Credential::Valid(claims())),
            GateDecision::RedirectToLanding
        );
        assert_eq!(
            decide(PathClass::Public, Credential::Missing),
            GateDecision::Allow(None)
        );
        assert_eq!(
            decide(PathClass::Public, Credential::Invalid),
            GateDecision::Allow(None)
        );
    }

    #[test]
    fn protected_paths_without_credential() {
        assert_eq!(
            decide(PathClass::Api, Credential::Missing),
            GateDecision::RejectUnauthenticated
        );
        assert_eq!(
            decide(PathClass::Page, Credential::Missing),
            GateDecision::RedirectToLogin
        );
    }

    #[test]
    fn protected_paths_with_dead_credential_clear_cookie() {
        for class in [PathClass::Api, PathClass::Page] {
            assert_eq!(
                decide(class, Credential::Invalid),
                GateDecision::ClearAndRedirectToLogin
            );
        }
    }

    #[test]
    fn protected_paths_with_valid_credential_pass_identity() {
        let c = claims();
        assert_eq!(
            decide(PathClass::Api, Credential::Valid(c.clone())),
            GateDecision::Allow(Some(c))
        );
    }

    #[test]
    fn open_paths_ignore_credentials() {
        assert_eq!(
            decide(PathClass::Open, Credential::Valid(claims())),
            GateDecision::Allow(None)
        );
        assert_eq!(
            decide(PathClass::Open, Credential::Invalid),
            GateDecision::Allow(None)
        );
    }
}
