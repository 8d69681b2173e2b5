//! Session cookie: attach, read, clear.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use time::Duration;

pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Cookie attribute policy, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub max_age: Duration,
    pub secure: bool,
}

impl CookiePolicy {
    fn base_attributes(&self) -> &'static str {
        if self.secure {
            "Path=/; HttpOnly; SameSite=Strict; Secure"
        } else {
            "Path=/; HttpOnly; SameSite=Strict"
        }
    }

    pub fn session_cookie(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&format!(
            "{SESSION_COOKIE_NAME}={token}; {}; Max-Age={}",
            self.base_attributes(),
            self.max_age.whole_seconds()
        ))
    }

    pub fn cleared_cookie(&self) -> HeaderValue {
        let value = format!(
            "{SESSION_COOKIE_NAME}=; {}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.base_attributes()
        );
        // Built only from constants, always a valid header value.
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    pub fn attach(&self, headers: &mut HeaderMap, token: &str) -> Result<(), InvalidHeaderValue> {
        headers.append(SET_COOKIE, self.session_cookie(token)?);
        Ok(())
    }

    pub fn clear(&self, headers: &mut HeaderMap) {
        headers.append(SET_COOKIE, self.cleared_cookie());
    }
}

/// Session token from the request's `Cookie` headers; blank values count as absent.
pub fn read(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
