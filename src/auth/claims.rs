use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current payload schema version. Tokens carrying any other value are rejected.
pub const CLAIMS_VERSION: u8 = 1;

/// Authenticated caller, resolved once per request by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
}

/// JWT payload bound to a session row through `jti`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    pub v: u8,       // payload version
    pub sub: i64,    // user ID
    pub email: String,
    pub jti: Uuid,   // session id
    pub iat: i64,    // issued at (unix timestamp)
    pub exp: i64,    // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub,
            email: self.email.clone(),
        }
    }
}
