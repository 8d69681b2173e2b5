use anyhow::Context;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, Identity, CLAIMS_VERSION};
use crate::config::AuthConfig;

/// Why a token was refused. Never surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Malformed,
    BadSignature,
    WrongIssuerOrAudience,
    UnsupportedVersion,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(Claims),
    Invalid(InvalidReason),
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl IssuedToken {
    pub fn expires_at(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.claims.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Signs and verifies session tokens. Built once at startup from config.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&cfg.audience));
        validation.set_issuer(std::slice::from_ref(&cfg.issuer));
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.session_ttl_minutes),
        }
    }

    /// Validity window, also used as cookie max-age and session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> anyhow::Result<IssuedToken> {
        self.issue_at(identity, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, identity: &Identity, now: OffsetDateTime) -> anyhow::Result<IssuedToken> {
        let exp = now
            .checked_add(self.ttl)
            .context("session expiry out of range")?;
        let claims = Claims {
            v: CLAIMS_VERSION,
            sub: identity.user_id,
            email: identity.email.clone(),
            jti: Uuid::new_v4(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = identity.user_id, jti = %claims.jti, "session token signed");
        Ok(IssuedToken { token, claims })
    }

    /// Valid while `now <= exp`; one second past `exp` the token is dead.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Verification {
        let claims = match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => InvalidReason::BadSignature,
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        InvalidReason::WrongIssuerOrAudience
                    }
                    _ => InvalidReason::Malformed,
                };
                debug!(error = %e, ?reason, "session token rejected");
                return Verification::Invalid(reason);
            }
        };

        if claims.v != CLAIMS_VERSION {
            debug!(version = claims.v, "session token has unsupported version");
            return Verification::Invalid(InvalidReason::UnsupportedVersion);
        }
        if now.unix_timestamp() > claims.exp {
            debug!(user_id = claims.sub, "session token expired");
            return Verification::Invalid(InvalidReason::Expired);
        }

        debug!(user_id = claims.sub, jti = %claims.jti, "session token verified");
        Verification::Valid(claims)
    }
}
