//! Response envelope and request parsing shared by the resource handlers.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::AppError;

/// `{ success, data?, message? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, ApiResponse::data(data)).into_response()
}

/// JSON body whose rejections become envelope validation errors.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                Err(AppError::validation("Invalid request body"))
            }
        }
    }
}

/// Foreign key as sent by clients: either a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    /// `Ok(None)` for an empty string, `Err` for anything that is not a positive integer.
    pub fn parse(&self) -> Result<Option<i64>, ()> {
        match self {
            Self::Number(n) if *n > 0 => Ok(Some(*n)),
            Self::Number(_) => Err(()),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => parse_positive(s).map(Some).ok_or(()),
        }
    }
}

/// Parses an optional foreign key field, naming the field in the error.
pub fn parse_ref(raw: Option<&RawId>, field: &str) -> Result<Option<i64>, AppError> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid {field}"))),
    }
}

pub fn parse_path_id(raw: &str) -> Result<i64, AppError> {
    parse_positive(raw).ok_or_else(|| AppError::validation("Invalid id"))
}

fn parse_positive(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

/// Trims a required text field; `None` when absent or blank.
pub fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
