use affiliate_shared::{store::StoreError, ValidationError, REQUIRED_FIELDS};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid JSON payload")]
    InvalidPayload(String),

    #[error("Payload too large")]
    PayloadTooLarge(String),

    #[error("Post not found")]
    PostNotFound,

    #[error("API endpoint not found")]
    RouteNotFound,

    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a storage failure with what the handler
    /// was doing.
    pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Storage {
            context,
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::MissingFields(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::PostNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage {
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingFields(missing) => ApiError::MissingFields(missing),
            other => ApiError::InvalidPayload(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::InvalidPayload(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<&'static [&'static str]>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
            missing: None,
            required: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorResponse::new(self.to_string());

        match self {
            ApiError::Unauthorized => {
                body.message = Some("Valid x-api-key header required".to_string());
            },
            ApiError::MissingFields(missing) => {
                body.missing = Some(missing);
                body.required = Some(&REQUIRED_FIELDS);
            },
            ApiError::InvalidPayload(details) | ApiError::PayloadTooLarge(details) => {
                body.details = Some(details);
            },
            ApiError::Storage {
                context,
                source,
            } => {
                tracing::error!("{}: {}", context, source);
                body.details = Some(source.to_string());
            },
            ApiError::PostNotFound | ApiError::RouteNotFound => {},
        }

        (status, Json(body)).into_response()
    }
}
