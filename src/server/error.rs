//! HTTP-facing error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::registry::RegistryError;

/// Error returned by request handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or wrong `Authorization` header
    Unauthorized,
    /// Missing, empty, or malformed request parameters
    InvalidParameters,
    /// Channel has no live entry
    NotFound,
    /// Stored endpoint cannot be used as a redirect target
    BadEndpoint,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidParameters => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadEndpoint => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body for this error
    pub fn message(self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::InvalidParameters => "Invalid Parameters",
            ApiError::NotFound => "Not found",
            ApiError::BadEndpoint => "Invalid endpoint",
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::ChannelNotFound(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChannelId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidParameters.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_from_registry_error() {
        let err = RegistryError::ChannelNotFound(ChannelId::new(1));
        assert_eq!(ApiError::from(err), ApiError::NotFound);
    }

    #[test]
    fn test_into_response() {
        let response = ApiError::InvalidParameters.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}
