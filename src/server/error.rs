//! API error type and its JSON rendering
//!
//! Upstream failures become `502` with the upstream status (or `null`),
//! missing configuration and unexpected faults become `500`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::data::{ErrorKind, FetchError};

/// Machine-readable `error` codes
pub mod codes {
    pub const UPSTREAM: &str = "NASA_NEO_WS_ERROR";
    pub const CONFIG: &str = "CONFIG_ERROR";
    pub const INTERNAL: &str = "INTERNAL_ERROR";
}

/// JSON body of an error response
///
/// `status` is `None` to omit the field and `Some(None)` to send `null`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<u16>>,
}

/// Failure of an API request, mapped to a status code and JSON body
#[derive(Debug)]
pub enum ApiError {
    /// Retrieval failed; classified by [`FetchError::kind`]
    Fetch(FetchError),
    /// Anything unexpected; the detail is logged, never returned
    Internal(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Fetch(err)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ApiErrorBody) {
        match self {
            ApiError::Fetch(err) => match err.kind() {
                ErrorKind::Upstream => (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorBody {
                        error: codes::UPSTREAM,
                        message: "NASA NeoWs request failed",
                        status: Some(err.upstream_status()),
                    },
                ),
                ErrorKind::Configuration => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        error: codes::CONFIG,
                        message: "NASA_API_KEY is not configured",
                        status: None,
                    },
                ),
            },
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    error: codes::INTERNAL,
                    message: "Unexpected error",
                    status: None,
                },
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Fetch(err) if err.kind() == ErrorKind::Configuration => {
                error!(error = %err, "request failed: missing configuration");
            }
            ApiError::Fetch(_) => {}
            ApiError::Internal(detail) => error!(detail = %detail, "request failed unexpectedly"),
        }
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_maps_to_bad_gateway() {
        let err = ApiError::from(FetchError::Upstream {
            status: 429,
            body_snippet: "slow down".to_string(),
        });
        let (status, body) = err.parts();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, codes::UPSTREAM);
        assert_eq!(body.status, Some(Some(429)));
    }

    #[test]
    fn test_upstream_error_without_status_sends_null() {
        let decode_error = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let (status, body) = ApiError::from(FetchError::InvalidPayload(decode_error)).parts();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "error": "NASA_NEO_WS_ERROR",
                "message": "NASA NeoWs request failed",
                "status": null
            })
        );
    }

    #[test]
    fn test_configuration_error_maps_to_internal_with_config_code() {
        let err = ApiError::from(FetchError::Configuration("no key".to_string()));
        let (status, body) = err.parts();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, codes::CONFIG);
        assert_eq!(body.status, None);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let (status, body) = ApiError::Internal("task panicked at secret.rs".to_string()).parts();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, codes::INTERNAL);
        assert_eq!(body.message, "Unexpected error");
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("status"));
    }
}
