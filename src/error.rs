use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Per-record failures. These never abort a batch: the sizing service turns
/// them into an error payload attached to the offending record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    #[error("Invalid electricity rate: {0}")]
    InvalidRate(f64),

    #[error("Malformed input at {field}: {detail}")]
    MalformedInput { field: String, detail: String },
}

impl SizingError {
    pub fn malformed(field: impl Into<String>, detail: impl Into<String>) -> Self {
        SizingError::MalformedInput {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

/// Startup failures while reading `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Request-level errors. Record-level problems are reported inside the
/// response body instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Client error");
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SizingError::InvalidRate(0.0).to_string(),
            "Invalid electricity rate: 0"
        );
        assert_eq!(
            SizingError::malformed("solarPanelConfigs", "expected an array").to_string(),
            "Malformed input at solarPanelConfigs: expected an array"
        );
    }

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
