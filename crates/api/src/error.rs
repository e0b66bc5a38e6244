use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use socbridge_core::error::CoreError;
use socbridge_tuya::TuyaError;

/// Message returned for any upstream failure. Vendor details stay in the logs.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Failed to fetch data from Tuya API";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error bodies of
/// the form `{"error": "...", "code": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `socbridge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The Tuya cloud call failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] TuyaError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::DataPointNotFound(dp) => (
                    StatusCode::NOT_FOUND,
                    "DATA_POINT_NOT_FOUND",
                    format!("Battery DP not found: {dp}"),
                ),
                CoreError::InvalidDataPoint { .. } => {
                    tracing::warn!(error = %core, "Device reported an unusable data point");
                    (StatusCode::BAD_GATEWAY, "INVALID_DATA_POINT", core.to_string())
                }
            },

            AppError::Upstream(err) => {
                tracing::error!(error = %err, "Tuya API call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    UPSTREAM_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
