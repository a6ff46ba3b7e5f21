//! Request-level error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every way a forecast request can fail.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The request carried no usable material identifier.
    #[error("Material ID is required")]
    Validation,

    /// The store could not be reached.
    #[error("Unable to connect to the database")]
    Connectivity,

    /// The store holds no history for the identifier.
    #[error("No data found for Material ID: {0}")]
    NotFound(String),

    /// Coercion, model fit or assembly failed.
    #[error("An error occurred: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Connectivity | Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ForecastError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => Self::Connectivity,
            other => Self::Processing(other.to_string()),
        }
    }
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_format() {
        assert_eq!(ForecastError::Validation.to_string(), "Material ID is required");
        assert_eq!(
            ForecastError::Connectivity.to_string(),
            "Unable to connect to the database"
        );
        assert_eq!(
            ForecastError::NotFound("UNKNOWN".into()).to_string(),
            "No data found for Material ID: UNKNOWN"
        );
        assert_eq!(
            ForecastError::processing("boom").to_string(),
            "An error occurred: boom"
        );
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ForecastError::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ForecastError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ForecastError::Connectivity.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ForecastError::processing("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn io_failures_count_as_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            ForecastError::from(sqlx::Error::Io(io)),
            ForecastError::Connectivity
        ));
        assert!(matches!(
            ForecastError::from(sqlx::Error::RowNotFound),
            ForecastError::Processing(_)
        ));
    }
}
