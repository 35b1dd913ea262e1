//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::{BundleError, InferenceError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Artifact errors (fatal for the page)
    #[error("⚠️ Model file not found! Ensure `{0}` is in the directory.")]
    ArtifactMissing(String),

    #[error("⚠️ Error loading model: {0}")]
    ArtifactCorrupt(String),

    // Validation errors
    #[error("{0}")]
    ValidationError(String),

    // Inference errors
    #[error("Prediction failed: {0}")]
    InferenceError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ArtifactMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ArtifactCorrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InferenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Artifact errors halt the page instead of showing the form
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::ArtifactMissing(_) | AppError::ArtifactCorrupt(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::ArtifactMissing(_) | AppError::ArtifactCorrupt(_) => {
                tracing::error!("Model bundle unavailable: {}", self);
                self.to_string()
            }
            AppError::InferenceError(msg) => {
                tracing::error!("Inference error: {}", msg);
                self.to_string()
            }
            AppError::ValidationError(_) => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<BundleError> for AppError {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::NotFound { path } => AppError::ArtifactMissing(path.display().to_string()),
            other => AppError::ArtifactCorrupt(other.to_string()),
        }
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::InferenceError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(format!("Invalid input: {}", rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let codes: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
                format!("{} ({})", field, codes.join(", "))
            })
            .collect();
        fields.sort();

        AppError::ValidationError(format!("Invalid input: {}", fields.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_bundle_message() {
        let err: AppError = BundleError::NotFound { path: PathBuf::from("main.json") }.into();
        assert!(err.is_fatal());
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            err.to_string(),
            "⚠️ Model file not found! Ensure `main.json` is in the directory."
        );
    }

    #[test]
    fn test_corrupt_bundle_keeps_underlying_text() {
        let err: AppError = BundleError::Incompatible("model.coef has 3 values, expected 10".into()).into();
        assert!(err.is_fatal());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("⚠️ Error loading model: "));
        assert!(err.to_string().contains("model.coef has 3 values, expected 10"));
    }

    #[test]
    fn test_validation_errors_name_fields() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("cgpa", validator::ValidationError::new("range"));
        errors.add("aptitude_score", validator::ValidationError::new("range"));

        let err: AppError = errors.into();
        assert!(!err.is_fatal());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid input: aptitude_score (range); cgpa (range)");
    }
}
