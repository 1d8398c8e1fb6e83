use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures surfaced by the database collaborators.
///
/// Both variants are handled identically at the handler boundary: converted
/// to a 500 response, never allowed to crash the process. `/stats` catches
/// per-node errors itself and embeds them in its body instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("connection failed: {0}")]
    Connectivity(String),
    #[error("command failed: {0}")]
    Command(String),
}

impl AppError {
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity(message.into())
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "Error",
            message: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                Self::Connectivity(err.to_string())
            }
            _ => Self::Command(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn errors_render_as_500_with_error_body() {
        let response = AppError::connectivity("mongo2: connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "Error");
        assert_eq!(json["message"], "connection failed: mongo2: connection refused");
    }

    #[tokio::test]
    async fn command_errors_use_the_same_shape() {
        let response = AppError::command("countDocuments rejected").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "Error");
        assert!(json["message"].as_str().unwrap().starts_with("command failed"));
    }
}
