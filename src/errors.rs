use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Handler-boundary errors. Every failure inside a request is converted to
/// one of these and rendered as a JSON body; nothing is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Multipart parsing failure or the upload exceeding the size cap.
    #[error("File upload failed")]
    Upload(String),
    /// Any query failure, carrying the endpoint's user-facing message.
    #[error("{message}")]
    Database { message: String, detail: String },
    #[error("{0}")]
    NotFound(&'static str),
    /// Failure while handing the file bytes to the client.
    #[error("Failed to send file")]
    Stream(String),
}

impl ApiError {
    pub fn db(message: &str, e: sqlx::Error) -> Self {
        log::error!("{}: {e:?}", message);
        ApiError::Database {
            message: message.to_string(),
            detail: e.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ApiErrBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Stream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::Upload(detail) | ApiError::Stream(detail) => Some(detail.clone()),
            ApiError::Database { detail, .. } => Some(detail.clone()),
            ApiError::NotFound(_) => None,
        };
        HttpResponse::build(self.status_code()).json(ApiErrBody {
            message: self.to_string(),
            error,
        })
    }
}
