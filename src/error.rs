//! Error types for the prediction service and the upload client.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ErrorBody;
use crate::render::NO_FILE_MESSAGE;

/// Errors raised while serving requests.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The multipart body carried no `image` field.
    #[error("no image field in upload")]
    MissingImage,

    /// The uploaded bytes are not a decodable image.
    #[error("invalid image file: {0}")]
    InvalidImage(#[from] image::ImageError),

    /// A requested upload name does not survive sanitizing.
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    /// The upload exceeded the configured byte limit.
    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed multipart body: {0}")]
    Multipart(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Model could not be loaded or prepared.
    #[error("model error: {0}")]
    Model(String),

    #[error("inference failed: {0}")]
    Inference(String),

    /// The blocking thread pool dropped the task.
    #[error("blocking task cancelled")]
    Blocking,
}

impl From<actix_web::error::BlockingError> for ServiceError {
    fn from(_: actix_web::error::BlockingError) -> Self {
        ServiceError::Blocking
    }
}

impl From<actix_multipart::MultipartError> for ServiceError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        ServiceError::Multipart(e.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingImage
            | ServiceError::InvalidImage(_)
            | ServiceError::InvalidFileName(_)
            | ServiceError::Multipart(_) => StatusCode::BAD_REQUEST,
            ServiceError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_)
            | ServiceError::Model(_)
            | ServiceError::Inference(_)
            | ServiceError::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        // Internal details stay in the log.
        let message = match self {
            ServiceError::Storage(_) => "Could not save file".to_string(),
            ServiceError::Model(_) => "Model loading error".to_string(),
            ServiceError::Inference(_) => "Inference error".to_string(),
            ServiceError::Blocking => "Internal server error".to_string(),
            ServiceError::InvalidImage(_) => "Invalid image file".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorBody { error: message })
    }
}

/// Errors raised while submitting an image to the service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileSelected,

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
