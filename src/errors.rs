use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::response::ApiResponse;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;

    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by : \n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}

#[derive(thiserror::Error)]
pub enum ApiError {
    /// Request-shape violations caught before any business logic runs.
    #[error("Validation error")]
    SchemaValidation(Vec<String>),
    /// Business-rule rejections whose message is safe to return to the client.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::SchemaValidation(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::SchemaValidation(errors) => {
                HttpResponse::BadRequest().json(ApiResponse::validation_errors(errors.clone()))
            }
            ApiError::Validation(message) => {
                HttpResponse::BadRequest().json(ApiResponse::error(message))
            }
            ApiError::NotFound(message) => {
                HttpResponse::NotFound().json(ApiResponse::error(message))
            }
            ApiError::Unexpected(error) => {
                // The cause stays server-side; the client gets a generic message.
                tracing::error!("Unexpected failure : {:?}", error);
                HttpResponse::InternalServerError().json(ApiResponse::error("Internal server error"))
            }
        }
    }
}
