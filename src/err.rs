use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use serde::Serialize;

pub async fn handler404(path: Uri) -> Error {
    Error::NotFound {
        message: format!("Invalid path: {}", path),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Success<V> {
    success: bool,
    #[serde(flatten)]
    value: V,
}

impl<V: Serialize> Success<V> {
    pub fn of(value: V) -> Self {
        Self {
            success: true,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Failure<'a> {
    success: bool,
    #[serde(flatten)]
    error: &'a Error,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "error")]
pub enum Error {
    AuthenticationFailure { message: String },
    UserDeactivated { message: String },
    NotFound { message: String },
    InternalError { kind: &'static str, message: String },
}

impl Error {
    pub fn bad_credentials() -> Error {
        Error::AuthenticationFailure {
            message: "Correo o contraseña incorrectos".to_string(),
        }
    }

    pub fn deactivated() -> Error {
        Error::UserDeactivated {
            message: "Usuario desactivado".to_string(),
        }
    }

    /// Wraps a lower-level failure, keeping its text in the response body.
    pub fn internal<E: std::fmt::Display>(kind: &'static str, context: &str, err: E) -> Error {
        Error::InternalError {
            kind,
            message: format!("{}: {}", context, err),
        }
    }

    /// Prefixes the message of an internal error; other variants pass through.
    pub fn context(self, context: &str) -> Error {
        match self {
            Error::InternalError { kind, message } => Error::InternalError {
                kind,
                message: format!("{}: {}", context, message),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::AuthenticationFailure { .. } | Error::UserDeactivated { .. } => {
                StatusCode::UNAUTHORIZED
            }
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::InternalError { kind, message } = &self {
            log::error!("{}: {}", kind, message);
        }
        let body = Json(Failure {
            success: false,
            error: &self,
        });
        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::InternalError {
            kind: "DatabaseError",
            message: err.to_string(),
        }
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::InternalError {
            kind: "HashError",
            message: err.to_string(),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for Error {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        Self::InternalError {
            kind: "PayloadError",
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::InternalError {
            kind: "TaskError",
            message: err.to_string(),
        }
    }
}
