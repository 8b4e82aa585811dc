// src/core/error.rs

use thiserror::Error;

/// Failures talking to the remote scan service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, reset, timeout).
    #[error("Desconectado: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with `success: false`; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The body could not be read as the expected JSON shape.
    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),

    /// Non-2xx status without a usable JSON error body.
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// Saving a download or export locally failed.
    #[error("Error de escritura: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL inválida: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// True for failures where the service could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
