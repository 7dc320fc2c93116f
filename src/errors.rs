use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Request-level failure kinds, mapped to HTTP status + JSON body at the
/// response boundary.
///
/// The one classification that matters most: `NotFound` ("this resource
/// never existed", 404) must never collapse into `Transient` ("try again
/// later", 500). Stream failures after the response is committed never
/// reach this type; no status change is possible then.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The store has no object under this key.
    #[error("object `{path}` not found")]
    NotFound { path: String },

    /// Store-side failure unrelated to object existence (network,
    /// permission, quota). The message is what the client sees.
    #[error("{message}")]
    Transient { message: String },

    /// The process is running without a usable store client (missing
    /// bucket configuration). Surfaced per request instead of crashing.
    #[error("server configuration incomplete")]
    Configuration,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::Transient { .. } | ProxyError::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ProxyError::NotFound { path } => Json(json!({
                "error": "File not found",
                "path": path,
            })),
            ProxyError::Transient { message } => Json(json!({
                "error": "Internal server error",
                "message": message,
            })),
            ProxyError::Configuration => Json(json!({
                "error": "Server configuration error",
            })),
        };

        (status, body).into_response()
    }
}
