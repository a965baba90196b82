//! Request errors of the in-memory backend.
//!
//! Every failure degrades to a status code on the response; the store stays
//! usable afterwards.
//!
//! | Error | Status |
//! |-------|--------|
//! | CollectionNotFound, RecordNotFound, ReadOnly, UnknownRoute | 404 |
//! | InvalidBody, IdMismatch, InvalidConfig | 400 |
//! | Conflict, IdsExhausted | 409 |

use crate::types::request::HttpMethod;
use crate::types::response::{status, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Collection '{collection}' not found")]
    CollectionNotFound { collection: String },

    #[error("'{collection}' with id='{id}' not found")]
    RecordNotFound { collection: String, id: String },

    #[error("Collection '{collection}' does not accept {method} requests")]
    ReadOnly {
        collection: String,
        method: HttpMethod,
    },

    #[error("No route for {method} {url}")]
    UnknownRoute { method: HttpMethod, url: String },

    #[error("Invalid request body: {reason}")]
    InvalidBody { reason: String },

    #[error("Request id '{url_id}' does not match item.id '{body_id}'")]
    IdMismatch { url_id: String, body_id: String },

    #[error("'{collection}' item with id='{id}' already exists")]
    Conflict { collection: String, id: String },

    #[error("No integer id left to generate in '{collection}'")]
    IdsExhausted { collection: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl BackendError {
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        BackendError::InvalidBody {
            reason: reason.into(),
        }
    }

    /// HTTP status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            BackendError::CollectionNotFound { .. }
            | BackendError::RecordNotFound { .. }
            | BackendError::ReadOnly { .. }
            | BackendError::UnknownRoute { .. } => status::NOT_FOUND,
            BackendError::InvalidBody { .. }
            | BackendError::IdMismatch { .. }
            | BackendError::InvalidConfig(_) => status::BAD_REQUEST,
            BackendError::Conflict { .. } | BackendError::IdsExhausted { .. } => {
                status::CONFLICT
            }
        }
    }
}

impl From<BackendError> for Response {
    fn from(err: BackendError) -> Self {
        Response::new(err.status()).with_body(json!({ "error": err.to_string() }))
    }
}
