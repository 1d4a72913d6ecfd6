use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Bad state code, bad payload, or an index the list does not have.
    #[error(transparent)]
    Rejected(#[from] states_core::Error),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(rejected) => Error::Rejected(rejected),
            other => Error::Store(other),
        }
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Rejected(states_core::Error::Dataset(_)) | Error::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Rejected(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            log::error!("{self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
