use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use crate::core::domain::Configuration;
use crate::core::library::LibraryError;
use crate::core::repository::RepositoryStore;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct AppState {
    pub(crate) config: Configuration,
    pub(crate) store: RepositoryStore,
}

impl AppState {
    pub fn new(store: RepositoryStore) -> AppState {
        AppState {
            config: Configuration::new(),
            store,
        }
    }
}

pub(crate) type ServerError = (StatusCode, String);

impl From<LibraryError> for ServerError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::MissingField { .. } => {
                (StatusCode::BAD_REQUEST, format!("{}", err))
            }
            LibraryError::BadType { .. } => {
                (StatusCode::BAD_REQUEST, format!("{}", err))
            }
            LibraryError::BadRequest { .. } => {
                (StatusCode::BAD_REQUEST, format!("{}", err))
            }
            LibraryError::Database { retryable: true, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, format!("{}", err))
            }
            LibraryError::Database { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err))
            }
        }
    }
}
