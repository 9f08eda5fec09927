use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

// ErrorCode is the coarse tag callers dispatch on when a request fails.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum ErrorCode {
    Missing,
    BadType,
    BadReq,
    Db,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ErrorCode::Missing => write!(f, "MISSING"),
            ErrorCode::BadType => write!(f, "BAD_TYPE"),
            ErrorCode::BadReq => write!(f, "BAD_REQ"),
            ErrorCode::Db => write!(f, "DB"),
        }
    }
}

#[derive(Debug)]
pub enum LibraryError {
    // a required request field is absent
    MissingField {
        field: String,
        message: String,
    },
    // a request field carries the wrong JSON type
    BadType {
        field: String,
        message: String,
    },
    // a semantic or business-rule violation, including conflicts and
    // unknown-entity cases; `field` names the offending field when one exists
    BadRequest {
        field: Option<String>,
        message: String,
    },
    // a storage-layer failure, surfaced as-is and never retried internally
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
}

impl LibraryError {
    pub fn missing(field: &str, message: &str) -> LibraryError {
        LibraryError::MissingField { field: field.to_string(), message: message.to_string() }
    }

    pub fn bad_type(field: &str, message: &str) -> LibraryError {
        LibraryError::BadType { field: field.to_string(), message: message.to_string() }
    }

    pub fn bad_request(field: Option<&str>, message: &str) -> LibraryError {
        LibraryError::BadRequest { field: field.map(str::to_string), message: message.to_string() }
    }

    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LibraryError::MissingField { .. } => ErrorCode::Missing,
            LibraryError::BadType { .. } => ErrorCode::BadType,
            LibraryError::BadRequest { .. } => ErrorCode::BadReq,
            LibraryError::Database { .. } => ErrorCode::Db,
        }
    }

    // the request field responsible for the error, when one can be named
    pub fn field(&self) -> Option<&str> {
        match self {
            LibraryError::MissingField { field, .. } => Some(field.as_str()),
            LibraryError::BadType { field, .. } => Some(field.as_str()),
            LibraryError::BadRequest { field, .. } => field.as_deref(),
            LibraryError::Database { .. } => None,
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::MissingField { .. } => false,
            LibraryError::BadType { .. } => false,
            LibraryError::BadRequest { .. } => false,
            LibraryError::Database { retryable, .. } => *retryable,
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::database(
            format!("serde json mapping {:?}", err).as_str(), Some("serde".to_string()), false)
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::MissingField { field, message } => {
                write!(f, "{} {} {}", self.code(), field, message)
            }
            LibraryError::BadType { field, message } => {
                write!(f, "{} {} {}", self.code(), field, message)
            }
            LibraryError::BadRequest { field, message } => {
                write!(f, "{} {:?} {}", self.code(), field, message)
            }
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {} {}", self.code(), reason_code, retryable, message)
            }
        }
    }
}

/// A specialized Result type for the library services and repositories.
pub type LibraryResult<T> = Result<T, LibraryError>;
