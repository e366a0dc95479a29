use serde::{Deserialize, Serialize};
use std::{io, sync::Arc, time::Duration};
use thiserror::Error;

/// Request-level failures. Any of these aborts the whole check before a
/// single resolver is queried.
#[derive(Debug, Error, Clone)]
pub enum CheckError {
    #[error("you must provide the {0}")]
    MissingParameter(&'static str),

    #[error("could not load resolver list from {source_name}: {reason}")]
    ConfigLoad { source_name: String, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: Arc<io::Error>,
    },
}

impl CheckError {
    /// HTTP status the boundary reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::MissingParameter(_) => 400,
            CheckError::ConfigLoad { .. } => 500,
            CheckError::Io { .. } => 500,
        }
    }

    pub fn config_load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckError::ConfigLoad {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        CheckError::Io {
            context: context.into(),
            source: Arc::new(source),
        }
    }

    /// Wire shape of this error.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.status_code(),
            message: self.to_string(),
        }
    }
}

/// `{"code": ..., "message": ...}` as written by the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Why a single resolver produced no answer.
///
/// These never escape [`crate::dns::resolve`]; their `Display` text becomes
/// that resolver's outcome.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid domain name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("cannot resolve server address {address:?}: {reason}")]
    ServerAddress { address: String, reason: String },

    #[error("{op} failed: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode query: {0}")]
    Encode(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("query task ended without reporting")]
    Aborted,
}
