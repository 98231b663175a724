use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::EntityKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: EntityKind,
        id: Uuid,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
    },

    #[error("credit limit exceeded: limit {limit}, used {used}, requested {requested}")]
    CreditLimitExceeded {
        limit: Money,
        used: Money,
        requested: Money,
    },

    #[error("user {user_id} is not authorized to perform this action")]
    Forbidden {
        user_id: Uuid,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

/// coarse error classification exposed to callers at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    CreditLimitExceeded,
    Forbidden,
    Internal,
}

impl LedgerError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        LedgerError::NotFound { entity, id }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LedgerError::CreditLimitExceeded { .. } => ErrorKind::CreditLimitExceeded,
            LedgerError::Forbidden { .. } => ErrorKind::Forbidden,
            LedgerError::InvalidConfiguration { .. }
            | LedgerError::InvalidDate { .. }
            | LedgerError::Serialization { .. } => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
