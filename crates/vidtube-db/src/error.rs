//! Database error types.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Failed to configure database client: {0}")]
    ConfigError(String),

    #[error("Malformed identifier: {0}")]
    InvalidId(String),

    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    #[error("Driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("BSON decode error: {0}")]
    Bson(#[from] mongodb::bson::de::Error),

    #[error("BSON encode error: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),
}

impl DbError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True when the failure is the caller's fault (ill-formed input),
    /// as opposed to a store failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidId(_))
    }
}

/// Validate and parse an opaque identifier before any store access.
///
/// Ill-formed identifiers are a client error and are never attempted
/// against the store.
pub fn parse_object_id(raw: &str) -> DbResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| DbError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_id_parses() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn ill_formed_id_is_client_error() {
        let err = parse_object_id("not-an-id").unwrap_err();
        assert!(err.is_client_error());
        assert!(parse_object_id("").is_err());
    }
}
