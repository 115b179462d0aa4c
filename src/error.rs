// ⚠️ Error Taxonomy
// Startup failures are fatal, everything else is surfaced to the caller

use crate::models::StoreKind;
use std::path::Path;
use thiserror::Error;

/// Errors raised by the record repository and its backends
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A store exists but could not be read, or could not be created.
    /// Aborts startup.
    #[error("cannot initialize {store} store: {reason}")]
    StorageInit { store: StoreKind, reason: String },

    /// A write after startup failed
    #[error("cannot persist {store} store: {reason}")]
    Storage { store: StoreKind, reason: String },

    /// No log entries exist for the tracking id
    #[error("shipment \"{tracking_id}\" not found")]
    NotFound { tracking_id: String },

    /// Required input missing or malformed, rejected before any write
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Bad credentials, or a role that may not perform the operation
    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    /// The database file could not be opened or configured. Aborts startup.
    #[error("cannot open database {path}: {reason}")]
    Database { path: String, reason: String },
}

impl TrackerError {
    pub fn storage(store: StoreKind, reason: impl ToString) -> Self {
        TrackerError::Storage {
            store,
            reason: reason.to_string(),
        }
    }

    pub fn not_found(tracking_id: impl Into<String>) -> Self {
        TrackerError::NotFound {
            tracking_id: tracking_id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TrackerError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn access_denied(reason: impl Into<String>) -> Self {
        TrackerError::AccessDenied {
            reason: reason.into(),
        }
    }

    pub fn database(path: &Path, reason: impl ToString) -> Self {
        TrackerError::Database {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Re-tag any backend failure as a startup failure for `store`.
    /// Database-level failures keep their own variant.
    pub fn into_init(self, store: StoreKind) -> Self {
        match self {
            TrackerError::StorageInit { .. } | TrackerError::Database { .. } => self,
            TrackerError::Storage { reason, .. } => TrackerError::StorageInit { store, reason },
            other => TrackerError::StorageInit {
                store,
                reason: other.to_string(),
            },
        }
    }

    /// True for failures the caller can show and move past
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            TrackerError::StorageInit { .. } | TrackerError::Database { .. }
        )
    }

    /// HTTP status code reported by the API server
    pub fn http_status(&self) -> u16 {
        match self {
            TrackerError::NotFound { .. } => 404,
            TrackerError::Validation { .. } => 400,
            TrackerError::AccessDenied { .. } => 403,
            TrackerError::Storage { .. }
            | TrackerError::StorageInit { .. }
            | TrackerError::Database { .. } => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_init_keeps_reason() {
        let err = TrackerError::storage(StoreKind::Users, "permission denied");
        let init = err.into_init(StoreKind::Users);

        match &init {
            TrackerError::StorageInit { store, reason } => {
                assert_eq!(*store, StoreKind::Users);
                assert_eq!(reason, "permission denied");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!init.is_recoverable());
        assert_eq!(
            init.to_string(),
            "cannot initialize users store: permission denied"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(TrackerError::not_found("TR1").is_recoverable());
        assert!(TrackerError::validation("location", "required").is_recoverable());
        assert!(TrackerError::access_denied("wrong role").is_recoverable());
        assert_eq!(
            TrackerError::not_found("TR1").to_string(),
            "shipment \"TR1\" not found"
        );
    }

    #[test]
    fn test_database_error_names_the_file() {
        let err = TrackerError::database(Path::new("data/tracker.db"), "disk I/O error");

        assert_eq!(
            err.to_string(),
            "cannot open database data/tracker.db: disk I/O error"
        );
        assert!(!err.is_recoverable());
        assert!(matches!(
            err.into_init(StoreKind::Logs),
            TrackerError::Database { .. }
        ));
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(TrackerError::not_found("TR1").http_status(), 404);
        assert_eq!(TrackerError::validation("status", "unknown").http_status(), 400);
        assert_eq!(TrackerError::access_denied("wrong role").http_status(), 403);
        assert_eq!(
            TrackerError::storage(StoreKind::Logs, "disk full").http_status(),
            500
        );
        assert_eq!(
            TrackerError::storage(StoreKind::Users, "gone")
                .into_init(StoreKind::Users)
                .http_status(),
            500
        );
        assert_eq!(
            TrackerError::database(Path::new("x.db"), "locked").http_status(),
            500
        );
    }
}
