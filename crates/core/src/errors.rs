//! Error types shared across the copydesk crates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the local metadata store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field kind was addressed without a qualifier it requires.
    #[error("invalid scope: {field} requires {missing}")]
    InvalidScope {
        field: &'static str,
        missing: &'static str,
    },

    /// A persisted document exists but is not valid JSON for its scope.
    #[error("corrupt store document {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure underneath the store.
    #[error("store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create an invalid-scope error naming the missing qualifier.
    pub fn invalid_scope(field: &'static str, missing: &'static str) -> Self {
        Self::InvalidScope { field, missing }
    }

    /// Create a corrupt-document error for the given path.
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error annotated with the affected path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for credential/token operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors raised while producing a bearer credential.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential source is configured for this project.
    #[error("no API credentials configured; add your key to .appstore/config.local.json")]
    MissingCredentials,

    /// The configured signing key path does not resolve to a readable file.
    #[error("private key file not found: {}", path.display())]
    KeyNotFound { path: PathBuf },

    /// The signing key was readable but token signing failed.
    #[error("failed to sign bearer token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Create a key-not-found error for the given path.
    pub fn key_not_found(path: impl Into<PathBuf>) -> Self {
        Self::KeyNotFound { path: path.into() }
    }

    /// Create a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_scope_message_names_the_missing_qualifier() {
        let err = StoreError::invalid_scope("release_notes", "version");
        assert_eq!(
            err.to_string(),
            "invalid scope: release_notes requires version"
        );
    }

    #[test]
    fn corrupt_store_message_names_the_document() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::corrupt("/tmp/app_info.json", parse_err);
        assert!(err.to_string().contains("/tmp/app_info.json"));
    }
}
