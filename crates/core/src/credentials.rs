//! Credential material access for the remote API.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::AuthResult;

/// Signing material identifiers for the remote store API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    /// Key identifier placed in the token header (`kid`).
    pub key_id: String,
    /// Issuer identifier placed in the token payload (`iss`).
    pub issuer_id: String,
    /// Path to the PEM-encoded EC private key used for signing.
    pub p8_key_path: PathBuf,
}

/// Source of API credentials.
///
/// The storage crate implements this over the local config document; tests
/// supply in-memory implementations.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Load the credential identifiers, failing with
    /// [`crate::errors::AuthError::MissingCredentials`] when none are
    /// configured.
    async fn load(&self) -> AuthResult<ApiCredentials>;
}
