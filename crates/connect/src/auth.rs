//! Bearer token minting and caching.
//!
//! The remote API authenticates every request with a short-lived ES256 JWT.
//! [`TokenCache`] is owned by the client instance (no process-global state)
//! and re-mints before the token would expire mid-flight. Refresh is
//! single-flight: the mint happens under the cache lock, so concurrent
//! callers that observe a stale token await one mint instead of racing.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use copydesk_core::credentials::CredentialSource;
use copydesk_core::errors::{AuthError, AuthResult};

/// Maximum token lifetime accepted by the API (20 minutes).
const TOKEN_LIFETIME_SECS: i64 = 20 * 60;
/// Re-mint when less than this remains before expiry (10 minutes).
const REFRESH_MARGIN_SECS: i64 = 10 * 60;
/// Fixed audience claim expected by the API.
const AUDIENCE: &str = "appstoreconnect-v1";

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Usable while more than the refresh margin remains before expiry.
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Claims payload of the signed bearer token.
#[derive(Debug, Serialize)]
struct TokenClaims<'a> {
    iss: &'a str,
    iat: i64,
    exp: i64,
    aud: &'static str,
}

enum TokenSupply {
    /// Mint from signing material on demand.
    Minted(Arc<dyn CredentialSource>),
    /// Externally supplied bearer; nothing to re-mint from.
    Fixed,
}

/// Caches a short-lived bearer token, re-minting before expiry.
pub struct TokenCache {
    supply: TokenSupply,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Cache that mints tokens from the given credential source.
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self {
            supply: TokenSupply::Minted(source),
            cached: Mutex::new(None),
        }
    }

    /// Cache holding an externally minted bearer that is never refreshed.
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            supply: TokenSupply::Fixed,
            cached: Mutex::new(Some(CachedToken {
                token: token.into(),
                expires_at: DateTime::<Utc>::MAX_UTC,
            })),
        }
    }

    /// Current bearer token, minting a fresh one when the cached token is
    /// absent or within the refresh margin of its expiry.
    pub async fn token(&self) -> AuthResult<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(existing) = cached.as_ref() {
            if existing.is_fresh(now) {
                return Ok(existing.token.clone());
            }
        }

        let source = match &self.supply {
            TokenSupply::Minted(source) => source,
            // A cleared or stale fixed token cannot be regenerated.
            TokenSupply::Fixed => return Err(AuthError::MissingCredentials),
        };

        debug!("minting fresh bearer token");
        let minted = mint_token(source.as_ref(), now).await?;
        let token = minted.token.clone();
        *cached = Some(minted);
        Ok(token)
    }

    /// Drop the cached token; the next use re-mints (explicit re-auth).
    pub async fn clear(&self) {
        *self.cached.lock().await = None;
    }
}

async fn mint_token(source: &dyn CredentialSource, now: DateTime<Utc>) -> AuthResult<CachedToken> {
    let credentials = source.load().await?;

    let pem = tokio::fs::read(&credentials.p8_key_path)
        .await
        .map_err(|_| AuthError::key_not_found(&credentials.p8_key_path))?;
    let key = EncodingKey::from_ec_pem(&pem).map_err(|e| AuthError::signing(e.to_string()))?;

    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(credentials.key_id.clone());

    let iat = now.timestamp();
    let claims = TokenClaims {
        iss: &credentials.issuer_id,
        iat,
        exp: iat + TOKEN_LIFETIME_SECS,
        aud: AUDIENCE,
    };

    let token = encode(&header, &claims, &key).map_err(|e| AuthError::signing(e.to_string()))?;
    Ok(CachedToken {
        token,
        expires_at: now + Duration::seconds(TOKEN_LIFETIME_SECS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use copydesk_core::credentials::ApiCredentials;
    use std::path::PathBuf;

    struct StubSource {
        credentials: Option<ApiCredentials>,
    }

    #[async_trait]
    impl CredentialSource for StubSource {
        async fn load(&self) -> AuthResult<ApiCredentials> {
            self.credentials
                .clone()
                .ok_or(AuthError::MissingCredentials)
        }
    }

    #[test]
    fn token_is_fresh_outside_the_refresh_margin() {
        let now = Utc::now();
        let token = CachedToken {
            token: "t".to_string(),
            expires_at: now + Duration::seconds(TOKEN_LIFETIME_SECS),
        };
        // 20 minutes out: well past the 10-minute margin.
        assert!(token.is_fresh(now));
        // 9 minutes remaining: inside the margin, must re-mint.
        assert!(!token.is_fresh(now + Duration::seconds(11 * 60)));
    }

    #[tokio::test]
    async fn fixed_token_is_returned_unchanged() {
        let cache = TokenCache::fixed("external-token");
        assert_eq!(cache.token().await.expect("token"), "external-token");
        assert_eq!(cache.token().await.expect("token"), "external-token");
    }

    #[tokio::test]
    async fn cleared_fixed_token_cannot_regenerate() {
        let cache = TokenCache::fixed("external-token");
        cache.clear().await;
        let err = cache.token().await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn missing_credentials_surface_from_the_source() {
        let cache = TokenCache::new(Arc::new(StubSource { credentials: None }));
        let err = cache.token().await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn unreadable_key_file_is_key_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("AuthKey_NOPE.p8");
        let cache = TokenCache::new(Arc::new(StubSource {
            credentials: Some(ApiCredentials {
                key_id: "NOPE".to_string(),
                issuer_id: "issuer".to_string(),
                p8_key_path: missing.clone(),
            }),
        }));

        let err = cache.token().await.unwrap_err();
        match err {
            AuthError::KeyNotFound { path } => assert_eq!(path, missing),
            other => panic!("expected KeyNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_key_material_is_a_signing_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key_path = dir.path().join("AuthKey_BAD.p8");
        std::fs::write(&key_path, "not a pem").expect("write key");

        let cache = TokenCache::new(Arc::new(StubSource {
            credentials: Some(ApiCredentials {
                key_id: "BAD".to_string(),
                issuer_id: "issuer".to_string(),
                p8_key_path: key_path,
            }),
        }));

        let err = cache.token().await.unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }
}
