//! Config document persistence and the filesystem credential source.

use async_trait::async_trait;

use copydesk_core::config::{AppConfig, LocalConfig};
use copydesk_core::credentials::{ApiCredentials, CredentialSource};
use copydesk_core::errors::{AuthError, AuthResult, StoreResult};

use crate::layout::MetadataLayout;
use crate::store::MetadataStore;

impl MetadataStore {
    /// Read the main project config, `None` when not yet initialized.
    pub async fn read_config(&self) -> StoreResult<Option<AppConfig>> {
        let path = self.layout().config_path();
        self.read_document(&path).await
    }

    /// Write the main project config, bootstrapping the layout first.
    pub async fn write_config(&self, config: &AppConfig) -> StoreResult<()> {
        self.layout().ensure_layout().await?;
        let path = self.layout().config_path();
        self.write_document(&path, config).await
    }

    /// Read the local (gitignored) credential config.
    pub async fn read_local_config(&self) -> StoreResult<Option<LocalConfig>> {
        let path = self.layout().local_config_path();
        self.read_document(&path).await
    }

    /// Write the local (gitignored) credential config.
    pub async fn write_local_config(&self, config: &LocalConfig) -> StoreResult<()> {
        self.layout().ensure_layout().await?;
        let path = self.layout().local_config_path();
        self.write_document(&path, config).await
    }

    /// Read the stored locale list; empty when never written.
    pub async fn read_locales(&self) -> StoreResult<Vec<String>> {
        let path = self.layout().locales_path();
        Ok(self.read_document(&path).await?.unwrap_or_default())
    }

    /// Write the stored locale list.
    pub async fn write_locales(&self, locales: &[String]) -> StoreResult<()> {
        self.layout().ensure_layout().await?;
        let path = self.layout().locales_path();
        self.write_document(&path, &locales).await
    }
}

/// Credential source backed by `.appstore/config.local.json`.
#[derive(Debug, Clone)]
pub struct FsCredentialSource {
    store: MetadataStore,
}

impl FsCredentialSource {
    pub fn new(layout: MetadataLayout) -> Self {
        Self {
            store: MetadataStore::new(layout),
        }
    }
}

#[async_trait]
impl CredentialSource for FsCredentialSource {
    async fn load(&self) -> AuthResult<ApiCredentials> {
        let local = self
            .store
            .read_local_config()
            .await
            .map_err(|e| AuthError::signing(e.to_string()))?
            .ok_or(AuthError::MissingCredentials)?;

        Ok(ApiCredentials {
            key_id: local.key_id,
            issuer_id: local.issuer_id,
            p8_key_path: local.p8_key_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copydesk_core::config::{Tone, VoiceConfig};
    use std::path::PathBuf;

    fn sample_config() -> AppConfig {
        AppConfig {
            bundle_id: "com.example.tracker".to_string(),
            app_id: Some("6448800000".to_string()),
            platforms: vec!["ios".to_string(), "macos".to_string()],
            primary_locale: "en-US".to_string(),
            locales: vec!["en-US".to_string(), "ja".to_string()],
            voice: VoiceConfig {
                tone: Tone::Casual,
                style_notes: None,
                target_audience: None,
            },
            changelog: None,
        }
    }

    #[tokio::test]
    async fn config_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MetadataStore::new(MetadataLayout::new(dir.path()));

        assert!(store.read_config().await.expect("read").is_none());

        let config = sample_config();
        store.write_config(&config).await.expect("write");
        let back = store.read_config().await.expect("read").expect("present");
        assert_eq!(back, config);
    }

    #[tokio::test]
    async fn locales_list_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MetadataStore::new(MetadataLayout::new(dir.path()));

        assert!(store.read_locales().await.expect("read").is_empty());
        let locales = vec!["en-US".to_string(), "de-DE".to_string()];
        store.write_locales(&locales).await.expect("write");
        assert_eq!(store.read_locales().await.expect("read"), locales);
    }

    #[tokio::test]
    async fn missing_local_config_is_missing_credentials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = FsCredentialSource::new(MetadataLayout::new(dir.path()));

        let err = source.load().await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn local_config_loads_as_credentials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MetadataStore::new(MetadataLayout::new(dir.path()));
        store
            .write_local_config(&LocalConfig {
                key_id: "ABC123DEF4".to_string(),
                issuer_id: "69a6de70-0000-0000-0000-5b8c7c11a4d1".to_string(),
                p8_key_path: PathBuf::from("/keys/AuthKey_ABC123DEF4.p8"),
            })
            .await
            .expect("write local config");

        let source = FsCredentialSource::new(MetadataLayout::new(dir.path()));
        let creds = source.load().await.expect("load");
        assert_eq!(creds.key_id, "ABC123DEF4");
        assert_eq!(creds.p8_key_path, PathBuf::from("/keys/AuthKey_ABC123DEF4.p8"));
    }
}
