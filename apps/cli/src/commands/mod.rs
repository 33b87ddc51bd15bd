//! Command implementations. Orchestration only: every command wires the
//! store, the client, and the core logic together and renders the result.

pub mod list;
pub mod read;
pub mod request;
pub mod status;
pub mod validate;
pub mod write;

use clap::Args;
use std::path::Path;
use std::sync::Arc;

use copydesk_connect::{ConnectClient, TokenCache, DEFAULT_BASE_URL};
use copydesk_core::metadata::{FieldKind, FieldRef};
use copydesk_storage_fs::{FsCredentialSource, MetadataLayout, MetadataStore};

/// Env var overriding the remote API host (staging, tests).
const API_URL_ENV: &str = "COPYDESK_API_URL";

pub(crate) fn store_at(root: &Path) -> MetadataStore {
    MetadataStore::new(MetadataLayout::new(root))
}

pub(crate) fn client_for(root: &Path) -> ConnectClient {
    let auth = TokenCache::new(Arc::new(FsCredentialSource::new(MetadataLayout::new(root))));
    ConnectClient::with_base_url(&api_base_url(), auth)
}

fn api_base_url() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Platform identifier as the remote API spells it.
pub(crate) fn remote_platform(platform: &str) -> String {
    match platform.to_lowercase().as_str() {
        "ios" => "IOS".to_string(),
        "macos" => "MAC_OS".to_string(),
        "tvos" => "TV_OS".to_string(),
        "visionos" => "VISION_OS".to_string(),
        other => other.to_uppercase(),
    }
}

/// Shared field-addressing flags for `read` and `write`.
#[derive(Debug, Args)]
pub(crate) struct FieldSelector {
    /// Locale code (e.g. en-US, ja, de-DE).
    #[arg(long)]
    pub locale: String,

    /// Metadata field to address.
    #[arg(long)]
    pub field: FieldKind,

    /// Platform (ios, macos); required for version-level fields.
    #[arg(long)]
    pub platform: Option<String>,

    /// Version string; required for release notes.
    #[arg(long)]
    pub version: Option<String>,

    /// IAP product id; required for IAP fields.
    #[arg(long)]
    pub product_id: Option<String>,
}

impl FieldSelector {
    pub(crate) fn to_field_ref(&self) -> FieldRef {
        FieldRef {
            locale: self.locale.clone(),
            field: self.field,
            platform: self.platform.clone(),
            version: self.version.clone(),
            product_id: self.product_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_platform_spelling() {
        assert_eq!(remote_platform("ios"), "IOS");
        assert_eq!(remote_platform("macOS"), "MAC_OS");
        assert_eq!(remote_platform("visionos"), "VISION_OS");
        assert_eq!(remote_platform("watchos"), "WATCHOS");
    }
}
