//! Filesystem layout for the `.appstore/` store directory.
//!
//! All path logic lives here; the store itself only asks the layout where a
//! scope's document belongs.

use std::path::{Path, PathBuf};
use tokio::fs;

use copydesk_core::errors::{StoreError, StoreResult};
use copydesk_core::metadata::FieldKind;

const APPSTORE_DIR: &str = ".appstore";
const CONFIG_FILE: &str = "config.json";
const LOCAL_CONFIG_FILE: &str = "config.local.json";
const METADATA_DIR: &str = "metadata";
const LOCALES_FILE: &str = "_locales.json";
const GITIGNORE_FILE: &str = ".gitignore";
const APP_INFO_FILE: &str = "app_info.json";
const RELEASE_NOTES_DIR: &str = "release_notes";
const IAP_DIR: &str = "iap";

/// Resolves store document locations under a project root.
#[derive(Debug, Clone)]
pub struct MetadataLayout {
    root: PathBuf,
}

impl MetadataLayout {
    /// Layout rooted at `<project_root>/.appstore`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            root: project_root.into().join(APPSTORE_DIR),
        }
    }

    /// The `.appstore/` directory itself.
    pub fn appstore_dir(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn local_config_path(&self) -> PathBuf {
        self.root.join(LOCAL_CONFIG_FILE)
    }

    pub fn locales_path(&self) -> PathBuf {
        self.metadata_dir().join(LOCALES_FILE)
    }

    fn locale_dir(&self, locale: &str) -> PathBuf {
        self.metadata_dir().join(locale)
    }

    fn platform_dir(&self, locale: &str, platform: &str) -> PathBuf {
        self.locale_dir(locale).join(platform.to_lowercase())
    }

    pub fn app_info_path(&self, locale: &str) -> PathBuf {
        self.locale_dir(locale).join(APP_INFO_FILE)
    }

    pub fn version_field_path(&self, locale: &str, platform: &str, field: FieldKind) -> PathBuf {
        self.platform_dir(locale, platform)
            .join(format!("{}.json", field.as_str()))
    }

    pub fn release_notes_dir(&self, locale: &str, platform: &str) -> PathBuf {
        self.platform_dir(locale, platform).join(RELEASE_NOTES_DIR)
    }

    pub fn release_notes_path(&self, locale: &str, platform: &str, version: &str) -> PathBuf {
        self.release_notes_dir(locale, platform)
            .join(format!("{version}.json"))
    }

    pub fn iap_dir(&self, locale: &str) -> PathBuf {
        self.locale_dir(locale).join(IAP_DIR)
    }

    pub fn iap_path(&self, locale: &str, product_id: &str) -> PathBuf {
        self.iap_dir(locale).join(format!("{product_id}.json"))
    }

    /// Create the directory skeleton and the gitignore guarding local config.
    pub async fn ensure_layout(&self) -> StoreResult<()> {
        let metadata_dir = self.metadata_dir();
        fs::create_dir_all(&metadata_dir)
            .await
            .map_err(|e| StoreError::io(&metadata_dir, e))?;

        let gitignore = self.root.join(GITIGNORE_FILE);
        if fs::try_exists(&gitignore)
            .await
            .map_err(|e| StoreError::io(&gitignore, e))?
        {
            return Ok(());
        }
        fs::write(&gitignore, format!("{LOCAL_CONFIG_FILE}\n"))
            .await
            .map_err(|e| StoreError::io(&gitignore, e))
    }
}
