//! The file-backed metadata store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use copydesk_core::errors::{StoreError, StoreResult};
use copydesk_core::metadata::{
    AppInfoData, FieldKind, FieldRef, FieldWithHistory, IapData, IterationSource, ReleaseNotesData,
};

use crate::layout::MetadataLayout;

/// Reads and writes the per-scope JSON documents of the local store.
///
/// The store performs no locking: writes are plain read-modify-write. Two
/// processes appending to the same scope concurrently is a lost-update
/// hazard; callers that run concurrently must serialize writes to a scope
/// externally.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    layout: MetadataLayout,
}

impl MetadataStore {
    pub fn new(layout: MetadataLayout) -> Self {
        Self { layout }
    }

    /// The layout this store resolves paths through.
    pub fn layout(&self) -> &MetadataLayout {
        &self.layout
    }

    // ─────────────────────────────────────────────────────────────────────
    // Document primitives
    // ─────────────────────────────────────────────────────────────────────

    /// Read one JSON document. Absent file reads as `None`; an unparseable
    /// file is a [`StoreError::Corrupt`], never treated as empty.
    pub(crate) async fn read_document<T: DeserializeOwned>(
        &self,
        path: &Path,
    ) -> StoreResult<Option<T>> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::corrupt(path, e))
    }

    /// Write one JSON document, pretty-printed with a trailing newline,
    /// creating missing parent directories on demand.
    pub(crate) async fn write_document<T: Serialize>(
        &self,
        path: &Path,
        value: &T,
    ) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        let mut body = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::corrupt(path, e))?;
        body.push('\n');
        debug!(path = %path.display(), "writing store document");
        fs::write(path, body)
            .await
            .map_err(|e| StoreError::io(path, e))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Typed per-scope documents
    // ─────────────────────────────────────────────────────────────────────

    /// App-level fields for a locale; never-written locales read as empty.
    pub async fn read_app_info(&self, locale: &str) -> StoreResult<AppInfoData> {
        let path = self.layout.app_info_path(locale);
        Ok(self.read_document(&path).await?.unwrap_or_default())
    }

    pub async fn write_app_info(&self, locale: &str, data: &AppInfoData) -> StoreResult<()> {
        let path = self.layout.app_info_path(locale);
        self.write_document(&path, data).await
    }

    /// A version-level field document (description, promotional_text).
    pub async fn read_version_field(
        &self,
        locale: &str,
        platform: &str,
        field: FieldKind,
    ) -> StoreResult<FieldWithHistory> {
        let path = self.layout.version_field_path(locale, platform, field);
        Ok(self.read_document(&path).await?.unwrap_or_default())
    }

    pub async fn write_version_field(
        &self,
        locale: &str,
        platform: &str,
        field: FieldKind,
        data: &FieldWithHistory,
    ) -> StoreResult<()> {
        let path = self.layout.version_field_path(locale, platform, field);
        self.write_document(&path, data).await
    }

    pub async fn read_release_notes(
        &self,
        locale: &str,
        platform: &str,
        version: &str,
    ) -> StoreResult<Option<ReleaseNotesData>> {
        let path = self.layout.release_notes_path(locale, platform, version);
        self.read_document(&path).await
    }

    pub async fn write_release_notes(
        &self,
        locale: &str,
        platform: &str,
        data: &ReleaseNotesData,
    ) -> StoreResult<()> {
        let path = self
            .layout
            .release_notes_path(locale, platform, &data.version);
        self.write_document(&path, data).await
    }

    pub async fn read_iap(&self, locale: &str, product_id: &str) -> StoreResult<Option<IapData>> {
        let path = self.layout.iap_path(locale, product_id);
        self.read_document(&path).await
    }

    pub async fn write_iap(&self, locale: &str, data: &IapData) -> StoreResult<()> {
        let path = self.layout.iap_path(locale, &data.product_id);
        self.write_document(&path, data).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Generic field access
    // ─────────────────────────────────────────────────────────────────────

    /// Read the history for any addressable field. A scope that has never
    /// been written reads as the empty field.
    pub async fn read_field(&self, field_ref: &FieldRef) -> StoreResult<FieldWithHistory> {
        match field_ref.field {
            kind if kind.is_app_level() => {
                let info = self.read_app_info(&field_ref.locale).await?;
                Ok(info.field(kind).cloned().unwrap_or_default())
            }
            kind if kind.is_version_level() => {
                let platform = field_ref.require_platform()?;
                self.read_version_field(&field_ref.locale, platform, kind)
                    .await
            }
            FieldKind::ReleaseNotes => {
                let platform = field_ref.require_platform()?;
                let version = field_ref.require_version()?;
                let notes = self
                    .read_release_notes(&field_ref.locale, platform, version)
                    .await?;
                Ok(notes.map(|n| n.notes).unwrap_or_default())
            }
            kind => {
                let product_id = field_ref.require_product_id()?;
                let iap = self.read_iap(&field_ref.locale, product_id).await?;
                Ok(iap
                    .map(|iap| match kind {
                        FieldKind::IapDisplayName => iap.display_name,
                        _ => iap.description,
                    })
                    .unwrap_or_default())
            }
        }
    }

    /// Replace the history for any addressable field, creating missing
    /// intermediate documents on demand.
    pub async fn write_field(
        &self,
        field_ref: &FieldRef,
        value: FieldWithHistory,
    ) -> StoreResult<()> {
        match field_ref.field {
            kind if kind.is_app_level() => {
                let mut info = self.read_app_info(&field_ref.locale).await?;
                info.set_field(kind, value);
                self.write_app_info(&field_ref.locale, &info).await
            }
            kind if kind.is_version_level() => {
                let platform = field_ref.require_platform()?;
                self.write_version_field(&field_ref.locale, platform, kind, &value)
                    .await
            }
            FieldKind::ReleaseNotes => {
                let platform = field_ref.require_platform()?;
                let version = field_ref.require_version()?;
                let data = ReleaseNotesData {
                    version: version.to_string(),
                    notes: value,
                };
                self.write_release_notes(&field_ref.locale, platform, &data)
                    .await
            }
            kind => {
                let product_id = field_ref.require_product_id()?;
                let mut iap = self
                    .read_iap(&field_ref.locale, product_id)
                    .await?
                    .unwrap_or_else(|| IapData::empty(product_id));
                match kind {
                    FieldKind::IapDisplayName => iap.display_name = value,
                    _ => iap.description = value,
                }
                self.write_iap(&field_ref.locale, &iap).await
            }
        }
    }

    /// Append one iteration to a field and persist the result, returning the
    /// updated history.
    pub async fn append(
        &self,
        field_ref: &FieldRef,
        content: &str,
        source: IterationSource,
        context: &str,
    ) -> StoreResult<FieldWithHistory> {
        let current = self.read_field(field_ref).await?;
        let updated = current.append_iteration(content, source, context);
        self.write_field(field_ref, updated.clone()).await?;
        Ok(updated)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Scope listings
    // ─────────────────────────────────────────────────────────────────────

    /// Known release-note versions, newest version string first
    /// (descending lexicographic sort).
    pub async fn list_release_note_versions(
        &self,
        locale: &str,
        platform: &str,
    ) -> StoreResult<Vec<String>> {
        let dir = self.layout.release_notes_dir(locale, platform);
        let mut versions = self.list_json_stems(&dir).await?;
        versions.sort();
        versions.reverse();
        Ok(versions)
    }

    /// Known IAP product ids for a locale. Unordered.
    pub async fn list_iap_product_ids(&self, locale: &str) -> StoreResult<Vec<String>> {
        let dir = self.layout.iap_dir(locale);
        self.list_json_stems(&dir).await
    }

    async fn list_json_stems(&self, dir: &Path) -> StoreResult<Vec<String>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut stems = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(dir, e))?
        {
            let name = entry.file_name();
            if let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                stems.push(stem.to_string());
            }
        }
        Ok(stems)
    }
}
