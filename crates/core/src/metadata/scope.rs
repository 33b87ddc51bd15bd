//! Field addressing and the per-scope document shapes the store persists.

use serde::{Deserialize, Serialize};

use super::FieldWithHistory;
use crate::errors::StoreError;

/// Editable listing fields addressable in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Subtitle,
    Keywords,
    Description,
    PromotionalText,
    ReleaseNotes,
    IapDisplayName,
    IapDescription,
}

impl FieldKind {
    /// All addressable field kinds.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Name,
        FieldKind::Subtitle,
        FieldKind::Keywords,
        FieldKind::Description,
        FieldKind::PromotionalText,
        FieldKind::ReleaseNotes,
        FieldKind::IapDisplayName,
        FieldKind::IapDescription,
    ];

    /// Store identifier; also the serialized form and document file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Subtitle => "subtitle",
            FieldKind::Keywords => "keywords",
            FieldKind::Description => "description",
            FieldKind::PromotionalText => "promotional_text",
            FieldKind::ReleaseNotes => "release_notes",
            FieldKind::IapDisplayName => "iap_display_name",
            FieldKind::IapDescription => "iap_description",
        }
    }

    /// True for fields stored per (locale) in the app-level document.
    pub fn is_app_level(&self) -> bool {
        matches!(
            self,
            FieldKind::Name | FieldKind::Subtitle | FieldKind::Keywords
        )
    }

    /// True for fields stored per (locale, platform).
    pub fn is_version_level(&self) -> bool {
        matches!(self, FieldKind::Description | FieldKind::PromotionalText)
    }

    /// True for fields stored per (locale, product id).
    pub fn is_iap(&self) -> bool {
        matches!(self, FieldKind::IapDisplayName | FieldKind::IapDescription)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Locale-scoped address of one field, with optional qualifiers.
///
/// Which qualifiers are required depends on the field kind: version-level
/// fields need a platform, release notes need a platform and a version
/// string, IAP fields need a product id. Addressing a field without a
/// required qualifier is an [`StoreError::InvalidScope`] error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub locale: String,
    pub field: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl FieldRef {
    /// Address an app-level field (name, subtitle, keywords).
    pub fn app(locale: impl Into<String>, field: FieldKind) -> Self {
        Self {
            locale: locale.into(),
            field,
            platform: None,
            version: None,
            product_id: None,
        }
    }

    /// Address a version-level field (description, promotional_text).
    pub fn version_level(
        locale: impl Into<String>,
        platform: impl Into<String>,
        field: FieldKind,
    ) -> Self {
        Self {
            locale: locale.into(),
            field,
            platform: Some(platform.into()),
            version: None,
            product_id: None,
        }
    }

    /// Address the release notes for one version string.
    pub fn release_notes(
        locale: impl Into<String>,
        platform: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            locale: locale.into(),
            field: FieldKind::ReleaseNotes,
            platform: Some(platform.into()),
            version: Some(version.into()),
            product_id: None,
        }
    }

    /// Address an IAP field for one product.
    pub fn iap(
        locale: impl Into<String>,
        product_id: impl Into<String>,
        field: FieldKind,
    ) -> Self {
        Self {
            locale: locale.into(),
            field,
            platform: None,
            version: None,
            product_id: Some(product_id.into()),
        }
    }

    /// The platform qualifier, or an invalid-scope error naming it.
    pub fn require_platform(&self) -> Result<&str, StoreError> {
        self.platform
            .as_deref()
            .ok_or_else(|| StoreError::invalid_scope(self.field.as_str(), "platform"))
    }

    /// The version qualifier, or an invalid-scope error naming it.
    pub fn require_version(&self) -> Result<&str, StoreError> {
        self.version
            .as_deref()
            .ok_or_else(|| StoreError::invalid_scope(self.field.as_str(), "version"))
    }

    /// The product-id qualifier, or an invalid-scope error naming it.
    pub fn require_product_id(&self) -> Result<&str, StoreError> {
        self.product_id
            .as_deref()
            .ok_or_else(|| StoreError::invalid_scope(self.field.as_str(), "product_id"))
    }
}

/// App-level fields for one locale, persisted as a single document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppInfoData {
    pub name: FieldWithHistory,
    pub subtitle: FieldWithHistory,
    pub keywords: FieldWithHistory,
}

impl AppInfoData {
    /// Borrow the history for one app-level field.
    pub fn field(&self, kind: FieldKind) -> Option<&FieldWithHistory> {
        match kind {
            FieldKind::Name => Some(&self.name),
            FieldKind::Subtitle => Some(&self.subtitle),
            FieldKind::Keywords => Some(&self.keywords),
            _ => None,
        }
    }

    /// Replace the history for one app-level field.
    pub fn set_field(&mut self, kind: FieldKind, value: FieldWithHistory) {
        match kind {
            FieldKind::Name => self.name = value,
            FieldKind::Subtitle => self.subtitle = value,
            FieldKind::Keywords => self.keywords = value,
            _ => {}
        }
    }
}

/// Release notes for one version string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseNotesData {
    pub version: String,
    pub notes: FieldWithHistory,
}

/// In-app-purchase copy for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IapData {
    pub product_id: String,
    pub display_name: FieldWithHistory,
    pub description: FieldWithHistory,
}

impl IapData {
    /// An IAP document with no content yet.
    pub fn empty(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            display_name: FieldWithHistory::empty(),
            description: FieldWithHistory::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_round_trips_through_its_identifier() {
        for kind in FieldKind::ALL {
            let parsed: FieldKind = kind.as_str().parse().expect("parse field kind");
            assert_eq!(parsed, kind);
        }
        assert!("not_a_field".parse::<FieldKind>().is_err());
    }

    #[test]
    fn field_kind_serializes_to_store_identifier() {
        let json = serde_json::to_string(&FieldKind::PromotionalText).unwrap();
        assert_eq!(json, "\"promotional_text\"");
    }

    #[test]
    fn missing_platform_is_an_invalid_scope() {
        let field_ref = FieldRef::app("en-US", FieldKind::Description);
        let err = field_ref.require_platform().unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidScope {
                field: "description",
                missing: "platform"
            }
        ));
    }

    #[test]
    fn missing_version_is_an_invalid_scope() {
        let field_ref = FieldRef::version_level("en-US", "ios", FieldKind::ReleaseNotes);
        let err = field_ref.require_version().unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidScope {
                field: "release_notes",
                missing: "version"
            }
        ));
    }

    #[test]
    fn missing_product_id_is_an_invalid_scope() {
        let field_ref = FieldRef::app("en-US", FieldKind::IapDescription);
        let err = field_ref.require_product_id().unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidScope {
                field: "iap_description",
                missing: "product_id"
            }
        ));
    }

    #[test]
    fn app_info_field_accessors_cover_app_level_kinds_only() {
        let mut info = AppInfoData::default();
        info.set_field(
            FieldKind::Subtitle,
            FieldWithHistory::empty().append_iteration(
                "Track everything",
                crate::metadata::IterationSource::UserEdited,
                "initial subtitle",
            ),
        );

        assert_eq!(
            info.field(FieldKind::Subtitle).unwrap().latest_content(),
            Some("Track everything")
        );
        assert!(info.field(FieldKind::Description).is_none());
    }
}
