//! App store version and version-localization endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::ConnectClient;
use crate::envelope::Resource;
use crate::error::{ConnectError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppStoreVersionAttributes {
    platform: String,
    version_string: String,
    app_store_state: String,
    #[serde(default)]
    created_date: Option<String>,
}

/// One app store version record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStoreVersion {
    pub id: String,
    pub platform: String,
    pub version_string: String,
    pub state: String,
    pub created_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionLocalizationAttributes {
    locale: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    keywords: Option<String>,
    #[serde(default)]
    promotional_text: Option<String>,
    #[serde(default)]
    whats_new: Option<String>,
}

/// Version-level localization record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLocalization {
    pub id: String,
    pub locale: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub promotional_text: Option<String>,
    pub whats_new: Option<String>,
}

/// Attribute changes for a version-level localization.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionLocalizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotional_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
}

fn version_from(resource: &Resource) -> Result<AppStoreVersion> {
    let attrs: AppStoreVersionAttributes = resource.attributes_as()?;
    Ok(AppStoreVersion {
        id: resource.id.clone(),
        platform: attrs.platform,
        version_string: attrs.version_string,
        state: attrs.app_store_state,
        created_date: attrs.created_date,
    })
}

fn localization_from(resource: &Resource) -> Result<VersionLocalization> {
    let attrs: VersionLocalizationAttributes = resource.attributes_as()?;
    Ok(VersionLocalization {
        id: resource.id.clone(),
        locale: attrs.locale,
        description: attrs.description,
        keywords: attrs.keywords,
        promotional_text: attrs.promotional_text,
        whats_new: attrs.whats_new,
    })
}

/// The version an editor may still change: the first one not already
/// released or pulled, falling back to the newest record.
fn pick_editable(versions: Vec<AppStoreVersion>) -> Option<AppStoreVersion> {
    let editable = versions
        .iter()
        .position(|v| v.state != "READY_FOR_DISTRIBUTION" && v.state != "REMOVED_FROM_SALE");
    match editable {
        Some(index) => versions.into_iter().nth(index),
        None => versions.into_iter().next(),
    }
}

impl ConnectClient {
    /// App store versions for an app, optionally filtered by platform.
    /// Follows pagination.
    ///
    /// GET /v1/apps/{app_id}/appStoreVersions
    pub async fn app_store_versions(
        &self,
        app_id: &str,
        platform: Option<&str>,
    ) -> Result<Vec<AppStoreVersion>> {
        let mut params = vec![
            (
                "fields[appStoreVersions]".to_string(),
                "platform,versionString,appStoreState,createdDate".to_string(),
            ),
            ("limit".to_string(), "10".to_string()),
        ];
        if let Some(platform) = platform {
            params.push(("filter[platform]".to_string(), platform.to_string()));
        }

        let envelope = self
            .request_all_pages(&format!("/v1/apps/{app_id}/appStoreVersions"), &params)
            .await?;
        envelope.records().iter().map(version_from).collect()
    }

    /// The latest editable version for a platform.
    pub async fn editable_version(
        &self,
        app_id: &str,
        platform: &str,
    ) -> Result<Option<AppStoreVersion>> {
        let versions = self.app_store_versions(app_id, Some(platform)).await?;
        Ok(pick_editable(versions))
    }

    /// Version localizations for one version, optionally filtered by locale.
    /// Follows pagination.
    ///
    /// GET /v1/appStoreVersions/{version_id}/appStoreVersionLocalizations
    pub async fn version_localizations(
        &self,
        version_id: &str,
        locale: Option<&str>,
    ) -> Result<Vec<VersionLocalization>> {
        let mut params = vec![
            (
                "fields[appStoreVersionLocalizations]".to_string(),
                "locale,description,keywords,promotionalText,whatsNew".to_string(),
            ),
            ("limit".to_string(), "200".to_string()),
        ];
        if let Some(locale) = locale {
            params.push(("filter[locale]".to_string(), locale.to_string()));
        }

        let envelope = self
            .request_all_pages(
                &format!("/v1/appStoreVersions/{version_id}/appStoreVersionLocalizations"),
                &params,
            )
            .await?;
        envelope.records().iter().map(localization_from).collect()
    }

    /// Update a version localization.
    ///
    /// PATCH /v1/appStoreVersionLocalizations/{localization_id}
    pub async fn update_version_localization(
        &self,
        localization_id: &str,
        update: &VersionLocalizationUpdate,
    ) -> Result<VersionLocalization> {
        let body = serde_json::json!({
            "data": {
                "type": "appStoreVersionLocalizations",
                "id": localization_id,
                "attributes": update,
            }
        });
        let envelope = self
            .request(
                &format!("/v1/appStoreVersionLocalizations/{localization_id}"),
                Method::PATCH,
                Some(&body),
                &[],
            )
            .await?;
        let resource = envelope
            .first()
            .ok_or_else(|| ConnectError::invalid_response("update response carried no data"))?;
        localization_from(resource)
    }
}
