//! App-level localization endpoints (name, subtitle).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::ConnectClient;
use crate::envelope::Resource;
use crate::error::{ConnectError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppInfoLocalizationAttributes {
    locale: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
}

/// App-level localization record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfoLocalization {
    pub id: String,
    pub locale: String,
    pub name: Option<String>,
    pub subtitle: Option<String>,
}

/// Attribute changes for an app-level localization.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoLocalizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

fn localization_from(resource: &Resource) -> Result<AppInfoLocalization> {
    let attrs: AppInfoLocalizationAttributes = resource.attributes_as()?;
    Ok(AppInfoLocalization {
        id: resource.id.clone(),
        locale: attrs.locale,
        name: attrs.name,
        subtitle: attrs.subtitle,
    })
}

impl ConnectClient {
    /// App info records for an app, newest first as served by the API.
    ///
    /// GET /v1/apps/{app_id}/appInfos
    pub async fn app_infos(&self, app_id: &str) -> Result<Vec<Resource>> {
        let params = vec![("limit".to_string(), "10".to_string())];
        let envelope = self
            .request(
                &format!("/v1/apps/{app_id}/appInfos"),
                Method::GET,
                None,
                &params,
            )
            .await?;
        Ok(envelope.into_records())
    }

    /// All app-level localizations for an app info record, optionally
    /// filtered by locale. Follows pagination.
    ///
    /// GET /v1/appInfos/{app_info_id}/appInfoLocalizations
    pub async fn app_info_localizations(
        &self,
        app_info_id: &str,
        locale: Option<&str>,
    ) -> Result<Vec<AppInfoLocalization>> {
        let mut params = vec![
            (
                "fields[appInfoLocalizations]".to_string(),
                "locale,name,subtitle".to_string(),
            ),
            ("limit".to_string(), "200".to_string()),
        ];
        if let Some(locale) = locale {
            params.push(("filter[locale]".to_string(), locale.to_string()));
        }

        let envelope = self
            .request_all_pages(
                &format!("/v1/appInfos/{app_info_id}/appInfoLocalizations"),
                &params,
            )
            .await?;
        envelope.records().iter().map(localization_from).collect()
    }

    /// Update an app-level localization (name, subtitle).
    ///
    /// PATCH /v1/appInfoLocalizations/{localization_id}
    pub async fn update_app_info_localization(
        &self,
        localization_id: &str,
        update: &AppInfoLocalizationUpdate,
    ) -> Result<AppInfoLocalization> {
        let body = serde_json::json!({
            "data": {
                "type": "appInfoLocalizations",
                "id": localization_id,
                "attributes": update,
            }
        });
        let envelope = self
            .request(
                &format!("/v1/appInfoLocalizations/{localization_id}"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCache;
    use crate::test_support::{start_mock_server, MockOutcome};

    #[tokio::test]
    async fn update_sends_a_patch_with_only_the_changed_attributes() {
        let body = r#"{ "data": {
            "type": "appInfoLocalizations",
            "id": "loc-1",
            "attributes": { "locale": "en-US", "name": "Tracker", "subtitle": "Know your numbers" }
        } }"#;
        let (base_url, captured, server) =
            start_mock_server(vec![MockOutcome::respond(200, body)]).await;

        let client = ConnectClient::with_base_url(&base_url, TokenCache::fixed("t"));
        let updated = client
            .update_app_info_localization(
                "loc-1",
                &AppInfoLocalizationUpdate {
                    subtitle: Some("Know your numbers".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.subtitle.as_deref(), Some("Know your numbers"));

        let requests = captured.lock().await.clone();
        assert!(requests[0].target.starts_with("PATCH /v1/appInfoLocalizations/loc-1"));
        let sent: serde_json::Value = serde_json::from_str(&requests[0].body).expect("body json");
        assert_eq!(sent["data"]["type"], "appInfoLocalizations");
        assert_eq!(
            sent["data"]["attributes"],
            serde_json::json!({ "subtitle": "Know your numbers" })
        );
        server.abort();
    }
}
