//! App lookup endpoints.

use reqwest::Method;
use serde::Deserialize;

use crate::client::ConnectClient;
use crate::envelope::Resource;
use crate::error::{ConnectError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppAttributes {
    name: String,
    bundle_id: String,
    #[serde(default)]
    sku: Option<String>,
    primary_locale: String,
}

/// An app record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub id: String,
    pub name: String,
    pub bundle_id: String,
    pub sku: Option<String>,
    pub primary_locale: String,
}

fn app_from(resource: &Resource) -> Result<App> {
    let attrs: AppAttributes = resource.attributes_as()?;
    Ok(App {
        id: resource.id.clone(),
        name: attrs.name,
        bundle_id: attrs.bundle_id,
        sku: attrs.sku,
        primary_locale: attrs.primary_locale,
    })
}

const APP_FIELDS: &str = "name,bundleId,sku,primaryLocale";

impl ConnectClient {
    /// Find an app by bundle id.
    ///
    /// GET /v1/apps?filter[bundleId]={bundle_id}
    pub async fn app_by_bundle_id(&self, bundle_id: &str) -> Result<Option<App>> {
        let params = vec![
            ("filter[bundleId]".to_string(), bundle_id.to_string()),
            ("fields[apps]".to_string(), APP_FIELDS.to_string()),
            ("limit".to_string(), "1".to_string()),
        ];
        let envelope = self.request("/v1/apps", Method::GET, None, &params).await?;
        envelope.first().map(app_from).transpose()
    }

    /// Get an app by its remote id.
    ///
    /// GET /v1/apps/{app_id}
    pub async fn app(&self, app_id: &str) -> Result<App> {
        let params = vec![("fields[apps]".to_string(), APP_FIELDS.to_string())];
        let envelope = self
            .request(&format!("/v1/apps/{app_id}"), Method::GET, None, &params)
            .await?;
        let resource = envelope
            .first()
            .ok_or_else(|| ConnectError::invalid_response("app response carried no data"))?;
        app_from(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCache;
    use crate::test_support::{start_mock_server, MockOutcome};

    #[tokio::test]
    async fn app_by_bundle_id_decodes_the_first_match() {
        let body = r#"{ "data": [{
            "type": "apps",
            "id": "6448800000",
            "attributes": {
                "name": "Tracker",
                "bundleId": "com.example.tracker",
                "sku": "TRACKER1",
                "primaryLocale": "en-US"
            }
        }] }"#;
        let (base_url, captured, server) =
            start_mock_server(vec![MockOutcome::respond(200, body)]).await;

        let client = ConnectClient::with_base_url(&base_url, TokenCache::fixed("t"));
        let app = client
            .app_by_bundle_id("com.example.tracker")
            .await
            .expect("lookup")
            .expect("found");

        assert_eq!(app.id, "6448800000");
        assert_eq!(app.bundle_id, "com.example.tracker");
        assert_eq!(app.primary_locale, "en-US");

        let requests = captured.lock().await.clone();
        assert!(requests[0].target.contains("filter%5BbundleId%5D=com.example.tracker"));
        server.abort();
    }

    #[tokio::test]
    async fn app_by_bundle_id_with_no_match_is_none() {
        let (base_url, _captured, server) =
            start_mock_server(vec![MockOutcome::respond(200, r#"{ "data": [] }"#)]).await;

        let client = ConnectClient::with_base_url(&base_url, TokenCache::fixed("t"));
        let app = client.app_by_bundle_id("com.example.nope").await.expect("lookup");
        assert!(app.is_none());
        server.abort();
    }
}
