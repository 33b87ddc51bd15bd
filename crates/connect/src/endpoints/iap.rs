//! In-app-purchase endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::ConnectClient;
use crate::envelope::Resource;
use crate::error::{ConnectError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InAppPurchaseAttributes {
    name: String,
    product_id: String,
    #[serde(default)]
    in_app_purchase_type: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// One in-app purchase record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InAppPurchase {
    pub id: String,
    pub name: String,
    pub product_id: String,
    pub purchase_type: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IapLocalizationAttributes {
    locale: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Localization record for one in-app purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IapLocalization {
    pub id: String,
    pub locale: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Attribute changes for an IAP localization.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IapLocalizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn purchase_from(resource: &Resource) -> Result<InAppPurchase> {
    let attrs: InAppPurchaseAttributes = resource.attributes_as()?;
    Ok(InAppPurchase {
        id: resource.id.clone(),
        name: attrs.name,
        product_id: attrs.product_id,
        purchase_type: attrs.in_app_purchase_type,
        state: attrs.state,
    })
}

fn localization_from(resource: &Resource) -> Result<IapLocalization> {
    let attrs: IapLocalizationAttributes = resource.attributes_as()?;
    Ok(IapLocalization {
        id: resource.id.clone(),
        locale: attrs.locale,
        name: attrs.name,
        description: attrs.description,
    })
}

impl ConnectClient {
    /// All in-app purchases for an app. Follows pagination.
    ///
    /// GET /v2/inAppPurchases?filter[app]={app_id}
    pub async fn in_app_purchases(&self, app_id: &str) -> Result<Vec<InAppPurchase>> {
        let params = vec![
            ("filter[app]".to_string(), app_id.to_string()),
            (
                "fields[inAppPurchases]".to_string(),
                "name,productId,inAppPurchaseType,state".to_string(),
            ),
            ("limit".to_string(), "200".to_string()),
        ];
        let envelope = self.request_all_pages("/v2/inAppPurchases", &params).await?;
        envelope.records().iter().map(purchase_from).collect()
    }

    /// Localizations for one in-app purchase, optionally filtered by locale.
    /// Follows pagination.
    ///
    /// GET /v2/inAppPurchases/{iap_id}/inAppPurchaseLocalizations
    pub async fn iap_localizations(
        &self,
        iap_id: &str,
        locale: Option<&str>,
    ) -> Result<Vec<IapLocalization>> {
        let mut params = vec![
            (
                "fields[inAppPurchaseLocalizations]".to_string(),
                "locale,name,description".to_string(),
            ),
            ("limit".to_string(), "200".to_string()),
        ];
        if let Some(locale) = locale {
            params.push(("filter[locale]".to_string(), locale.to_string()));
        }

        let envelope = self
            .request_all_pages(
                &format!("/v2/inAppPurchases/{iap_id}/inAppPurchaseLocalizations"),
                &params,
            )
            .await?;
        envelope.records().iter().map(localization_from).collect()
    }

    /// Update an in-app-purchase localization (name, description).
    ///
    /// PATCH /v1/inAppPurchaseLocalizations/{localization_id}
    pub async fn update_iap_localization(
        &self,
        localization_id: &str,
        update: &IapLocalizationUpdate,
    ) -> Result<IapLocalization> {
        let body = serde_json::json!({
            "data": {
                "type": "inAppPurchaseLocalizations",
                "id": localization_id,
                "attributes": update,
            }
        });
        let envelope = self
            .request(
                &format!("/v1/inAppPurchaseLocalizations/{localization_id}"),
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
