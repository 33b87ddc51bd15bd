//! Customer review endpoints.

use reqwest::Method;
use serde::Deserialize;

use crate::client::ConnectClient;
use crate::envelope::Resource;
use crate::error::{ConnectError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerReviewAttributes {
    rating: u8,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    reviewer_nickname: String,
    created_date: String,
    territory: String,
}

/// One customer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerReview {
    pub id: String,
    pub rating: u8,
    pub title: Option<String>,
    pub body: Option<String>,
    pub reviewer_nickname: String,
    pub created_date: String,
    pub territory: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewResponseAttributes {
    response_body: String,
    #[serde(default)]
    state: Option<String>,
}

/// A developer response to a customer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewResponse {
    pub id: String,
    pub response_body: String,
    pub state: Option<String>,
}

/// Sort order for review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSort {
    NewestFirst,
    OldestFirst,
    HighestRated,
    LowestRated,
}

impl ReviewSort {
    fn as_param(&self) -> &'static str {
        match self {
            ReviewSort::NewestFirst => "-createdDate",
            ReviewSort::OldestFirst => "createdDate",
            ReviewSort::HighestRated => "-rating",
            ReviewSort::LowestRated => "rating",
        }
    }
}

fn review_from(resource: &Resource) -> Result<CustomerReview> {
    let attrs: CustomerReviewAttributes = resource.attributes_as()?;
    Ok(CustomerReview {
        id: resource.id.clone(),
        rating: attrs.rating,
        title: attrs.title,
        body: attrs.body,
        reviewer_nickname: attrs.reviewer_nickname,
        created_date: attrs.created_date,
        territory: attrs.territory,
    })
}

impl ConnectClient {
    /// Customer reviews for an app. Follows pagination.
    ///
    /// GET /v1/apps/{app_id}/customerReviews
    pub async fn customer_reviews(
        &self,
        app_id: &str,
        sort: Option<ReviewSort>,
        limit: Option<u32>,
    ) -> Result<Vec<CustomerReview>> {
        let mut params = vec![
            (
                "fields[customerReviews]".to_string(),
                "rating,title,body,reviewerNickname,createdDate,territory".to_string(),
            ),
            ("limit".to_string(), limit.unwrap_or(20).to_string()),
        ];
        if let Some(sort) = sort {
            params.push(("sort".to_string(), sort.as_param().to_string()));
        }

        let envelope = self
            .request_all_pages(&format!("/v1/apps/{app_id}/customerReviews"), &params)
            .await?;
        envelope.records().iter().map(review_from).collect()
    }

    /// Post a developer response to a customer review.
    ///
    /// POST /v1/customerReviewResponses
    pub async fn post_review_response(
        &self,
        review_id: &str,
        response_body: &str,
    ) -> Result<ReviewResponse> {
        let body = serde_json::json!({
            "data": {
                "type": "customerReviewResponses",
                "attributes": { "responseBody": response_body },
                "relationships": {
                    "review": {
                        "data": { "type": "customerReviews", "id": review_id }
                    }
                }
            }
        });
        let envelope = self
            .request("/v1/customerReviewResponses", Method::POST, Some(&body), &[])
            .await?;
        let resource = envelope
            .first()
            .ok_or_else(|| ConnectError::invalid_response("response carried no data"))?;
        let attrs: ReviewResponseAttributes = resource.attributes_as()?;
        Ok(ReviewResponse {
            id: resource.id.clone(),
            response_body: attrs.response_body,
            state: attrs.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCache;
    use crate::test_support::{start_mock_server, MockOutcome};

    #[test]
    fn sort_orders_map_to_api_params() {
        assert_eq!(ReviewSort::NewestFirst.as_param(), "-createdDate");
        assert_eq!(ReviewSort::LowestRated.as_param(), "rating");
    }

    #[tokio::test]
    async fn post_review_response_links_the_review() {
        let body = r#"{ "data": {
            "type": "customerReviewResponses",
            "id": "resp-1",
            "attributes": { "responseBody": "Thanks for the report!", "state": "PENDING_PUBLISH" }
        } }"#;
        let (base_url, captured, server) =
            start_mock_server(vec![MockOutcome::respond(201, body)]).await;

        let client = ConnectClient::with_base_url(&base_url, TokenCache::fixed("t"));
        let response = client
            .post_review_response("rev-9", "Thanks for the report!")
            .await
            .expect("post response");

        assert_eq!(response.id, "resp-1");
        assert_eq!(response.state.as_deref(), Some("PENDING_PUBLISH"));

        let requests = captured.lock().await.clone();
        let sent: serde_json::Value = serde_json::from_str(&requests[0].body).expect("body json");
        assert_eq!(sent["data"]["relationships"]["review"]["data"]["id"], "rev-9");
        server.abort();
    }
}
