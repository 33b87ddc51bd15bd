//! Resilient HTTP client for the remote store API.
//!
//! Calling code issues one logical request and receives one fully
//! materialized envelope; bearer auth, 429 backoff, transient-failure
//! retries, and page walking are handled here.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::auth::TokenCache;
use crate::envelope::{ApiEnvelope, PrimaryData, Resource};
use crate::error::{ConnectError, Result};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com";

/// Transport timeout per attempt.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Retries after the initial attempt (4 attempts total).
const MAX_RETRIES: usize = 3;
/// First backoff delay; doubles on each subsequent attempt. No jitter.
const INITIAL_BACKOFF_MS: u64 = 1_000;
/// Hard stop for page walking. A server that still hands out next links
/// past this is misbehaving; fail loudly instead of looping.
const MAX_PAGES: usize = 100;

/// Query parameters passed to the request primitives.
pub type QueryParams = Vec<(String, String)>;

/// Error entry in a JSON:API error document.
#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDocument {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

/// Client for the remote store management API.
pub struct ConnectClient {
    client: reqwest::Client,
    base_url: String,
    auth: TokenCache,
}

impl ConnectClient {
    /// Client against the production API host.
    pub fn new(auth: TokenCache) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, auth)
    }

    /// Client against an alternate host (staging, tests).
    pub fn with_base_url(base_url: &str, auth: TokenCache) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// The token cache this client authenticates with.
    pub fn auth(&self) -> &TokenCache {
        &self.auth
    }

    async fn bearer_headers(&self) -> Result<HeaderMap> {
        let token = self.auth.token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConnectError::invalid_response("bearer token is not header-safe"))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// One transport round trip: send, read status, headers, full body.
    async fn perform(
        &self,
        url: &str,
        method: &Method,
        headers: HeaderMap,
        body: Option<&serde_json::Value>,
        params: &[(String, String)],
    ) -> std::result::Result<(StatusCode, HeaderMap, String), reqwest::Error> {
        let mut request = self.client.request(method.clone(), url).headers(headers);
        if !params.is_empty() {
            request = request.query(&params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let text = response.text().await?;
        Ok((status, response_headers, text))
    }

    /// Issue one authenticated request against `path`, retrying transparently
    /// on 429 and on network-level failure (up to 3 retries, exponential
    /// backoff). Any other non-success status fails immediately.
    ///
    /// HTTP 204 materializes as a success with an empty record collection.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&serde_json::Value>,
        params: &[(String, String)],
    ) -> Result<ApiEnvelope> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0usize;

        loop {
            let headers = self.bearer_headers().await?;
            match self.perform(&url, &method, headers, body, params).await {
                Err(err) => {
                    if attempt >= MAX_RETRIES {
                        return Err(ConnectError::Transient(err));
                    }
                    let delay = backoff_delay(attempt);
                    debug!(
                        "transport failure on {} (attempt {}): {}; retrying in {:?}",
                        path,
                        attempt + 1,
                        err,
                        delay
                    );
                    sleep(delay).await;
                }
                Ok((status, response_headers, text)) => {
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt >= MAX_RETRIES {
                            return Err(ConnectError::RateLimited {
                                attempts: attempt + 1,
                            });
                        }
                        let delay = retry_after(&response_headers)
                            .unwrap_or_else(|| backoff_delay(attempt));
                        warn!("rate limited on {}; waiting {:?}", path, delay);
                        sleep(delay).await;
                    } else if status == StatusCode::NO_CONTENT {
                        return Ok(ApiEnvelope::empty());
                    } else if !status.is_success() {
                        return Err(api_error(status.as_u16(), &text));
                    } else {
                        return Ok(serde_json::from_str(&text)?);
                    }
                }
            }
            attempt += 1;
        }
    }

    /// Fetch every page of a paginated collection, following the `next`
    /// link strictly sequentially and concatenating `data` and `included`
    /// records in encounter order.
    pub async fn request_all_pages(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<ApiEnvelope> {
        let mut all_records: Vec<Resource> = Vec::new();
        let mut all_included: Vec<Resource> = Vec::new();
        let mut current_path = path.to_string();
        let mut current_params: QueryParams = params.to_vec();
        let mut pages = 0usize;

        loop {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(ConnectError::invalid_response(format!(
                    "pagination exceeded {MAX_PAGES} pages for {path}"
                )));
            }

            let envelope = self
                .request(&current_path, Method::GET, None, &current_params)
                .await?;

            let ApiEnvelope {
                data,
                included,
                links,
                ..
            } = envelope;
            match data {
                Some(PrimaryData::Many(items)) => all_records.extend(items),
                Some(PrimaryData::One(item)) => all_records.push(*item),
                None => {}
            }
            if let Some(mut extra) = included {
                all_included.append(&mut extra);
            }

            match links.and_then(|l| l.next) {
                Some(next) => {
                    let (next_path, next_params) = split_next_link(&next)?;
                    current_path = next_path;
                    current_params = next_params;
                }
                None => break,
            }
        }

        debug!("fetched {} records over {} pages from {}", all_records.len(), pages, path);
        Ok(ApiEnvelope {
            data: Some(PrimaryData::Many(all_records)),
            included: (!all_included.is_empty()).then_some(all_included),
            links: None,
            meta: None,
        })
    }
}

/// Exponential backoff: `INITIAL_BACKOFF_MS * 2^attempt`.
fn backoff_delay(attempt: usize) -> Duration {
    Duration::from_millis(INITIAL_BACKOFF_MS.saturating_mul(1_u64 << attempt.min(16)))
}

/// Server-supplied retry delay from a 429 response, when present.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Build the error for a non-success, non-retried status.
fn api_error(status: u16, body: &str) -> ConnectError {
    if let Ok(document) = serde_json::from_str::<ApiErrorDocument>(body) {
        if !document.errors.is_empty() {
            let message = document
                .errors
                .iter()
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.title.as_deref().unwrap_or("error"),
                        e.detail.as_deref().unwrap_or("no detail")
                    )
                })
                .collect::<Vec<_>>()
                .join("; ");
            return ConnectError::api(status, message);
        }
    }
    ConnectError::api(status, format!("HTTP {status}"))
}

/// Re-derive request path and query from an absolute next-page link.
fn split_next_link(link: &str) -> Result<(String, QueryParams)> {
    let url = reqwest::Url::parse(link)
        .map_err(|_| ConnectError::invalid_response(format!("unparseable next link: {link}")))?;
    let params = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    Ok((url.path().to_string(), params))
}
