use crate::config::ShopifyConfig;
use crate::domain::model::ResourceKind;
use crate::utils::error::{EtlError, Result};
use reqwest::header::{CONTENT_TYPE, LINK};
use reqwest::{Client, Response, StatusCode};

/// One page of a resource listing, plus the raw Link header (if any) that
/// carries the next-page cursor.
#[derive(Debug)]
pub struct Page {
    pub body: serde_json::Value,
    pub link_header: Option<String>,
}

/// Authenticated client for the Shopify Admin REST API.
pub struct ShopifyClient {
    http: Client,
    config: ShopifyConfig,
}

impl ShopifyClient {
    pub fn new(config: ShopifyConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url(), path)
    }

    /// Issues an authenticated GET and maps non-success statuses onto the
    /// error taxonomy (401 auth, 404 not-found, other HTTP).
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .http
            .get(&url)
            .header("X-Shopify-Access-Token", &self.config.api_token)
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(EtlError::AuthError { url }),
            StatusCode::NOT_FOUND => Err(EtlError::NotFoundError { url }),
            status => Err(EtlError::HttpStatusError { status, url }),
        }
    }

    /// Fetches one page of a resource listing, capturing the Link header
    /// before the body is consumed.
    pub async fn fetch_page(&self, kind: ResourceKind, query: &[(&str, String)]) -> Result<Page> {
        let response = self.get(&kind.endpoint(), query).await?;
        let link_header = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.json().await?;
        Ok(Page { body, link_header })
    }

    /// `GET shop.json` — shop metadata, used by the connectivity probe.
    pub async fn shop(&self) -> Result<serde_json::Value> {
        let response = self.get("shop.json", &[]).await?;
        let body: serde_json::Value = response.json().await?;
        Ok(body.get("shop").cloned().unwrap_or_default())
    }

    /// `GET {resource}/count.json` — total record count for a resource.
    pub async fn count(&self, kind: ResourceKind) -> Result<u64> {
        let response = self.get(&kind.count_endpoint(), &[]).await?;
        let body: serde_json::Value = response.json().await?;
        Ok(body.get("count").and_then(|v| v.as_u64()).unwrap_or(0))
    }
}
