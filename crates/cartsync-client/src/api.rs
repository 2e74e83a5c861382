//! Storefront HTTP API.
//!
//! # Endpoints
//!
//! - `GET  shop/api/products/?page=N` - one page of the catalog
//! - `POST shop/api/toggle-wishlist/` - form field `product_id`, answers `{added}`
//! - `POST shop/process-order/` - multipart shipping form plus `cart_data`
//! - `GET  accounts/get-cities/?province_id=N` - answers `{cities: [{id, name}]}`

use std::time::Duration;

use async_trait::async_trait;
use cartsync_commerce::catalog::{Catalog, ProductPage};
use cartsync_commerce::checkout::{City, OrderRequest, OrderResponse};
use cartsync_commerce::ids::{ProductId, ProvinceId};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::ClientError;
use crate::retry::RetryPolicy;

const PRODUCTS_PATH: &str = "shop/api/products/";
const WISHLIST_PATH: &str = "shop/api/toggle-wishlist/";
const ORDER_PATH: &str = "shop/process-order/";
const CITIES_PATH: &str = "accounts/get-cities/";

/// Answer to a wishlist toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistToggle {
    /// The product is now on the wishlist.
    pub added: bool,
}

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    #[serde(default)]
    cities: Vec<City>,
}

/// The storefront backend as seen by the client.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Fetch one page (1-indexed) of the product listing.
    async fn fetch_products(&self, page: u32) -> Result<ProductPage, ClientError>;

    /// Toggle a product on the customer's wishlist.
    async fn toggle_wishlist(&self, product_id: ProductId) -> Result<WishlistToggle, ClientError>;

    /// Submit an order.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, ClientError>;

    /// Cities of a province for the shipping form.
    async fn cities(&self, province: ProvinceId) -> Result<Vec<City>, ClientError>;

    /// Fetch pages until the listing ends, an empty page arrives or
    /// `max_pages` pages were read.
    async fn fetch_catalog(&self, max_pages: u32) -> Result<Catalog, ClientError> {
        let mut catalog = Catalog::new();
        for page in 1..=max_pages {
            let listing = self.fetch_products(page).await?;
            let has_next = listing.has_next;
            if listing.products.is_empty() {
                break;
            }
            catalog.extend_page(listing);
            if !has_next {
                break;
            }
        }
        Ok(catalog)
    }
}

/// Connection settings for [`StorefrontClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Storefront root, e.g. `https://shop.example/`.
    pub base_url: String,
    /// Sent as `X-CSRFToken` on every request when set.
    pub csrf_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            csrf_token: None,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// reqwest-backed [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base: Url,
    csrf_token: Option<String>,
    retry: RetryPolicy,
}

impl StorefrontClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if the base URL does not parse, or `Http` if the
    /// HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base,
            csrf_token: config.csrf_token.filter(|t| !t.is_empty()),
            retry: config.retry,
        })
    }

    /// Base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint path with query pairs.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => request.header("X-CSRFToken", token),
            None => request,
        }
    }

    /// GET and decode JSON, retrying according to the policy.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let mut attempt = 0;
        loop {
            let result = self.with_csrf(self.http.get(url.clone())).send().await;
            let retry = match &result {
                Ok(response) => self
                    .retry
                    .should_retry_status(response.status().as_u16(), attempt),
                Err(e) if e.is_timeout() => self.retry.should_retry_timeout(attempt),
                Err(e) if e.is_connect() => self.retry.should_retry_connection(attempt),
                Err(_) => false,
            };

            if retry {
                let delay = self.retry.backoff.delay_for_attempt(attempt);
                warn!(%url, attempt, ?delay, "retrying storefront request");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let response = result?;
            return decode_success(response).await;
        }
    }
}

#[async_trait]
impl StorefrontApi for StorefrontClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self, page: u32) -> Result<ProductPage, ClientError> {
        let url = self.endpoint(PRODUCTS_PATH, &[("page", page.to_string())])?;
        let listing: ProductPage = self.get_json(url).await?;
        debug!(count = listing.products.len(), has_next = listing.has_next, "fetched products");
        Ok(listing)
    }

    #[instrument(skip(self))]
    async fn toggle_wishlist(&self, product_id: ProductId) -> Result<WishlistToggle, ClientError> {
        let url = self.endpoint(WISHLIST_PATH, &[])?;
        let request = self
            .http
            .post(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&[("product_id", product_id.to_string())]);
        let response = self.with_csrf(request).send().await?;
        decode_success(response).await
    }

    #[instrument(skip(self, order))]
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, ClientError> {
        let url = self.endpoint(ORDER_PATH, &[])?;
        let form = order
            .fields()
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            });
        let response = self.with_csrf(self.http.post(url.clone())).multipart(form).send().await?;

        // Rejections come back as JSON with `success: false`, often on a 4xx.
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<OrderResponse>(&body) {
            Ok(answer) => Ok(answer),
            Err(_) if !status.is_success() => Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(e) => Err(ClientError::Decode(e)),
        }
    }

    #[instrument(skip(self))]
    async fn cities(&self, province: ProvinceId) -> Result<Vec<City>, ClientError> {
        let url = self.endpoint(CITIES_PATH, &[("province_id", province.to_string())])?;
        let answer: CitiesResponse = self.get_json(url).await?;
        Ok(answer.cities)
    }
}

async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_against_base() {
        let client = StorefrontClient::new(ClientConfig::new("https://shop.example/store")).unwrap();
        assert_eq!(client.base_url().as_str(), "https://shop.example/store/");

        let url = client
            .endpoint(PRODUCTS_PATH, &[("page", "2".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://shop.example/store/shop/api/products/?page=2");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = StorefrontClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
        let err = StorefrontClient::new(ClientConfig::new("mailto:shop@example.com")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_empty_csrf_token_is_ignored() {
        let client =
            StorefrontClient::new(ClientConfig::default().with_csrf_token("")).unwrap();
        assert!(client.csrf_token.is_none());
    }
}
