//! Gateway over the library service's REST API

use super::{SearchFilters, SourceGateway, SourceResult, WishlistService};
use crate::config::{ClientConfig, FeedConfig};
use crate::error::SourceError;
use crate::types::{BookSummary, FeedPayload, WishlistItem};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// HTTP client for the service
///
/// Responses are `{ "success", "message", "data" }` envelopes; only `data`
/// is kept. Non-2xx responses become [`SourceError::Http`] carrying the
/// body's `message` (or `error`), falling back to the status line.
pub struct HttpGateway {
    client: Client,
    api_base: String,
    token: Option<String>,
    /// Feed name to endpoint path
    endpoints: HashMap<String, String>,
}

impl HttpGateway {
    /// Gateway for the built-in feed catalogue
    pub fn new(config: &ClientConfig) -> SourceResult<Self> {
        Self::with_feeds(config, &FeedConfig::default())
    }

    /// Gateway resolving feed names through `feeds`
    pub fn with_feeds(config: &ClientConfig, feeds: &FeedConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let endpoints = feeds
            .feeds
            .iter()
            .map(|f| (f.name.clone(), f.endpoint.clone()))
            .collect();

        Ok(Self {
            client,
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
            token: config.token.clone(),
            endpoints,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{}", self.api_base, path))
            .header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return the parsed body of a 2xx response
    async fn send(&self, request: RequestBuilder) -> SourceResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let text = response.text().await?;
        let body = parse_body(&text, is_json);

        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(body)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> SourceResult<T> {
        let body = self.send(self.request(Method::GET, path).query(query)).await?;
        extract_data(body)
    }

    fn wishlist_path(barcode: &str) -> String {
        format!("/wishlist/{}", urlencoding::encode(barcode))
    }
}

#[async_trait]
impl SourceGateway for HttpGateway {
    async fn fetch_recommendations(&self, feed_name: &str) -> SourceResult<FeedPayload> {
        let endpoint = self
            .endpoints
            .get(feed_name)
            .ok_or_else(|| SourceError::UnknownFeed(feed_name.to_string()))?;
        self.get_data(endpoint, &[]).await
    }

    async fn fetch_available(&self) -> SourceResult<Vec<BookSummary>> {
        self.get_data("/books/available", &[]).await
    }

    async fn fetch_by_search(&self, term: &str) -> SourceResult<Vec<BookSummary>> {
        self.get_data("/books/search", &[("query", term.to_string())])
            .await
    }

    async fn search(&self, filters: &SearchFilters) -> SourceResult<Vec<BookSummary>> {
        self.get_data("/books/advanced-search", &filters.to_query_pairs())
            .await
    }
}

#[async_trait]
impl WishlistService for HttpGateway {
    async fn add(&self, barcode: &str) -> SourceResult<String> {
        let body = self
            .send(self.request(Method::POST, &Self::wishlist_path(barcode)))
            .await?;
        Ok(confirmation(&body))
    }

    async fn remove(&self, barcode: &str) -> SourceResult<String> {
        let body = self
            .send(self.request(Method::DELETE, &Self::wishlist_path(barcode)))
            .await?;
        Ok(confirmation(&body))
    }

    async fn list(&self) -> SourceResult<Vec<WishlistItem>> {
        self.get_data("/wishlist", &[]).await
    }
}

/// Interpret a response body the way the service's web client does
///
/// Empty bodies and unparseable JSON read as `{}`; non-JSON text becomes
/// `{"message": text}`.
fn parse_body(text: &str, is_json: bool) -> Value {
    if text.is_empty() {
        return Value::Object(Default::default());
    }
    if is_json {
        serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Default::default()))
    } else {
        serde_json::json!({ "message": text })
    }
}

/// Human-readable message for a failed response
fn error_message(status: StatusCode, body: &Value) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| {
            body.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
            .trim_end()
            .to_string()
        })
}

fn extract_data<T: DeserializeOwned>(mut body: Value) -> SourceResult<T> {
    let data = body
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| SourceError::Malformed("response has no data field".to_string()))?;
    serde_json::from_value(data).map_err(|e| SourceError::Malformed(e.to_string()))
}

fn confirmation(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or("ok")
        .to_string()
}
