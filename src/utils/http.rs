// src/utils/http.rs

//! HTTP fetch capability.
//!
//! The pipeline only talks to the network through [`Fetch`], so tests and
//! host applications can substitute their own transport.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Body and metadata of a successful response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs a GET request. Implementations own per-request timeouts;
/// callers never retry.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response>;
}

/// [`Fetch`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client from configuration.
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::fetch(url, e))?;
            let value = HeaderValue::from_str(value).map_err(|e| AppError::fetch(url, e))?;
            header_map.insert(name, value);
        }

        let response = self
            .client
            .get(url)
            .headers(header_map)
            .send()
            .await?
            .error_for_status()?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_sends_headers() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/data"))
            .and(wiremock::matchers::header("accept", "application/json"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .insert_header("x-test", "yes")
                    .set_body_string("hello"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::from_config(&HttpConfig::default()).unwrap();
        let url = format!("{}/data", server.uri());
        let response = client
            .fetch(&url, &[("Accept", "application/json")])
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text(), "hello");
        assert_eq!(response.headers.get("x-test").map(String::as_str), Some("yes"));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpClient::from_config(&HttpConfig::default()).unwrap();
        let result = client.fetch(&server.uri(), &[]).await;
        assert!(matches!(result, Err(AppError::Http(_))));
    }
}
