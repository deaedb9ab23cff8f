//! reqwest-backed transport talking to a live Forgejo/Gitea server

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::transport::{ApiRequest, Method, Transport};
use crate::config::Config;
use crate::error::{ForgeMcpError, Result};

/// Sends requests to `{base_url}/api/v1`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_root: Url,
}

impl HttpTransport {
    /// Build a transport from validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        let api_root = Url::parse(&config.api_base_url())?;
        if api_root.cannot_be_a_base() {
            return Err(ForgeMcpError::Other(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| ForgeMcpError::Other("token contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, api_root })
    }

    /// Full URL for a request path, with every segment percent-encoded
    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| ForgeMcpError::Other("API root cannot carry a path".into()))?
            .pop_if_empty()
            .extend(request.path.segments());
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        tracing::debug!("{} {}", request.method, url);
        let mut builder = self.client.request(method, url).query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} {} returned {}", request.method, request.path, status);
            return Err(ForgeMcpError::api(status.as_u16(), error_message(&text, status)));
        }

        if text.trim().is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// The `message` field of a Forgejo error body, or the raw body
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty());

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
