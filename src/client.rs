// reqwest-backed HttpClient

use crate::config::Config;
use crate::http::{HttpClient, HttpError};
use async_trait::async_trait;
use eyre::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP transport for a task backend rooted at `base_url`
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RestClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_http_client(http, config))
    }

    /// Use a preconfigured `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "Sending request");

        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, HttpError> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed without a response");
            HttpError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %url, "Server returned an error status");
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, HttpError> {
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for RestClient {
    async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.send_json(self.request(Method::PUT, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), HttpError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
