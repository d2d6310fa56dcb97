//! Base HTTP client with shared logic

use crate::config::{ConfigError, ModelConfig};
use crate::constants::RETRY_BACKOFF_MS;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::types::ModelError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub http: Client,
    max_retries: u32,
    log_requests: bool,
    log_responses: bool,
}

impl HttpClientBase {
    pub fn from_config(config: &ModelConfig, default_endpoint: &str) -> Result<Self, ConfigError> {
        let mut http = Client::builder();
        if let Some(timeout) = config.timeout() {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|source| ConfigError::HttpClient {
            provider: config.provider.to_string(),
            source,
        })?;

        Ok(Self {
            provider: config.provider.to_string(),
            model: config.model.clone(),
            endpoint: config
                .base_url
                .clone()
                .unwrap_or_else(|| default_endpoint.to_string()),
            api_key: resolve_api_key(&config.provider, config.api_key.as_deref()),
            http,
            max_retries: config.max_retries,
            log_requests: config.log_requests,
            log_responses: config.log_responses,
        })
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with bearer auth plus optional extra headers
    pub async fn post_with_bearer<Req, Res>(
        &self,
        url: &str,
        body: &Req,
        headers: &[(&'static str, String)],
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        self.log_request(url, body);

        self.execute(|| {
            let mut request = self
                .http
                .post(url)
                .bearer_auth(api_key)
                .header("Content-Type", "application/json");
            for (name, value) in headers {
                request = request.header(*name, value);
            }
            request.json(body)
        })
        .await
    }

    /// Post JSON authenticating with a named key header (for Anthropic)
    pub async fn post_with_key_header<Req, Res>(
        &self,
        url: &str,
        body: &Req,
        key_header: &'static str,
        headers: &[(&'static str, String)],
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        self.log_request(url, body);

        self.execute(|| {
            let mut request = self.http.post(url).header(key_header, api_key);
            for (name, value) in headers {
                request = request.header(*name, value);
            }
            request.json(body)
        })
        .await
    }

    /// Post JSON with query param auth (for Gemini)
    pub async fn post_with_query_key<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        self.log_request(url, body);

        self.execute(|| self.http.post(url).query(&[("key", api_key)]).json(body))
            .await
    }

    /// Post JSON without mandatory auth (for local services like Ollama).
    /// A configured key is still sent as a bearer token.
    pub async fn post_optional_auth<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.log_request(url, body);
        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty());

        self.execute(|| {
            let request = self.http.post(url);
            let request = match api_key {
                Some(key) => request.bearer_auth(key),
                None => request,
            };
            request.json(body)
        })
        .await
    }

    /// Send the request, retrying transient failures with linear backoff.
    async fn execute<Res, F>(&self, build: F) -> Result<Res, ModelError>
    where
        Res: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(build()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        provider = self.provider.as_str(),
                        model = self.model.as_str(),
                        attempt,
                        error = %err,
                        "Retrying model request"
                    );
                    let delay = Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt));
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<Res>(&self, request: RequestBuilder) -> Result<Res, ModelError>
    where
        Res: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.provider, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelError::network(&self.provider, e))?;

        if self.log_responses {
            debug!(
                provider = self.provider.as_str(),
                status = status.as_u16(),
                body = body.as_str(),
                "Model response payload"
            );
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ModelError::unauthorized(&self.provider, status.as_u16()));
        }
        if !status.is_success() {
            return Err(ModelError::status(&self.provider, status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ModelError::invalid_response(&self.provider, e.to_string()))
    }

    fn log_request<Req: Serialize>(&self, url: &str, body: &Req) {
        if !self.log_requests {
            return;
        }
        match serde_json::to_string(body) {
            Ok(payload) => debug!(
                provider = self.provider.as_str(),
                url,
                payload = payload.as_str(),
                "Model request payload"
            ),
            Err(err) => debug!(provider = self.provider.as_str(), %err, "Unserialisable request payload"),
        }
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.provider))
    }
}
