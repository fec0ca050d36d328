use crate::domain::ports::{ConfigProvider, Transport, TransportResult};
use crate::utils::error::{ReportError, Result, TransportError};
use crate::utils::validation::{validate_non_empty_string, validate_scheme, validate_url};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "api.mist.com/api/v1";
pub const DEFAULT_SCHEME: &str = "https";

/// HTTP client for the Mist REST API.
#[derive(Debug, Clone)]
pub struct MistClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl MistClient {
    pub fn new(
        scheme: &str,
        host: &str,
        api_token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        validate_scheme("api_scheme", scheme)?;
        validate_non_empty_string("api_host", host)?;
        validate_non_empty_string("api_token", api_token)?;

        let base_url = format!("{}://{}", scheme, host.trim_end_matches('/'));
        validate_url("api_host", &base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ReportError::ConfigValidation {
            field: "http_client".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            headers: default_headers(api_token)?,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.api_scheme(),
            config.api_host(),
            config.api_token(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path; one leading `/` is dropped.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }
}

fn default_headers(api_token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&format!("Token {}", api_token)).map_err(|_| {
        ReportError::InvalidConfigValue {
            field: "api_token".to_string(),
            value: "<redacted>".to_string(),
            reason: "Token contains characters not allowed in an HTTP header".to_string(),
        }
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}

#[async_trait]
impl Transport for MistClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> TransportResult<Value> {
        let url = self.url_for(path);
        tracing::debug!("Making API request: {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.headers.clone());
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Network {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Network {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            tracing::warn!("{} {} returned {}", method, url, status);
            return Err(TransportError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body: TransportError::truncate_body(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|source| TransportError::Decode { url, source })
    }
}
