use crate::utils::error::{Result, TransportError};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Authenticated access to the management API.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str, payload: Option<&Value>)
        -> TransportResult<Value>;

    async fn get(&self, path: &str) -> TransportResult<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn put(&self, path: &str, payload: &Value) -> TransportResult<Value> {
        self.send(Method::PUT, path, Some(payload)).await
    }

    async fn post(&self, path: &str, payload: &Value) -> TransportResult<Value> {
        self.send(Method::POST, path, Some(payload)).await
    }

    async fn delete(&self, path: &str, payload: Option<&Value>) -> TransportResult<Value> {
        self.send(Method::DELETE, path, payload).await
    }
}

/// Chat-side primitive that posts one text message.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn post_message(&self, text: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_scheme(&self) -> &str;
    fn api_host(&self) -> &str;
    fn api_token(&self) -> &str;
    fn org_id(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
    fn template_dir(&self) -> Option<&Path>;
    fn slack_bot_token(&self) -> Option<&str>;
    fn slack_channel(&self) -> Option<&str>;
    fn slack_api_base(&self) -> &str;
}
