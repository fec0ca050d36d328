use crate::domain::ports::MessageSink;
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Clone, Deserialize)]
struct SlackChatMessageResponse {
    ok: bool,
    error: Option<String>,
}

/// Posts report text to one Slack channel through `chat.postMessage`.
#[derive(Debug, Clone)]
pub struct SlackSink {
    http: Client,
    api_base: String,
    bot_token: String,
    channel: String,
}

impl SlackSink {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait]
impl MessageSink for SlackSink {
    async fn post_message(&self, text: &str) -> Result<()> {
        let payload = json!({
            "channel": self.channel,
            "text": text,
        });

        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReportError::Delivery {
                message: format!("slack chat.postMessage request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Delivery {
                message: format!("slack chat.postMessage returned HTTP {}", status),
            });
        }

        let body: SlackChatMessageResponse =
            response.json().await.map_err(|e| ReportError::Delivery {
                message: format!("slack chat.postMessage response unreadable: {}", e),
            })?;

        if !body.ok {
            return Err(ReportError::Delivery {
                message: format!(
                    "slack chat.postMessage failed: {}",
                    body.error.unwrap_or_else(|| "unknown error".to_string())
                ),
            });
        }

        tracing::info!("Posted report to Slack channel {}", self.channel);
        Ok(())
    }
}
