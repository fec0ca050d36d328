use crate::domain::ports::MessageSink;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Prints messages to stdout; used when no chat channel is configured.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn post_message(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
