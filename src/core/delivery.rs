use crate::domain::ports::MessageSink;
use crate::utils::error::{ReportError, Result};

pub const SUCCESS_BANNER: &str = "*Successfully requested a report*:";
pub const FAILURE_BANNER: &str = "*Report request failed*:";

pub fn success_message(report: &str) -> String {
    format!("{} \n{}", SUCCESS_BANNER, report)
}

pub fn failure_message(error: &ReportError) -> String {
    format!("{} {}", FAILURE_BANNER, error.user_friendly_message())
}

/// Hands the outcome of one pipeline run to the chat side.
///
/// Failed runs are posted too, so the requester always gets an answer.
/// Delivery errors are logged and returned; nothing is retried.
pub async fn publish<S: MessageSink + ?Sized>(sink: &S, outcome: &Result<String>) -> Result<()> {
    let text = match outcome {
        Ok(report) => success_message(report),
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            failure_message(e)
        }
    };

    sink.post_message(&text).await.map_err(|e| {
        tracing::error!("Failed to deliver report: {}", e);
        e
    })
}
