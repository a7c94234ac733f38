use crate::error::ToolError;
use crate::notify::AlertChannels;
use crate::tools::{extract_string_arg, extract_string_arg_opt};
use crate::traits::{Tool, ToolName};
use async_trait::async_trait;
use futures_util::future::join3;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

pub const ALERT_SUBJECT: &str = "FarmGuard AI Alert";
pub const ALERT_DISPATCHED: &str = "AI alert dispatched via all channels.";

/// Escalates a risk over email, SMS and a voice call.
///
/// Each channel runs on its own under its own timeout; a failing or stalled
/// channel is logged and never stops the others. The confirmation is the same
/// whichever channels fired.
pub struct SendAlertTool {
    channels: AlertChannels,
}

impl SendAlertTool {
    pub fn new(channels: AlertChannels) -> Self {
        Self { channels }
    }
}

async fn deliver<F>(channel: &'static str, target: Option<&str>, limit: Duration, send: F)
where
    F: Future<Output = anyhow::Result<()>>,
{
    let Some(target) = target else {
        return;
    };
    match tokio::time::timeout(limit, send).await {
        Ok(Ok(())) => info!(channel, to = target, "alert delivered"),
        Ok(Err(e)) => warn!(channel, to = target, "alert delivery failed: {e:#}"),
        Err(_) => warn!(
            channel,
            to = target,
            "alert delivery stalled, gave up after {}s",
            limit.as_secs()
        ),
    }
}

#[async_trait]
impl Tool for SendAlertTool {
    fn name(&self) -> ToolName {
        ToolName::SendAlert
    }

    fn description(&self) -> &str {
        "Send AI alert via Email, SMS and Phone Call."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Short alert describing the risk and what the farmer should do"
                },
                "email": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "phone": {
                    "type": "string",
                    "description": "Recipient phone number for SMS and the voice call"
                }
            },
            "required": ["message"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let message = extract_string_arg(&args, "message")?;
        if message.trim().is_empty() {
            return Err(ToolError::InvalidArgument("'message' must not be empty".into()));
        }
        let email = extract_string_arg_opt(&args, "email")?;
        let phone = extract_string_arg_opt(&args, "phone")?;

        let email = email.as_deref();
        let phone = phone.as_deref();
        let limit = self.channels.timeout;

        join3(
            deliver(
                "email",
                email,
                limit,
                self.channels
                    .email
                    .send(ALERT_SUBJECT, &message, email.unwrap_or_default()),
            ),
            deliver(
                "sms",
                phone,
                limit,
                self.channels.sms.send(&message, phone.unwrap_or_default()),
            ),
            deliver(
                "voice",
                phone,
                limit,
                self.channels.voice.call(&message, phone.unwrap_or_default()),
            ),
        )
        .await;

        Ok(ALERT_DISPATCHED.to_string())
    }
}
