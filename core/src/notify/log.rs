//! Fallback channel that records alerts in the log instead of delivering them.

use crate::traits::{EmailChannel, SmsChannel, VoiceChannel};
use async_trait::async_trait;
use tracing::info;

pub struct LogChannel;

#[async_trait]
impl EmailChannel for LogChannel {
    async fn send(&self, subject: &str, body: &str, to: &str) -> anyhow::Result<()> {
        info!(channel = "email", to, subject, "[not delivered] {body}");
        Ok(())
    }
}

#[async_trait]
impl SmsChannel for LogChannel {
    async fn send(&self, body: &str, to: &str) -> anyhow::Result<()> {
        info!(channel = "sms", to, "[not delivered] {body}");
        Ok(())
    }
}

#[async_trait]
impl VoiceChannel for LogChannel {
    async fn call(&self, spoken_message: &str, to: &str) -> anyhow::Result<()> {
        info!(channel = "voice", to, "[not delivered] {spoken_message}");
        Ok(())
    }
}
