use async_trait::async_trait;

#[async_trait]
pub trait EmailChannel: Send + Sync {
    async fn send(&self, subject: &str, body: &str, to: &str) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SmsChannel: Send + Sync {
    async fn send(&self, body: &str, to: &str) -> anyhow::Result<()>;
}

/// Places an automated call that speaks the message.
#[async_trait]
pub trait VoiceChannel: Send + Sync {
    async fn call(&self, spoken_message: &str, to: &str) -> anyhow::Result<()>;
}
