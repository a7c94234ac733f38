use crate::config::Config;
use crate::traits::{EmailChannel, SmsChannel, VoiceChannel};
use std::sync::Arc;
use std::time::Duration;

pub mod email;
pub mod log;
pub mod twilio;

pub use email::HttpEmailSender;
pub use log::LogChannel;
pub use twilio::TwilioClient;

/// Upper bound on a single channel delivery. Must stay below the dispatcher's
/// tool timeout.
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(20);

/// The delivery channels `send_alert` escalates through.
#[derive(Clone)]
pub struct AlertChannels {
    pub email: Arc<dyn EmailChannel>,
    pub sms: Arc<dyn SmsChannel>,
    pub voice: Arc<dyn VoiceChannel>,
    pub timeout: Duration,
}

impl AlertChannels {
    pub fn log_only() -> Self {
        let channel = Arc::new(LogChannel);
        Self {
            email: channel.clone(),
            sms: channel.clone(),
            voice: channel,
            timeout: DEFAULT_CHANNEL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Real channels where credentials are configured, log-only otherwise.
pub fn create_channels(config: &Config) -> AlertChannels {
    let mut channels = AlertChannels::log_only()
        .with_timeout(config.channel_timeout());

    match config.twilio.resolve() {
        Some(twilio) => {
            let client = Arc::new(TwilioClient::new(
                twilio.account_sid,
                twilio.auth_token,
                twilio.from_number,
            ));
            channels.sms = client.clone();
            channels.voice = client;
        }
        None => {
            tracing::warn!("Twilio is not configured; SMS and voice alerts will only be logged")
        }
    }

    match config.email.resolve() {
        Some(email) => {
            let mut sender = HttpEmailSender::new(email.api_key, email.from);
            if let Some(base_url) = email.base_url {
                sender = sender.with_base_url(base_url);
            }
            channels.email = Arc::new(sender);
        }
        None => tracing::warn!("Email is not configured; email alerts will only be logged"),
    }

    channels
}
