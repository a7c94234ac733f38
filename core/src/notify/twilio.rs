use crate::traits::{SmsChannel, VoiceChannel};
use async_trait::async_trait;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// SMS and voice delivery through the Twilio REST API.
pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

impl TwilioClient {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            base_url: TWILIO_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/Accounts/{}/{}.json",
            self.base_url, self.account_sid, resource
        )
    }

    async fn post_form(&self, resource: &str, form: &[(&str, &str)]) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.resource_url(resource))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Twilio {} error {}: {}",
                resource,
                status,
                error_text
            ));
        }

        Ok(())
    }
}

/// TwiML that reads `message` aloud exactly as written.
pub fn say_twiml(message: &str) -> String {
    format!(
        "<Response><Say voice=\"alice\">{}</Say></Response>",
        escape_xml(message)
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[async_trait]
impl SmsChannel for TwilioClient {
    async fn send(&self, body: &str, to: &str) -> anyhow::Result<()> {
        self.post_form(
            "Messages",
            &[("To", to), ("From", self.from_number.as_str()), ("Body", body)],
        )
        .await
    }
}

#[async_trait]
impl VoiceChannel for TwilioClient {
    async fn call(&self, spoken_message: &str, to: &str) -> anyhow::Result<()> {
        let twiml = say_twiml(spoken_message);
        self.post_form(
            "Calls",
            &[("To", to), ("From", self.from_number.as_str()), ("Twiml", twiml.as_str())],
        )
        .await
    }
}
