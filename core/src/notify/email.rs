use crate::traits::EmailChannel;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    r#type: &'a str,
    value: &'a str,
}

/// Plain-text email over a SendGrid-compatible `/v3/mail/send` endpoint.
pub struct HttpEmailSender {
    client: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl HttpEmailSender {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            from: from.into(),
            base_url: "https://api.sendgrid.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request<'a>(
        &'a self,
        subject: &'a str,
        body: &'a str,
        to: &'a str,
    ) -> MailRequest<'a> {
        MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: to }],
            }],
            from: Address { email: &self.from },
            subject,
            content: vec![Content {
                r#type: "text/plain",
                value: body,
            }],
        }
    }
}

#[async_trait]
impl EmailChannel for HttpEmailSender {
    async fn send(&self, subject: &str, body: &str, to: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.build_request(subject, body, to))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Email API error {}: {}", status, error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_payload_shape() {
        let sender = HttpEmailSender::new("key", "alerts@farmguard.example");
        let request = sender.build_request("FarmGuard AI Alert", "Check maize", "a@x.com");
        let payload = serde_json::to_value(request).unwrap();

        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "a@x.com");
        assert_eq!(payload["from"]["email"], "alerts@farmguard.example");
        assert_eq!(payload["subject"], "FarmGuard AI Alert");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][0]["value"], "Check maize");
    }
}
