//! Deterministic doubles shared by the unit tests.

use crate::error::ToolError;
use crate::notify::AlertChannels;
use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, EmailChannel, Memory, Provider, SmsChannel, Tool,
    ToolCall, ToolName, VoiceChannel,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays canned responses in order and records every request it sees.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ChatResponse>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(mut responses: Vec<ChatResponse>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> ChatResponse {
        ChatResponse {
            text: Some(text.to_string()),
            tool_calls: vec![],
        }
    }

    pub fn tools(tool_calls: Vec<ToolCall>) -> ChatResponse {
        ChatResponse {
            text: None,
            tool_calls,
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }
}

pub struct SlowProvider(pub Duration);

#[async_trait]
impl Provider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn chat(&self, _request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        tokio::time::sleep(self.0).await;
        Ok(ScriptedProvider::text("too late"))
    }
}

/// Always returns the same records, whatever the query.
pub struct StaticMemory(Vec<String>);

impl StaticMemory {
    pub fn new<'a>(records: impl IntoIterator<Item = &'a str>) -> Self {
        Self(records.into_iter().map(str::to_string).collect())
    }
}

#[async_trait]
impl Memory for StaticMemory {
    fn name(&self) -> &str {
        "static"
    }

    async fn add(&self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn similarity_search(&self, _query: &str, k: usize) -> anyhow::Result<Vec<String>> {
        Ok(self.0.iter().take(k).cloned().collect())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.0.len())
    }
}

pub struct FailingMemory;

#[async_trait]
impl Memory for FailingMemory {
    fn name(&self) -> &str {
        "failing"
    }

    async fn add(&self, _text: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("memory store offline"))
    }

    async fn similarity_search(&self, _query: &str, _k: usize) -> anyhow::Result<Vec<String>> {
        Err(anyhow::anyhow!("memory store offline"))
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Err(anyhow::anyhow!("memory store offline"))
    }
}

/// A tool that never finishes.
pub struct HangingTool;

#[async_trait]
impl Tool for HangingTool {
    fn name(&self) -> ToolName {
        ToolName::RetrieveMemory
    }

    fn description(&self) -> &str {
        "hangs"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<String, ToolError> {
        std::future::pending::<()>().await;
        Ok(String::new())
    }
}

#[derive(Default)]
struct Deliveries {
    emails: Vec<(String, String, String)>,
    sms: Vec<(String, String)>,
    calls: Vec<(String, String)>,
}

/// Records deliveries instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingChannels {
    deliveries: Arc<Mutex<Deliveries>>,
    fail_sms: bool,
    hang_email: bool,
}

impl RecordingChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_sms(mut self) -> Self {
        self.fail_sms = true;
        self
    }

    pub fn with_hanging_email(mut self) -> Self {
        self.hang_email = true;
        self
    }

    pub fn channels(&self) -> AlertChannels {
        let this = Arc::new(self.clone());
        AlertChannels {
            email: this.clone(),
            sms: this.clone(),
            voice: this,
            timeout: crate::notify::DEFAULT_CHANNEL_TIMEOUT,
        }
    }

    pub fn emails(&self) -> Vec<(String, String, String)> {
        self.deliveries.lock().unwrap().emails.clone()
    }

    pub fn sms(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().sms.clone()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl EmailChannel for RecordingChannels {
    async fn send(&self, subject: &str, body: &str, to: &str) -> anyhow::Result<()> {
        if self.hang_email {
            std::future::pending::<()>().await;
        }
        self.deliveries
            .lock()
            .unwrap()
            .emails
            .push((subject.to_string(), body.to_string(), to.to_string()));
        Ok(())
    }
}

#[async_trait]
impl SmsChannel for RecordingChannels {
    async fn send(&self, body: &str, to: &str) -> anyhow::Result<()> {
        if self.fail_sms {
            return Err(anyhow::anyhow!("SMS gateway rejected the message"));
        }
        self.deliveries
            .lock()
            .unwrap()
            .sms
            .push((body.to_string(), to.to_string()));
        Ok(())
    }
}

#[async_trait]
impl VoiceChannel for RecordingChannels {
    async fn call(&self, spoken_message: &str, to: &str) -> anyhow::Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .calls
            .push((spoken_message.to_string(), to.to_string()));
        Ok(())
    }
}
