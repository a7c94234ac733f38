use crate::error::AgentError;
use crate::traits::{ChatMessage, ChatRequest, Provider, ToolCall, ToolSpec};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(120);

/// The single call site for model inference.
pub struct ModelGateway {
    provider: Arc<dyn Provider>,
    timeout: Duration,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns one assistant message for `system_prompt` followed by `history`.
    pub async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatMessage, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);

        let request = ChatRequest {
            messages: &messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        let response = tokio::time::timeout(self.timeout, self.provider.chat(request))
            .await
            .map_err(|_| AgentError::Timeout(self.timeout))?
            .map_err(|e| AgentError::ModelUnavailable(format!("{e:#}")))?;

        let text = response.text_or_empty().to_string();
        let tool_calls = normalize_tool_calls(response.tool_calls)?;

        Ok(ChatMessage::assistant_with_tool_calls(text, tool_calls))
    }
}

/// Fills in missing correlation ids and rejects duplicates.
fn normalize_tool_calls(calls: Vec<ToolCall>) -> Result<Vec<ToolCall>, AgentError> {
    let mut seen = HashSet::new();

    calls
        .into_iter()
        .enumerate()
        .map(|(index, mut call)| {
            if call.name.trim().is_empty() {
                return Err(AgentError::ModelUnavailable(format!(
                    "tool call #{} has no name",
                    index
                )));
            }
            if call.id.trim().is_empty() {
                let digest = md5::compute(format!("{}:{}:{}", index, call.name, call.arguments));
                call.id = format!("call_{:x}", digest);
            }
            if !seen.insert(call.id.clone()) {
                return Err(AgentError::ModelUnavailable(format!(
                    "duplicate tool call id {}",
                    call.id
                )));
            }
            Ok(call)
        })
        .collect()
}
