use crate::agent::{ContextBuilder, ModelGateway, ToolDispatcher, ToolRegistry};
use crate::error::AgentError;
use crate::session::Session;
use crate::traits::{ChatMessage, Provider, ToolCall};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_MAX_ITERATIONS: usize = 20;

#[derive(Debug)]
enum LoopState {
    AwaitingModel,
    Dispatching(Vec<ToolCall>),
    Terminated(String),
}

/// What a completed turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub answer: String,
    pub model_calls: usize,
    pub tool_calls: usize,
}

/// Drives one turn: model, tools, model, ... until the model stops asking
/// for tools.
pub struct AgentLoop {
    gateway: ModelGateway,
    dispatcher: ToolDispatcher,
    context_builder: ContextBuilder,
    tool_registry: Arc<ToolRegistry>,
    max_iterations: usize,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        context_builder: ContextBuilder,
        tool_registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            gateway: ModelGateway::new(provider),
            dispatcher: ToolDispatcher::new(tool_registry.clone()),
            context_builder,
            tool_registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.gateway = self.gateway.with_timeout(timeout);
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    /// Runs one turn for `message` and returns the final answer.
    ///
    /// The turn's messages are staged and only appended to the session once
    /// the loop terminates. On error the session is left as it was.
    pub async fn process_turn(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<TurnOutcome, AgentError> {
        info!(thread_id = session.thread_id(), "turn started");

        let mut messages = session.history().to_vec();
        let turn_start = messages.len();
        messages.push(ChatMessage::user(message));

        match self.run(session, &mut messages).await {
            Ok(outcome) => {
                session.append(messages.split_off(turn_start));
                info!(
                    thread_id = session.thread_id(),
                    model_calls = outcome.model_calls,
                    tool_calls = outcome.tool_calls,
                    "turn finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(thread_id = session.thread_id(), "turn aborted: {e}");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        session: &Session,
        messages: &mut Vec<ChatMessage>,
    ) -> Result<TurnOutcome, AgentError> {
        let tools = self.tool_registry.get_specs();
        let mut model_calls = 0;
        let mut tool_calls = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    if model_calls >= self.max_iterations {
                        return Err(AgentError::RunawayLoop(model_calls));
                    }
                    model_calls += 1;

                    let system_prompt = self.context_builder.build_system_prompt(session);
                    let reply = self
                        .gateway
                        .complete(&system_prompt, messages, &tools)
                        .await?;

                    let next = route(&reply);
                    messages.push(reply);
                    next
                }
                LoopState::Dispatching(calls) => {
                    debug!(count = calls.len(), "dispatching tool calls");
                    tool_calls += calls.len();
                    let results = self.dispatcher.dispatch(session, &calls).await;
                    messages.extend(results);
                    LoopState::AwaitingModel
                }
                LoopState::Terminated(answer) => {
                    return Ok(TurnOutcome {
                        answer,
                        model_calls,
                        tool_calls,
                    });
                }
            };
        }
    }
}

fn route(reply: &ChatMessage) -> LoopState {
    match reply.tool_calls() {
        [] => LoopState::Terminated(reply.content().to_string()),
        calls => LoopState::Dispatching(calls.to_vec()),
    }
}
