use crate::agent::ToolRegistry;
use crate::error::ToolError;
use crate::session::Session;
use crate::traits::{ChatMessage, ToolCall, ToolName};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);
pub const UNKNOWN_TOOL: &str = "Unknown tool";

/// Executes tool requests one at a time, in request order.
///
/// Every request yields exactly one result message. Nothing raised by a tool
/// escapes: failures are reported back to the model as text.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn dispatch(&self, session: &Session, calls: &[ToolCall]) -> Vec<ChatMessage> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let content = self.run(session, call).await;
            results.push(ChatMessage::tool_result(call.id.clone(), content));
        }
        results
    }

    async fn run(&self, session: &Session, call: &ToolCall) -> String {
        let tool = match self.registry.resolve(&call.name) {
            Ok(tool) => tool,
            Err(_) => {
                warn!(tool = %call.name, "model requested an unknown tool");
                return UNKNOWN_TOOL.to_string();
            }
        };

        let mut args = call.arguments.clone();
        if args.is_null() {
            args = Value::Object(Map::new());
        }
        if tool.name() == ToolName::SendAlert {
            inject_contacts(&mut args, session);
        }

        debug!(tool = %call.name, id = %call.id, "executing tool");

        let outcome = match tokio::time::timeout(self.timeout, tool.execute(args)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %call.name, id = %call.id, "tool failed: {e}");
                format!("Tool failed: {}", e)
            }
        }
    }
}

/// Delivery targets always come from the session, never from the model.
fn inject_contacts(args: &mut Value, session: &Session) {
    if let Value::Object(map) = args {
        map.insert("email".into(), Value::String(session.email().to_string()));
        map.insert("phone".into(), Value::String(session.phone().to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::LocalMemory;
    use crate::notify::AlertChannels;
    use crate::testing::{FailingMemory, HangingTool, RecordingChannels, StaticMemory};
    use crate::tools::send_alert::ALERT_DISPATCHED;
    use serde_json::json;

    fn call(id: &str, name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    fn session() -> Session {
        Session::new("a@x.com", "+1555").unwrap()
    }

    fn dispatcher_with(
        memory: Arc<dyn crate::traits::Memory>,
        channels: AlertChannels,
    ) -> ToolDispatcher {
        ToolDispatcher::new(Arc::new(ToolRegistry::farmguard(memory, channels)))
    }

    #[tokio::test]
    async fn send_alert_targets_come_from_session() {
        let recorder = RecordingChannels::new();
        let dispatcher = dispatcher_with(Arc::new(LocalMemory::in_memory()), recorder.channels());

        let results = dispatcher
            .dispatch(
                &session(),
                &[call(
                    "c1",
                    "send_alert",
                    json!({"message": "Blight", "email": "evil@x.com", "phone": "+666"}),
                )],
            )
            .await;

        assert_eq!(results, vec![ChatMessage::tool_result("c1", ALERT_DISPATCHED)]);
        assert_eq!(recorder.emails()[0].2, "a@x.com");
        assert_eq!(recorder.sms(), vec![("Blight".to_string(), "+1555".to_string())]);
        assert_eq!(recorder.calls(), vec![("Blight".to_string(), "+1555".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_channel_still_confirms_the_alert() {
        let recorder = RecordingChannels::new().with_hanging_email();
        let dispatcher = dispatcher_with(Arc::new(LocalMemory::in_memory()), recorder.channels());

        let results = dispatcher
            .dispatch(&session(), &[call("c1", "send_alert", json!({"message": "Blight"}))])
            .await;

        assert_eq!(results, vec![ChatMessage::tool_result("c1", ALERT_DISPATCHED)]);
        assert_eq!(recorder.sms(), vec![("Blight".to_string(), "+1555".to_string())]);
        assert_eq!(recorder.calls(), vec![("Blight".to_string(), "+1555".to_string())]);
    }

    #[tokio::test]
    async fn results_match_request_order_and_count() {
        let dispatcher = dispatcher_with(
            Arc::new(StaticMemory::new(["record1", "record2"])),
            AlertChannels::log_only(),
        );

        let results = dispatcher
            .dispatch(
                &session(),
                &[
                    call("a", "retrieve_memory", json!({"query": "maize"})),
                    call("b", "plant_trees", json!({})),
                    call("c", "retrieve_memory", json!({})),
                ],
            )
            .await;

        let ids: Vec<&str> = results
            .iter()
            .map(|m| match m {
                ChatMessage::ToolResult { tool_call_id, .. } => tool_call_id.as_str(),
                _ => panic!("expected tool result"),
            })
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(results[0].content(), "record1\nrecord2");
        assert_eq!(results[1].content(), UNKNOWN_TOOL);
        assert!(results[2].content().starts_with("Tool failed:"));
    }

    #[tokio::test]
    async fn tool_errors_are_contained() {
        let dispatcher = dispatcher_with(Arc::new(FailingMemory), AlertChannels::log_only());

        let results = dispatcher
            .dispatch(
                &session(),
                &[call("a", "store_farmer_profile", json!({"info": "maize"}))],
            )
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content(), "Tool failed: memory store offline");
    }

    #[tokio::test]
    async fn null_arguments_read_as_empty_object() {
        let recorder = RecordingChannels::new();
        let dispatcher = dispatcher_with(Arc::new(LocalMemory::in_memory()), recorder.channels());

        let results = dispatcher
            .dispatch(&session(), &[call("a", "send_alert", Value::Null)])
            .await;

        assert_eq!(
            results[0].content(),
            "Tool failed: invalid argument: missing 'message' parameter"
        );
        assert!(recorder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_tool_times_out() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(HangingTool));
        let dispatcher =
            ToolDispatcher::new(Arc::new(registry)).with_timeout(Duration::from_secs(2));

        let results = dispatcher
            .dispatch(&session(), &[call("a", "retrieve_memory", json!({"query": "x"}))])
            .await;

        assert_eq!(results[0].content(), "Tool failed: timed out after 2s");
    }
}
