use crate::error::ToolError;
use crate::tools::extract_string_arg;
use crate::traits::{Memory, Tool, ToolName};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub const MEMORY_TOP_K: usize = 3;

pub struct RetrieveMemoryTool {
    memory: Arc<dyn Memory>,
}

impl RetrieveMemoryTool {
    pub fn new(memory: Arc<dyn Memory>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for RetrieveMemoryTool {
    fn name(&self) -> ToolName {
        ToolName::RetrieveMemory
    }

    fn description(&self) -> &str {
        "Retrieve stored farmer information."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look up, e.g. a crop, a field or a past problem"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let query = extract_string_arg(&args, "query")?;

        let records = self.memory.similarity_search(&query, MEMORY_TOP_K).await?;

        Ok(records.join("\n"))
    }
}
