use crate::error::ToolError;
use crate::tools::extract_string_arg;
use crate::traits::{Memory, Tool, ToolName};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub const PROFILE_STORED: &str = "Farmer profile stored.";

pub struct StoreFarmerProfileTool {
    memory: Arc<dyn Memory>,
}

impl StoreFarmerProfileTool {
    pub fn new(memory: Arc<dyn Memory>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for StoreFarmerProfileTool {
    fn name(&self) -> ToolName {
        ToolName::StoreFarmerProfile
    }

    fn description(&self) -> &str {
        "Store farmer information in long term memory."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "info": {
                    "type": "string",
                    "description": "Farmer facts worth remembering: crops, location, livestock, farm size, past problems"
                }
            },
            "required": ["info"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let info = extract_string_arg(&args, "info")?;
        if info.trim().is_empty() {
            return Err(ToolError::InvalidArgument("'info' must not be empty".into()));
        }

        self.memory.add(&info).await?;
        tracing::debug!(chars = info.len(), "stored farmer profile");

        Ok(PROFILE_STORED.to_string())
    }
}
