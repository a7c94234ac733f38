use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of capabilities the agent can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    StoreFarmerProfile,
    RetrieveMemory,
    SendAlert,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [
        ToolName::StoreFarmerProfile,
        ToolName::RetrieveMemory,
        ToolName::SendAlert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoreFarmerProfile => "store_farmer_profile",
            Self::RetrieveMemory => "retrieve_memory",
            Self::SendAlert => "send_alert",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> ToolName;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value;

    /// Runs the tool. Arguments arrive untyped and are validated here.
    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}
