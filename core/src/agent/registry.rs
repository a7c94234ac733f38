use crate::error::ToolError;
use crate::notify::AlertChannels;
use crate::tools::{RetrieveMemoryTool, SendAlertTool, StoreFarmerProfileTool};
use crate::traits::{Memory, Tool, ToolName, ToolSpec};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maps each [`ToolName`] to its handler.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolName, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full FarmGuard tool set.
    pub fn farmguard(memory: Arc<dyn Memory>, channels: AlertChannels) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StoreFarmerProfileTool::new(memory.clone())));
        registry.register(Arc::new(RetrieveMemoryTool::new(memory)));
        registry.register(Arc::new(SendAlertTool::new(channels)));
        registry
    }

    /// Registers `tool` under its own name, replacing any previous handler.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn get(&self, name: ToolName) -> Option<Arc<dyn Tool>> {
        self.tools.get(&name).cloned()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        let tool_name: ToolName = name.parse()?;
        self.get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::LocalMemory;

    #[test]
    fn farmguard_registers_the_closed_set() {
        let registry =
            ToolRegistry::farmguard(Arc::new(LocalMemory::in_memory()), AlertChannels::log_only());

        let names: Vec<String> = registry.get_specs().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["store_farmer_profile", "retrieve_memory", "send_alert"]
        );
        for name in ToolName::ALL {
            assert_eq!(registry.get(name).unwrap().name(), name);
        }
    }

    #[test]
    fn resolve_rejects_unknown_and_unregistered() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(RetrieveMemoryTool::new(Arc::new(LocalMemory::in_memory()))));

        assert!(registry.resolve("retrieve_memory").is_ok());
        assert!(matches!(
            registry.resolve("send_alert"),
            Err(ToolError::UnknownTool(_))
        ));
        assert!(matches!(
            registry.resolve("shell"),
            Err(ToolError::UnknownTool(_))
        ));
    }

    #[test]
    fn specs_carry_schemas() {
        let registry =
            ToolRegistry::farmguard(Arc::new(LocalMemory::in_memory()), AlertChannels::log_only());
        let alert = registry.get(ToolName::SendAlert).unwrap().spec();
        assert_eq!(alert.parameters["required"][0], "message");
    }
}
