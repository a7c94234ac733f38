use crate::memory::LocalMemory;
use crate::traits::Memory;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub const MEMORY_FILE: &str = "memory.jsonl";

pub fn create_memory(workspace_dir: &Path) -> Result<Arc<dyn Memory>> {
    Ok(Arc::new(LocalMemory::open(workspace_dir.join(MEMORY_FILE))?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn factory_local() {
        let tmp = TempDir::new().unwrap();
        let mem = create_memory(tmp.path()).unwrap();
        assert_eq!(mem.name(), "local");
    }
}
