pub mod factory;
pub mod local;

pub use factory::create_memory;
pub use local::{LocalMemory, MemoryEntry};
