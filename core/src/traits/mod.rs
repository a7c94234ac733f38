pub mod channel;
pub mod memory;
pub mod provider;
pub mod tool;

pub use channel::{EmailChannel, SmsChannel, VoiceChannel};
pub use memory::Memory;
pub use provider::{ChatMessage, ChatRequest, ChatResponse, Provider, ToolCall};
pub use tool::{Tool, ToolName, ToolSpec};
