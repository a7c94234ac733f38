pub mod agent;
pub mod config;
pub mod error;
pub mod memory;
pub mod notify;
pub mod providers;
pub mod session;
pub mod tools;
pub mod traits;

#[cfg(test)]
mod testing;

pub use agent::{AgentLoop, ContextBuilder, ToolRegistry, TurnOutcome};
pub use config::{Config, EmailConfig, TwilioConfig, load_config, save_config};
pub use error::{AgentError, SessionError, ToolError};
pub use memory::{LocalMemory, create_memory};
pub use notify::{AlertChannels, HttpEmailSender, LogChannel, TwilioClient, create_channels};
pub use providers::{OpenAIProvider, create_provider};
pub use session::Session;
pub use tools::{RetrieveMemoryTool, SendAlertTool, StoreFarmerProfileTool};
pub use traits::{
    ChatMessage, ChatRequest, ChatResponse, EmailChannel, Memory, Provider, SmsChannel, Tool,
    ToolCall, ToolName, ToolSpec, VoiceChannel,
};
