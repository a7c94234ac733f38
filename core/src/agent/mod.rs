pub mod context;
pub mod dispatcher;
pub mod gateway;
pub mod loop_;
pub mod registry;

pub use context::ContextBuilder;
pub use dispatcher::ToolDispatcher;
pub use gateway::ModelGateway;
pub use loop_::{AgentLoop, TurnOutcome};
pub use registry::ToolRegistry;
