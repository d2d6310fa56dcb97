pub mod agent;
pub mod cache;
pub mod context;
pub mod memory;
pub mod session;
pub mod tooling;

pub use context::load_context_files;
pub use session::AgentSession;
