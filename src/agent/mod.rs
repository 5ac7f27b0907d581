//! Agent: session-aware entry point wrapping the turn controller.

pub mod agent;
pub mod session;

pub use agent::Agent;
pub use session::SessionLocks;
