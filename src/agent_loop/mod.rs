//! Turn controller: the state machine that drives one user turn.

pub mod events;
pub mod runner;
pub mod types;

pub use events::*;
pub use runner::*;
pub use types::*;
