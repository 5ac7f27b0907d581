//! Agenda: a tool-calling conversational agent that books calendar events.
//!
//! A user message goes into a session; the [`agent_loop::TurnController`]
//! calls the model, runs any `create_calendar_event` actions it asks for,
//! feeds the results back, and stops once the model answers in plain text.
//!
//! # Quick Start
//!
//! ```no_run
//! use agenda::prelude::*;
//!
//! # async fn example() -> agenda::error::Result<()> {
//! let config = AgendaConfig::load()?;
//! let agent = Agent::from_config(&config)?;
//! let outcome = agent
//!     .send("1", "Book a team meeting tomorrow 2-3pm")
//!     .await?;
//! println!("{}", outcome.text());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod agent_loop;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod store;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
