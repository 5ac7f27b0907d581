//! Interactive console session.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::agent::Agent;
use crate::config::{parse_max_iterations, AgendaConfig};
use crate::error::{AgendaError, RecoverySuggestion};

/// Agenda: a calendar-scheduling chat agent
#[derive(Parser, Debug, Default)]
#[command(name = "agenda", version, about = "Chat with an assistant that can book calendar events")]
pub struct Cli {
    /// Model to use (format: provider:model, e.g., groq:llama3-70b-8192)
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Session id whose history the conversation continues
    #[arg(long)]
    pub session: Option<String>,

    /// Maximum model calls per turn
    #[arg(long, value_parser = parse_max_iterations)]
    pub max_iterations: Option<usize>,

    /// Keep history as JSON lines under this directory
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Time zone stamped on created events
    #[arg(long)]
    pub time_zone: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Overlay flags onto the loaded configuration (highest precedence).
    pub fn apply(&self, config: &mut AgendaConfig) {
        let settings = config.settings_mut();
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(system) = &self.system {
            settings.system_prompt = Some(system.clone());
        }
        if let Some(session) = &self.session {
            settings.session_id = session.clone();
        }
        if let Some(max) = self.max_iterations {
            settings.max_iterations = max;
        }
        if let Some(dir) = &self.store_dir {
            settings.store_dir = Some(dir.clone());
        }
        if let Some(tz) = &self.time_zone {
            settings.time_zone = tz.clone();
        }
        if let Some(t) = self.temperature {
            settings.temperature = Some(t);
        }
    }
}

/// Read lines from `input` and answer each with one turn until quit or EOF.
///
/// Turn failures are printed and the loop keeps going; only I/O and
/// storage errors on the console itself end the session with an error.
pub async fn run_session<R, W>(
    agent: &Agent,
    session_id: &str,
    input: R,
    output: &mut W,
) -> Result<(), AgendaError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(output, "User: ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output, "\nExiting...")?;
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            writeln!(output, "Exiting...")?;
            return Ok(());
        }

        match agent.send(session_id, line).await {
            Ok(_) => render_last(agent, session_id, output)?,
            Err(err) => {
                warn!(session_id, error = %err, "turn failed");
                writeln!(output, "Error: {}", user_message(&err))?;
                if matches!(err, AgendaError::IterationLimit { .. }) {
                    render_last(agent, session_id, output)?;
                }
            }
        }
    }
}

/// Plain wording for a failed turn; the error itself goes to the log.
fn user_message(err: &AgendaError) -> &'static str {
    if let AgendaError::IterationLimit { .. } = err {
        return "I couldn't finish that request. Please try rephrasing it.";
    }
    match err.recovery_suggestion() {
        RecoverySuggestion::CheckCredentials => {
            "The assistant is not authorized. Check your API keys."
        }
        RecoverySuggestion::RetryWithBackoff => {
            "The assistant is unavailable right now. Please try again."
        }
        RecoverySuggestion::CheckConfiguration => {
            "The assistant is misconfigured. Check your settings."
        }
        RecoverySuggestion::CheckStorage => "The conversation could not be saved.",
        _ => "Something went wrong. Please try again.",
    }
}

fn render_last<W: Write>(agent: &Agent, session_id: &str, output: &mut W) -> Result<(), AgendaError> {
    match agent.last_message(session_id)? {
        Some(message) if message.is_tool_result() => {
            writeln!(output, "Tool Output: {}", message.content())?
        }
        Some(message) => writeln!(output, "AI: {}", message.content())?,
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_flags() {
        let cli = Cli::try_parse_from(["agenda"]).unwrap();
        assert!(cli.model.is_none());
        assert!(cli.max_iterations.is_none());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "agenda",
            "-m",
            "openai:gpt-4o",
            "-s",
            "You book meetings",
            "--session",
            "work",
            "--max-iterations",
            "4",
            "--time-zone",
            "UTC",
            "-t",
            "0.2",
        ])
        .unwrap();

        let mut config = AgendaConfig::new();
        cli.apply(&mut config);
        let settings = config.settings();
        assert_eq!(settings.model, "openai:gpt-4o");
        assert_eq!(settings.system_prompt.as_deref(), Some("You book meetings"));
        assert_eq!(settings.session_id, "work");
        assert_eq!(settings.max_iterations, 4);
        assert_eq!(settings.time_zone, "UTC");
        assert_eq!(settings.temperature, Some(0.2));
    }

    #[test]
    fn zero_max_iterations_flag_is_rejected() {
        assert!(Cli::try_parse_from(["agenda", "--max-iterations", "0"]).is_err());
    }

    #[test]
    fn turn_errors_are_reworded_for_the_user() {
        let err = AgendaError::model_unavailable(AgendaError::api(503, "upstream overloaded"));
        let message = user_message(&err);
        assert_eq!(message, "The assistant is unavailable right now. Please try again.");
        assert!(!message.contains("503"));

        let err = AgendaError::Storage("/tmp/x.jsonl: disk full".into());
        assert_eq!(user_message(&err), "The conversation could not be saved.");
    }
}
