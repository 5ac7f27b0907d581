//! Agenda CLI binary entry point.

use agenda::agent::Agent;
use agenda::cli::{run_session, Cli};
use agenda::config::AgendaConfig;
use agenda::error::AgendaError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("AGENDA_LOG")
                .unwrap_or_else(|_| "agenda=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse_args();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AgendaError> {
    let mut config = AgendaConfig::load()?;
    cli.apply(&mut config);

    let agent = Agent::from_config(&config)?;
    let session_id = config.settings().session_id.clone();
    tracing::info!(session_id, model = %config.settings().model, "session started");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(&agent, &session_id, stdin, &mut stdout).await
}
