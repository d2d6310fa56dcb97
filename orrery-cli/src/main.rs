mod cli;
mod error;
mod repl;
mod stdio;

use clap::Parser;
use cli::{Cli, RunMode};
use error::CliError;
use orrery_core::model::ModelRegistry;
use orrery_core::{AgentSession, RuntimeConfig, init_tracing};
use std::process::ExitCode;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // Single-shot and JSON-lines output must stay machine-readable.
    init_tracing(cli.prompt.is_some() || cli.mode == RunMode::Stdio);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    debug!(?cli.mode, config = ?cli.config, agent = ?cli.agent, "CLI arguments parsed");
    let config = RuntimeConfig::load(cli.config.as_deref())?;
    let agent = match cli.agent.clone() {
        Some(agent) => agent,
        None => config
            .agents
            .first()
            .map(|agent| agent.id.clone())
            .ok_or(CliError::NoAgents)?,
    };

    let registry = ModelRegistry::with_defaults();
    registry.validate_config(&config)?;
    info!(providers = ?registry.providers(), agents = config.agents.len(), "Starting orrery");
    let session = AgentSession::new(config, registry, Vec::new());

    if let Some(prompt) = cli.prompt.as_deref() {
        let outcome = session.chat(&agent, prompt).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(if outcome.error {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    match cli.mode {
        RunMode::Repl => repl::run(&session, &agent).await?,
        RunMode::Stdio => {
            info!(agent = agent.as_str(), "Entering STDIO mode; awaiting JSON line input");
            stdio::run(&session, &agent).await?
        }
    }
    Ok(ExitCode::SUCCESS)
}
