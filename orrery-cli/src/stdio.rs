//! JSON-lines front-end: one request object per stdin line, one response
//! object per stdout line.

use crate::error::CliError;
use orrery_core::AgentSession;
use serde::{Deserialize, Serialize};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct StdioRequest {
    #[serde(default)]
    agent: Option<String>,
    prompt: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct StdioResponse {
    agent: Option<String>,
    result: String,
    error: bool,
}

impl StdioResponse {
    fn error(agent: Option<String>, message: impl Into<String>) -> Self {
        Self {
            agent,
            result: message.into(),
            error: true,
        }
    }
}

pub async fn run(session: &AgentSession, default_agent: &str) -> Result<(), CliError> {
    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received STDIO line");
        let response = handle_line(session, default_agent, &line).await;
        write_response(&mut stdout, &response).await?;
    }

    stdout.flush().await?;
    Ok(())
}

async fn handle_line(session: &AgentSession, default_agent: &str, line: &str) -> StdioResponse {
    let request = match serde_json::from_str::<StdioRequest>(line) {
        Ok(request) => request,
        Err(err) => {
            error!(error = %err, "Failed to parse STDIO input line");
            return StdioResponse::error(None, format!("invalid JSON request: {err}"));
        }
    };

    let agent = request.agent.unwrap_or_else(|| default_agent.to_string());
    match session.chat(&agent, &request.prompt).await {
        Ok(outcome) => StdioResponse {
            agent: Some(agent),
            result: outcome.result,
            error: outcome.error,
        },
        Err(err) => {
            error!(agent = agent.as_str(), error = %err, "STDIO chat request failed");
            let message = err.user_message();
            StdioResponse::error(Some(agent), message)
        }
    }
}

async fn write_response(stdout: &mut io::Stdout, response: &StdioResponse) -> Result<(), CliError> {
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    stdout.write_all(&payload).await?;
    stdout.flush().await?;
    Ok(())
}
