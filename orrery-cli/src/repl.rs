//! Line-based interactive chat.

use crate::error::CliError;
use orrery_core::AgentSession;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

const HELP: &str = "Commands: /agent <id> switches agent, /reset forgets the conversation, /exit quits.";

enum Command<'a> {
    Exit,
    Reset,
    Switch(&'a str),
    Help,
    Prompt(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    let line = line.trim();
    match line.split_once(char::is_whitespace).unwrap_or((line, "")) {
        ("/exit" | "/quit", _) => Command::Exit,
        ("/reset", _) => Command::Reset,
        ("/help", _) => Command::Help,
        ("/agent", id) if !id.trim().is_empty() => Command::Switch(id.trim()),
        _ => Command::Prompt(line),
    }
}

pub async fn run(session: &AgentSession, agent: &str) -> Result<(), CliError> {
    let mut agent = agent.to_string();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    stdout
        .write_all(format!("Chatting with '{agent}'. {HELP}\n").as_bytes())
        .await?;
    loop {
        stdout.write_all(format!("{agent}> ").as_bytes()).await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let reply = match parse(&line) {
            Command::Exit => break,
            Command::Help => HELP.to_string(),
            Command::Reset => {
                session.invalidate(&agent).await;
                info!(agent = agent.as_str(), "Conversation reset");
                "Conversation reset.".to_string()
            }
            Command::Switch(id) => match session.config().agent(id) {
                Ok(_) => {
                    agent = id.to_string();
                    format!("Switched to '{agent}'.")
                }
                Err(err) => err.user_message(),
            },
            Command::Prompt(prompt) => match session.chat(&agent, prompt).await {
                Ok(outcome) => outcome.result,
                Err(err) => err.user_message(),
            },
        };
        stdout.write_all(format!("{reply}\n").as_bytes()).await?;
    }

    stdout.flush().await?;
    Ok(())
}
