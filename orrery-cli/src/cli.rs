use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "orrery",
    version,
    about = "Chat with the agents declared in an orrery configuration"
)]
pub struct Cli {
    /// Path to the TOML configuration (defaults to config/orrery.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Agent to talk to; defaults to the first one configured.
    #[arg(long, short)]
    pub agent: Option<String>,
    /// Send a single prompt, print the outcome as JSON and exit.
    #[arg(long, short)]
    pub prompt: Option<String>,
    #[arg(long, short, value_enum, default_value_t = RunMode::Repl)]
    pub mode: RunMode,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RunMode {
    /// Line-based interactive chat
    Repl,
    /// JSON lines on stdin/stdout
    Stdio,
}
