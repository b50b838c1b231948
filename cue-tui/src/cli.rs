use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cue-tui")]
#[command(about = "Terminal control panel for ProPresenter countdown timers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Control timers on a ProPresenter host
    Run,
    /// Run against an in-memory backend with seeded timers
    Dev,
    /// Print config path and create a default file if missing
    ConfigPath,
}
