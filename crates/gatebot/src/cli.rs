use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gatebot")]
#[command(author, version, about = "Telegram bot gated behind a Flyer subscription check", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling) and the Flyer webhook receiver
    Run,

    /// Apply database migrations and exit
    Migrate,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
