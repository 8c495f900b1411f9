use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "freelancehub")]
#[command(author, version, about = "Telegram bot for the FreelanceHub marketplace", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (the default when no subcommand is given)
    Run {
        /// Use webhook mode instead of long polling
        #[arg(long)]
        webhook: bool,
    },

    /// Print registered users from the configured database
    Users {
        /// Limit the number of users printed
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
