pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blog-post-api")]
#[command(about = "Blog Post API - posts with file and category references")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Mint a JWT for a user id (posts by a user without a users row expand updatedBy to null)")]
    Token {
        #[arg(long, help = "User id placed in the token subject")]
        user: uuid::Uuid,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Migrate => commands::migrate::handle().await,
        Commands::Token { user } => commands::token::handle(user),
    }
}
