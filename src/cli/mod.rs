pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "timeline")]
#[command(about = "Timeline CLI - walk and inspect paginated timeline endpoints")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Follow rel=\"next\" links from a timeline URL until exhausted")]
    Walk(commands::walk::WalkArgs),

    #[command(about = "Issue a bearer token for local testing")]
    Token(commands::token::TokenArgs),

    #[command(about = "Check a server's /health endpoint")]
    Ping {
        #[arg(help = "Server origin, e.g. http://localhost:3000")]
        server: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Walk(args) => commands::walk::handle(args, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Ping { server } => commands::ping::handle(&server, output_format).await,
    }
}
