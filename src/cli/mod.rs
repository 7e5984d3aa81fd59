pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Portal CLI - Operator commands for the document portal")]
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
    #[command(about = "Run the HTTP server")]
    Serve,

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Create an account with the same checks as registration")]
    CreateUser(commands::user::CreateUserArgs),

    #[command(about = "Remove empty directories under the upload root")]
    CleanUploads(commands::uploads::CleanUploadsArgs),
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
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve => commands::server::serve(config).await,
        Commands::Migrate => commands::server::migrate(config, output_format).await,
        Commands::CreateUser(args) => commands::user::create(args, config, output_format).await,
        Commands::CleanUploads(args) => commands::uploads::clean(args, config, output_format),
    }
}
