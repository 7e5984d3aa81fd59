use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::Database;
use crate::services::accounts::{self, Registration};
use crate::types::Role;

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    #[arg(help = "Login email")]
    pub email: String,

    #[arg(help = "Password (same strength rules as registration)")]
    pub password: String,

    #[arg(long, default_value = "client", value_parser = parse_role, help = "client or professional")]
    pub role: Role,

    #[arg(long, help = "Family name")]
    pub last_name: String,

    #[arg(long, help = "Given name")]
    pub first_name: String,

    #[arg(long)]
    pub company: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse().map_err(|e: crate::types::ParseEnumError| e.to_string())
}

pub async fn create(args: CreateUserArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = Database::connect(&config.database).await?;
    db.migrate().await?;

    let registration = Registration {
        email: args.email,
        password: args.password,
        role: args.role,
        last_name: args.last_name,
        first_name: args.first_name,
        company: args.company,
        address: None,
        phone: None,
        gdpr_accepted: true,
        terms_accepted: true,
    };

    let result = accounts::register(&db, registration).await;
    db.close().await;
    let user = result?;

    output_success(
        &output_format,
        &format!("Created {} account {} (id {})", user.role, user.email, user.id),
        Some(json!({ "user": user })),
    )
}
