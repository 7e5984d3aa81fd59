use serde_json::json;

use crate::app;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::Database;

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    app::serve(config).await
}

pub async fn migrate(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = Database::connect(&config.database).await?;
    db.migrate().await?;
    db.close().await;

    output_success(
        &output_format,
        &format!("Migrations applied to {}", config.database.url),
        Some(json!({ "database": config.database.url })),
    )
}
