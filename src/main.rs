use doc_portal_api::{app, config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    app::init_tracing();

    let config = AppConfig::from_env();
    tracing::info!("Starting Document Portal API in {} mode", config.environment.as_str());

    app::serve(config).await
}
