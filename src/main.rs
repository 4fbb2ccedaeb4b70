use tracing_subscriber::EnvFilter;

use api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file when present; real environment
    // variables win in containerized deployments.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    api::start().await?;

    Ok(())
}
