use tracing_subscriber::EnvFilter;

mod config;
mod core;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to info-level output unless the environment overrides it.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    core::start_runner().await
}
