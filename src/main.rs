use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let config = fitserve::config::Config::from_env();
    info!(
        target: "fitserve",
        "fitserve starting: RUST_LOG='{}', port={}, db={}@{}/{}, data_dir='{}', public_dir='{}'",
        rust_log,
        config.port,
        config.db_user,
        config.db_host,
        config.db_name,
        config.data_dir.display(),
        config.public_dir.display()
    );

    fitserve::server::run_with_config(config).await
}
