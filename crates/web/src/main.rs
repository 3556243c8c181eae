use tracing_subscriber::EnvFilter;

use quotes_web::{LogFormat, StoreBackend, WebServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = WebServerConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match cfg.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let store = match &cfg.store {
        StoreBackend::Memory => "memory".to_string(),
        StoreBackend::Sqlite(path) => format!("sqlite:{}", path.display()),
    };
    tracing::info!(
        "Starting Quotes on http://{} (store: {}, test mode: {})",
        cfg.addr,
        store,
        cfg.test_mode
    );

    quotes_web::server::serve(cfg).await
}
