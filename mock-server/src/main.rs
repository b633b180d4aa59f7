use mock_server::{ServerConfig, DEFAULT_TOKEN};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let config = ServerConfig {
        token: std::env::var("MOCK_CANVAS_TOKEN").unwrap_or_else(|_| DEFAULT_TOKEN.to_string()),
        ..ServerConfig::default()
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "mock canvas listening");
    mock_server::run(listener, config).await
}
