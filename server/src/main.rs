mod config;
mod routes;
mod services;
mod state;

use config::{ConfigError, RelayConfig};

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt::init();

    let config = RelayConfig::from_env()?;
    let port = config.port;
    if !config.static_dir.join("index.html").is_file() {
        tracing::warn!(static_dir = %config.static_dir.display(), "index.html not found; only the socket will work");
    }

    let state = state::AppState::new(config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "sketch relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
