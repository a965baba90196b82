//! In-memory REST mock server.

use clap::Parser;
use inmem_server::{build_backend, create_app, init_logging, ServerConfig};
use std::sync::Arc;
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    let backend = build_backend(&config).await?;
    let app = create_app(Arc::new(backend));
    serve(app, &config).await
}
