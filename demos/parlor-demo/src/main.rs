//! Runs a Parlor server with both reference games registered.
//!
//! Configuration is deliberately thin: `PARLOR_ADDR` overrides the bind
//! address, `RUST_LOG` controls log filtering.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use parlor::{Game, Server};
use parlor_bravewength::Bravewength;
use parlor_skull::Skull;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("PARLOR_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_owned());

    let server = Server::new([
        Arc::new(Bravewength::default()) as Arc<dyn Game>,
        Arc::new(Skull) as Arc<dyn Game>,
    ]);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "parlor listening");
    axum::serve(listener, server.router()).await?;
    Ok(())
}
