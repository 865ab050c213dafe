//! Minimal HTTP API: a single `POST /echo` endpoint with permissive CORS.

mod echo;

use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

pub use echo::{echo, EchoRequest, EchoResponse};

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Build the API router. Cross-origin requests are allowed from any origin,
/// for any method and header.
pub fn create_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().route("/echo", post(echo)).layer(cors)
}

/// Serve the API until the process is stopped.
pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Echo API listening");
    axum::serve(listener, create_router()).await
}
