//! Standalone simulation API server

use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() {
    archsim_core::init_simulation_logging();

    let addr: SocketAddr = std::env::var("ARCHSIM_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("ARCHSIM_ADDR must be a socket address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    info!(%addr, "simulation API listening");

    axum::serve(listener, archsim_http::router())
        .await
        .expect("server error");
}
