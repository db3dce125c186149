//! Study Momentum · progress tracker backend
//!
//! - Axum HTTP + WebSocket API over a single persisted `ProgressState`
//! - Write-through JSON blob persistence (one versioned record on disk)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000, overrides config)
//!   TRACKER_CONFIG_PATH : path to TOML config (storage path, port)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod config;
mod catalog;
mod generator;
mod engine;
mod store;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = config::load_config_from_env();

  // Build shared application state: load the persisted progress blob.
  let state = Arc::new(AppState::new(&cfg));

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // PORT env overrides the configured port.
  let port = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(cfg.port);
  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "momentum_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
