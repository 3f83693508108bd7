//! Quizgen · LLM multiple-choice quiz backend
//!
//! - Axum HTTP + WebSocket API
//! - Tolerant parser turning model output into a three-section quiz
//! - Scoring, per-question review and wrong-answer analysis
//! - Optional OpenAI integration; without a key the built-in sample quiz is served
//! - Static frontend fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   OPENAI_API_KEY      : enables OpenAI integration if present
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_FAST_MODEL   : default "gpt-4o-mini" (analysis, themes)
//!   OPENAI_STRONG_MODEL : default "gpt-4o" (quiz generation)
//!   OPENAI_TIMEOUT_SECS : request timeout, default 120
//!   QUIZ_CONFIG_PATH    : path to TOML config (prompts + generation defaults)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod seeds;
mod normalize;
mod classify;
mod validate;
mod parser;
mod scoring;
mod review;
mod prompts;
mod openai;
mod state;
mod protocol;
mod logic;
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

  // Shared state: sessions, optional OpenAI client, prompts and defaults.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizgen_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
