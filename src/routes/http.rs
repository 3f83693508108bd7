//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::Result;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, model_enabled: state.openai.is_some() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_session(State(state): State<Arc<AppState>>) -> Json<SessionOut> {
  Json(logic::create_session(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> Result<Json<QuizOut>> {
  let out = logic::generate_quiz(&state, body).await?;
  info!(target: "quiz", session = %out.session_id, questions = out.total_questions, "HTTP quiz served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, answers = body.answers.len()))]
pub async fn http_post_answers(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswersIn>,
) -> Result<Json<ResultsOut>> {
  let out = logic::submit_answers(&state, body).await?;
  info!(target: "quiz", session = %out.session_id, correct = out.overall.correct, total = out.overall.total, "HTTP answers scored");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(session = %q.session_id))]
pub async fn http_get_history(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryOut>> {
  Ok(Json(logic::history(&state, &q.session_id).await?))
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_parse(Json(body): Json<ParseIn>) -> Json<ParseOut> {
  Json(logic::parse_text(&body.text))
}
