//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::AppError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quizgen_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quizgen_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = handle_text(&txt, &state).await;
        if let Err(e) = socket.send(Message::Text(reply)).await {
          error!(target: "quizgen_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "quizgen_backend", "WebSocket disconnected");
}

/// Parse, dispatch, serialize response.
async fn handle_text(txt: &str, state: &AppState) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "quizgen_backend", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state).await
    }
    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e), diagnostics: vec![] },
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

fn error_reply(e: AppError) -> ServerWsMessage {
  ServerWsMessage::Error { diagnostics: e.diagnostics(), message: e.to_string() }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewSession => ServerWsMessage::Session(logic::create_session(state).await),

    ClientWsMessage::GenerateQuiz(input) => match logic::generate_quiz(state, input).await {
      Ok(quiz) => {
        info!(target: "quiz", session = %quiz.session_id, questions = quiz.total_questions, "WS quiz served");
        ServerWsMessage::Quiz(quiz)
      }
      Err(e) => error_reply(e),
    },

    ClientWsMessage::SubmitAnswers(input) => match logic::submit_answers(state, input).await {
      Ok(results) => {
        info!(target: "quiz", session = %results.session_id, correct = results.overall.correct, "WS answers scored");
        ServerWsMessage::Results(results)
      }
      Err(e) => error_reply(e),
    },

    ClientWsMessage::History { session_id } => match logic::history(state, &session_id).await {
      Ok(h) => ServerWsMessage::History(h),
      Err(e) => error_reply(e),
    },

    ClientWsMessage::Parse { text } => ServerWsMessage::Parsed(logic::parse_text(&text)),
  }
}
