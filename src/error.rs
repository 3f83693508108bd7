//! Service-boundary error type. Every handler returns `Result<_, AppError>`,
//! so failures always reach the client as `{"error": "..."}` with a status code.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::parser::ParseFailure;
use crate::prompts::RequestError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  BadRequest(String),

  #[error(transparent)]
  InvalidRequest(#[from] RequestError),

  #[error("Unknown session: {0}")]
  UnknownSession(String),

  #[error("No active quiz in this session. Generate one first.")]
  NoActiveQuiz,

  #[error("Couldn't generate valid questions. {0}. Try a more specific topic, another difficulty level, or a different model.")]
  Unparseable(#[from] ParseFailure),

  #[error("{0}")]
  Upstream(String),
}

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      AppError::BadRequest(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
      AppError::UnknownSession(_) => StatusCode::NOT_FOUND,
      AppError::NoActiveQuiz | AppError::Unparseable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
  }

  /// Discarded-question reasons collected while parsing, if any.
  pub fn diagnostics(&self) -> Vec<String> {
    match self {
      AppError::Unparseable(f) => f.diagnostics.iter().map(|d| d.to_string()).collect(),
      _ => Vec::new(),
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = json!({ "error": self.to_string(), "diagnostics": self.diagnostics() });
    (self.status(), Json(body)).into_response()
  }
}
