//! Minimal OpenAI-compatible client for quiz generation and answer analysis.
//!
//! We only call chat.completions and request either plain text or a strict JSON object.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//! Any OpenAI-compatible endpoint works (e.g. a local Ollama at http://localhost:11434/v1).
//!
//! NOTE: We never log the API key and we keep payload truncations short to avoid PII leaks.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::Prompts;
use crate::domain::WrongAnswerRecord;
use crate::prompts::{build_analysis_prompt, build_quiz_prompt, build_themes_prompt, QuizRequest};
use crate::util::trunc_for_log;

/// Responses starting with one of these are reported as analysis failures.
const FAILURE_PREFIXES: &[&str] = &["⚠️", "Error", "I'm sorry", "I am sorry", "Sorry"];

pub fn looks_like_failure(text: &str) -> bool {
  let t = text.trim();
  t.is_empty() || FAILURE_PREFIXES.iter().any(|p| t.starts_with(p))
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    // Whole-quiz generation is slow on local models; keep the default generous.
    let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(120);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, strong_model })
  }

  async fn post_chat(&self, req: &ChatCompletionRequest) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let res = self.client.post(&url)
      .header(USER_AGENT, "quizgen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    Ok(body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default())
  }

  /// Plain-text chat completion. Used for quiz generation and analysis.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model, user_len = user.len()))]
  async fn chat_plain(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<String, String> {
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: None,
    };
    Ok(self.post_chat(&req).await?.trim().to_string())
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model, user_len = user.len()))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, String> {
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };
    let text = self.post_chat(&req).await?;
    serde_json::from_str::<T>(&text).map_err(|e| format!("JSON parse error: {}", e))
  }

  // --- High-level helpers (domain-specialized) ---

  /// Ask the model for a quiz in the line-oriented MCQ format. Returns raw text.
  #[instrument(
    level = "info",
    skip(self, prompts, req),
    fields(topic = %req.topic, difficulty = %req.difficulty, count = req.questions_per_section)
  )]
  pub async fn generate_quiz_text(&self, prompts: &Prompts, req: &QuizRequest) -> Result<String, String> {
    let model = req.model.as_deref().unwrap_or(&self.strong_model);
    let user = build_quiz_prompt(prompts, req);
    let start = Instant::now();
    let result = self.chat_plain(model, &prompts.quiz_system, &user, 0.7).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(text) => {
        info!(?elapsed, %model, response_len = text.len(), "Model response received successfully");
        debug!(target: "quiz", preview = %trunc_for_log(text, 400), "Raw quiz text");
      }
      Err(e) => error!(?elapsed, %model, error = %e, "Model call failed during quiz generation"),
    }
    result.map_err(|e| format!("Model generation failed: {e}"))
  }

  /// Free-text study analysis of the wrong answers.
  #[instrument(level = "info", skip(self, prompts, records), fields(%topic, wrong = records.len()))]
  pub async fn analyze_wrong_answers(
    &self,
    prompts: &Prompts,
    topic: &str,
    records: &[WrongAnswerRecord],
  ) -> Result<String, String> {
    let user = build_analysis_prompt(prompts, topic, records);
    let text = self.chat_plain(&self.fast_model, &prompts.analysis_system, &user, 0.3).await?;
    if looks_like_failure(&text) {
      return Err(format!("Could not generate analysis: {}", trunc_for_log(&text, 200)));
    }
    Ok(text)
  }

  /// Theme label -> occurrence count. Anything but `{"themes": {label: count}}` is an error.
  #[instrument(level = "info", skip(self, prompts, records), fields(%topic, wrong = records.len()))]
  pub async fn identify_themes(
    &self,
    prompts: &Prompts,
    topic: &str,
    records: &[WrongAnswerRecord],
  ) -> Result<BTreeMap<String, u32>, String> {
    let user = build_themes_prompt(prompts, topic, records);
    let t: ThemesResponse = self.chat_json(&self.fast_model, &prompts.themes_system, &user, 0.0).await?;
    Ok(t.themes)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ThemesResponse { themes: BTreeMap<String, u32> }
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failure_prefixes() {
    assert!(looks_like_failure("⚠️ Model generation failed: timeout"));
    assert!(looks_like_failure("  I'm sorry, I can't help with that"));
    assert!(looks_like_failure(""));
    assert!(!looks_like_failure("Detailed Analysis for Rust:\nFocus Area 1: Lifetimes"));
  }

  #[test]
  fn openai_error_body_is_unwrapped() {
    let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Invalid API key"));
    assert_eq!(extract_openai_error("<html>bad gateway</html>"), None);
  }

  #[test]
  fn theme_counts_must_be_numbers() {
    let ok: ThemesResponse = serde_json::from_str(r#"{"themes": {"Lifetimes": 2}}"#).unwrap();
    assert_eq!(ok.themes.get("Lifetimes"), Some(&2));
    assert!(serde_json::from_str::<ThemesResponse>(r#"{"themes": {"Lifetimes": "two"}}"#).is_err());
    assert!(serde_json::from_str::<ThemesResponse>(r#"{"Lifetimes": 2}"#).is_err());
  }
}
