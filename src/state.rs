//! Application state: per-session quiz context, prompts, defaults, and the
//! optional model client.
//!
//! Each session owns its active quiz and its score history. Nothing here is
//! persisted; history lives for the lifetime of the process. Core parsing and
//! scoring never touch this state, handlers pass data in and out explicitly.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, GenerationDefaults, Prompts, QuizConfig};
use crate::domain::{QuizHistoryEntry, QuizSet};
use crate::error::{AppError, Result};
use crate::openai::OpenAI;

/// The quiz currently being answered in a session.
#[derive(Clone, Debug)]
pub struct ActiveQuiz {
    /// Unique per generation; a later generation never matches an earlier one.
    pub generation: String,
    pub topic: String,
    pub model: String,
    pub quiz: QuizSet,
}

impl ActiveQuiz {
    pub fn new(topic: impl Into<String>, model: impl Into<String>, quiz: QuizSet) -> Self {
        Self {
            generation: Uuid::new_v4().to_string(),
            topic: topic.into(),
            model: model.into(),
            quiz,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct QuizSession {
    pub active: Option<ActiveQuiz>,
    pub history: Vec<QuizHistoryEntry>,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, QuizSession>>>,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
    pub defaults: GenerationDefaults,
}

impl AppState {
    /// Build state from env: load config, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_quiz_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "quizgen_backend", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "OpenAI enabled.");
        } else {
            info!(target: "quizgen_backend", "OpenAI disabled (no OPENAI_API_KEY). Serving the built-in sample quiz.");
        }

        Self::with_config(cfg, openai)
    }

    pub fn with_config(cfg: QuizConfig, openai: Option<OpenAI>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            openai,
            prompts: cfg.prompts,
            defaults: cfg.defaults,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), QuizSession::default());
        info!(target: "quiz", session = %id, "Session created");
        id
    }

    /// Use the given session (which must exist) or open a fresh one.
    pub async fn resolve_session(&self, id: Option<&str>) -> Result<String> {
        let Some(id) = id else {
            return Ok(self.create_session().await);
        };
        let exists = { self.sessions.read().await.contains_key(id) };
        if exists {
            Ok(id.to_string())
        } else {
            Err(AppError::UnknownSession(id.to_string()))
        }
    }

    /// Replace the session's active quiz; the previous one is discarded.
    #[instrument(level = "debug", skip(self, quiz), fields(%session))]
    pub async fn set_active_quiz(&self, session: &str, quiz: ActiveQuiz) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(session)
            .ok_or_else(|| AppError::UnknownSession(session.to_string()))?;
        entry.active = Some(quiz);
        Ok(())
    }

    pub async fn active_quiz(&self, session: &str) -> Result<ActiveQuiz> {
        let sessions = self.sessions.read().await;
        let entry = sessions
            .get(session)
            .ok_or_else(|| AppError::UnknownSession(session.to_string()))?;
        entry.active.clone().ok_or(AppError::NoActiveQuiz)
    }

    /// Append one history entry and store the answered quiz back, unless a
    /// newer generation replaced it in the meantime.
    #[instrument(level = "debug", skip(self, quiz, entry), fields(%session, %generation))]
    pub async fn record_result(
        &self,
        session: &str,
        generation: &str,
        quiz: QuizSet,
        entry: QuizHistoryEntry,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let s = sessions
            .get_mut(session)
            .ok_or_else(|| AppError::UnknownSession(session.to_string()))?;
        match s.active.as_mut() {
            Some(active) if active.generation == generation => active.quiz = quiz,
            _ => debug!(target: "quiz", "Active quiz replaced while scoring; keeping the newer one"),
        }
        s.history.push(entry);
        Ok(())
    }

    pub async fn history(&self, session: &str) -> Result<Vec<QuizHistoryEntry>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session)
            .map(|s| s.history.clone())
            .ok_or_else(|| AppError::UnknownSession(session.to_string()))
    }
}
