//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{answer_key, QuizHistoryEntry, QuizSet, Section, WrongAnswerRecord};
use crate::prompts::{Difficulty, QuestionStyle};
use crate::review::AnswerReview;
use crate::scoring::{PerformanceTier, Score, SectionScore};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewSession,
    GenerateQuiz(GenerateIn),
    SubmitAnswers(AnswersIn),
    History {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Parse {
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session(SessionOut),
    Quiz(QuizOut),
    Results(ResultsOut),
    History(HistoryOut),
    Parsed(ParseOut),
    Error {
        message: String,
        diagnostics: Vec<String>,
    },
}

//
// HTTP request/response DTOs (also embedded in WS messages)
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    #[serde(rename = "modelEnabled")]
    pub model_enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIn {
    #[serde(default)]
    pub session_id: Option<String>,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub style: Option<QuestionStyle>,
    #[serde(default)]
    pub questions_per_section: Option<u8>,
    #[serde(default)]
    pub include_diagrams: Option<bool>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A question as shown to the quiz taker: no answer, no explanation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub number: usize,
    /// Key to use in the answers map.
    pub key: String,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SectionOut {
    pub section: Section,
    pub questions: Vec<QuestionOut>,
}

/// Where the quiz text came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuizSource {
    Model,
    Sample,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOut {
    pub session_id: String,
    pub topic: String,
    pub model: String,
    pub source: QuizSource,
    pub total_questions: usize,
    pub sections: Vec<SectionOut>,
    /// Questions dropped while parsing (recoverable).
    pub diagnostics: Vec<String>,
}

/// Convert the internal quiz into the answer-free view.
pub fn to_sections_out(quiz: &QuizSet) -> Vec<SectionOut> {
    quiz.sections()
        .map(|(section, questions)| SectionOut {
            section,
            questions: questions
                .iter()
                .enumerate()
                .map(|(i, q)| QuestionOut {
                    number: i + 1,
                    key: answer_key(section, i + 1),
                    text: q.text.clone(),
                    options: q.options.clone(),
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersIn {
    pub session_id: String,
    pub answers: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Every answer was right; no analysis requested.
    Perfect,
    Analyzed,
    /// Analysis could not be produced; see `warnings` and `wrongAnswers`.
    Unavailable,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOut {
    pub status: AnalysisStatus,
    pub text: String,
    pub warnings: Vec<String>,
    pub wrong_answers: Vec<WrongAnswerRecord>,
    pub themes: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsOut {
    pub session_id: String,
    pub topic: String,
    pub model: String,
    pub overall: Score,
    pub sections: Vec<SectionScore>,
    pub performance: PerformanceTier,
    pub recommendations: Vec<String>,
    pub review: Vec<AnswerReview>,
    pub analysis: AnalysisOut,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOut {
    pub session_id: String,
    /// Newest first.
    pub entries: Vec<QuizHistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ParseIn {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOut {
    pub ok: bool,
    pub quiz: Option<QuizSet>,
    pub empty_sections: Vec<Section>,
    pub diagnostics: Vec<String>,
}
