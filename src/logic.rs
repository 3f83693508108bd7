//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Generating a quiz (prompt -> model or sample text -> parser -> session)
//!   - Submitting answers (scoring, review, wrong-answer analysis, history)
//!   - Reading history and parsing arbitrary text for troubleshooting

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{answer_key, AnswerSheet, QuizHistoryEntry, QuizSet, WrongAnswerRecord};
use crate::error::{AppError, Result};
use crate::parser::parse_quiz;
use crate::prompts::QuizRequest;
use crate::protocol::*;
use crate::review::{extract_wrong_answers, review_answers, WrongAnswers};
use crate::scoring::score_quiz;
use crate::seeds::{sample_quiz_response, SAMPLE_TOPIC};
use crate::state::{ActiveQuiz, AppState};

const PERFECT_SCORE_TEXT: &str = "Excellent! You answered all questions correctly.";

pub async fn create_session(state: &AppState) -> SessionOut {
  SessionOut { session_id: state.create_session().await }
}

#[instrument(level = "info", skip(state, input), fields(topic = %input.topic))]
pub async fn generate_quiz(state: &AppState, input: GenerateIn) -> Result<QuizOut> {
  let req = QuizRequest::resolve(
    &input.topic,
    input.difficulty,
    input.style,
    input.questions_per_section,
    input.include_diagrams,
    input.model,
    &state.defaults,
  )?;
  let session_id = state.resolve_session(input.session_id.as_deref()).await?;

  let (raw, model, source) = match &state.openai {
    Some(oa) => {
      let text = oa.generate_quiz_text(&state.prompts, &req).await.map_err(AppError::Upstream)?;
      let model = req.model.clone().unwrap_or_else(|| oa.strong_model.clone());
      (text, model, QuizSource::Model)
    }
    None => {
      warn!(target: "quiz", topic = %req.topic, sample = SAMPLE_TOPIC, "No model client; serving the built-in sample quiz");
      (sample_quiz_response().to_string(), "sample".to_string(), QuizSource::Sample)
    }
  };

  // A failed parse leaves the session's previous quiz untouched.
  let parsed = parse_quiz(&raw)?;
  let diagnostics: Vec<String> = parsed.diagnostics.iter().map(|d| d.to_string()).collect();
  let topic = match source {
    QuizSource::Model => req.topic.clone(),
    QuizSource::Sample => SAMPLE_TOPIC.to_string(),
  };

  let out = QuizOut {
    session_id: session_id.clone(),
    topic: topic.clone(),
    model: model.clone(),
    source,
    total_questions: parsed.quiz.total_questions(),
    sections: to_sections_out(&parsed.quiz),
    diagnostics,
  };

  state.set_active_quiz(&session_id, ActiveQuiz::new(topic, model, parsed.quiz)).await?;
  info!(
    target: "quiz",
    session = %session_id,
    questions = out.total_questions,
    discarded = out.diagnostics.len(),
    ?source,
    "Quiz generated"
  );
  Ok(out)
}

/// Every question must be answered with an index inside its option list.
fn check_answers(quiz: &QuizSet, answers: &AnswerSheet) -> Result<()> {
  let total = quiz.total_questions();
  let answered = quiz
    .numbered()
    .filter(|(s, n, _)| answers.contains_key(&answer_key(*s, *n)))
    .count();
  if answered < total {
    return Err(AppError::BadRequest(format!(
      "Please answer all {} questions. You've answered {}.",
      total, answered
    )));
  }
  for (section, number, q) in quiz.numbered() {
    let key = answer_key(section, number);
    if let Some(&choice) = answers.get(&key) {
      if choice >= q.options.len() {
        return Err(AppError::BadRequest(format!("Answer for {key} is out of range: {choice}")));
      }
    }
  }
  Ok(())
}

#[instrument(level = "info", skip(state, input), fields(session = %input.session_id, answers = input.answers.len()))]
pub async fn submit_answers(state: &AppState, input: AnswersIn) -> Result<ResultsOut> {
  let active = state.active_quiz(&input.session_id).await?;
  let answers: AnswerSheet = input.answers;
  check_answers(&active.quiz, &answers)?;

  let mut quiz = active.quiz;
  quiz.record_answers(&answers);

  let report = score_quiz(&quiz, &answers);
  let review = review_answers(&quiz, &answers);
  let wrong = extract_wrong_answers(&quiz, &answers);
  debug!(target: "quiz", wrong = wrong.records().len(), "Extracted wrong answers");
  let analysis = analyze(state, &active.topic, wrong).await;

  let entry = QuizHistoryEntry {
    topic: active.topic.clone(),
    model: active.model.clone(),
    date: Utc::now(),
    correct: report.overall.correct,
    total: report.overall.total,
    percentage: report.overall.percentage,
  };
  state.record_result(&input.session_id, &active.generation, quiz, entry).await?;

  info!(
    target: "quiz",
    session = %input.session_id,
    correct = report.overall.correct,
    total = report.overall.total,
    tier = report.tier.label(),
    "Quiz scored"
  );

  Ok(ResultsOut {
    session_id: input.session_id,
    topic: active.topic,
    model: active.model,
    overall: report.overall,
    sections: report.sections,
    performance: report.tier,
    recommendations: report.tier.recommendations(),
    review,
    analysis,
  })
}

/// Run the analysis collaborators. Their failures become warnings next to
/// the raw wrong-answer list, never errors.
async fn analyze(state: &AppState, topic: &str, wrong: WrongAnswers) -> AnalysisOut {
  let records: Vec<WrongAnswerRecord> = match wrong {
    WrongAnswers::Perfect => {
      return AnalysisOut {
        status: AnalysisStatus::Perfect,
        text: PERFECT_SCORE_TEXT.into(),
        warnings: vec![],
        wrong_answers: vec![],
        themes: Default::default(),
      }
    }
    WrongAnswers::Found(records) => records,
  };

  let Some(oa) = &state.openai else {
    return AnalysisOut {
      status: AnalysisStatus::Unavailable,
      text: String::new(),
      warnings: vec!["Could not generate analysis: no model client configured.".into()],
      wrong_answers: records,
      themes: Default::default(),
    };
  };

  let mut warnings = Vec::new();
  let (status, text) = match oa.analyze_wrong_answers(&state.prompts, topic, &records).await {
    Ok(text) => (AnalysisStatus::Analyzed, text),
    Err(e) => {
      error!(target: "quiz", error = %e, "Wrong-answer analysis failed");
      warnings.push(e);
      (AnalysisStatus::Unavailable, String::new())
    }
  };
  let themes = match oa.identify_themes(&state.prompts, topic, &records).await {
    Ok(themes) => themes,
    Err(e) => {
      error!(target: "quiz", error = %e, "Theme extraction failed");
      warnings.push(format!("Could not identify common themes: {e}"));
      Default::default()
    }
  };

  AnalysisOut { status, text, warnings, wrong_answers: records, themes }
}

pub async fn history(state: &AppState, session_id: &str) -> Result<HistoryOut> {
  let mut entries = state.history(session_id).await?;
  entries.reverse();
  Ok(HistoryOut { session_id: session_id.to_string(), entries })
}

/// Parse arbitrary text with the quiz parser; never stores anything.
#[instrument(level = "info", skip(text), fields(text_len = text.len()))]
pub fn parse_text(text: &str) -> ParseOut {
  match parse_quiz(text) {
    Ok(parsed) => ParseOut {
      ok: true,
      quiz: Some(parsed.quiz),
      empty_sections: vec![],
      diagnostics: parsed.diagnostics.iter().map(|d| d.to_string()).collect(),
    },
    Err(failure) => {
      let mut diagnostics: Vec<String> = failure.diagnostics.iter().map(|d| d.to_string()).collect();
      diagnostics.push(failure.to_string());
      ParseOut { ok: false, quiz: None, empty_sections: failure.empty_sections, diagnostics }
    }
  }
}
