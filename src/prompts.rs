//! Generation requests and the prompts built from them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{GenerationDefaults, Prompts};
use crate::domain::WrongAnswerRecord;
use crate::util::fill_template;

pub const MAX_QUESTIONS_PER_SECTION: u8 = 10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionStyle {
  Conceptual,
  Application,
  #[serde(rename = "Scenario-based")]
  ScenarioBased,
  Mixed,
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Difficulty::Beginner => "Beginner",
      Difficulty::Intermediate => "Intermediate",
      Difficulty::Advanced => "Advanced",
    })
  }
}

impl fmt::Display for QuestionStyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      QuestionStyle::Conceptual => "Conceptual",
      QuestionStyle::Application => "Application",
      QuestionStyle::ScenarioBased => "Scenario-based",
      QuestionStyle::Mixed => "Mixed",
    })
  }
}

/// A fully resolved generation request (defaults already applied).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRequest {
  pub topic: String,
  pub difficulty: Difficulty,
  pub style: QuestionStyle,
  pub questions_per_section: u8,
  pub include_diagrams: bool,
  /// Model override; the client's strong model when absent.
  pub model: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RequestError {
  #[error("Please enter a topic.")]
  EmptyTopic,
  #[error("Questions per section must be between 1 and {max}, got {got}")]
  QuestionCount { got: u8, max: u8 },
}

impl QuizRequest {
  /// Fill missing fields from `defaults` and check the result.
  pub fn resolve(
    topic: &str,
    difficulty: Option<Difficulty>,
    style: Option<QuestionStyle>,
    questions_per_section: Option<u8>,
    include_diagrams: Option<bool>,
    model: Option<String>,
    defaults: &GenerationDefaults,
  ) -> Result<Self, RequestError> {
    let topic = topic.trim();
    if topic.is_empty() {
      return Err(RequestError::EmptyTopic);
    }
    let count = questions_per_section.unwrap_or(defaults.questions_per_section);
    if !(1..=MAX_QUESTIONS_PER_SECTION).contains(&count) {
      return Err(RequestError::QuestionCount { got: count, max: MAX_QUESTIONS_PER_SECTION });
    }
    Ok(Self {
      topic: topic.to_string(),
      difficulty: difficulty.unwrap_or(defaults.difficulty),
      style: style.unwrap_or(defaults.style),
      questions_per_section: count,
      include_diagrams: include_diagrams.unwrap_or(defaults.include_diagrams),
      model: model.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
    })
  }
}

pub fn build_quiz_prompt(prompts: &Prompts, req: &QuizRequest) -> String {
  let difficulty = req.difficulty.to_string();
  let style = req.style.to_string();
  let count = req.questions_per_section.to_string();
  let (diagrams, diagram_rule) = if req.include_diagrams {
    ("Yes", "- Include at least one diagram description per section\n")
  } else {
    ("No", "")
  };
  fill_template(
    &prompts.quiz_user_template,
    &[
      ("topic", req.topic.as_str()),
      ("difficulty", difficulty.as_str()),
      ("style", style.as_str()),
      ("count", count.as_str()),
      ("diagrams", diagrams),
      ("diagram_rule", diagram_rule),
    ],
  )
}

/// Plain-text listing of the mistakes, one numbered block per record.
pub fn render_wrong_answers(records: &[WrongAnswerRecord]) -> String {
  records
    .iter()
    .enumerate()
    .map(|(i, r)| {
      format!(
        "{}. [{}] {}\n   Your answer: {}\n   Correct answer: {}\n   Explanation: {}",
        i + 1,
        r.section,
        r.question,
        r.user_answer,
        r.correct_answer,
        r.explanation.replace('\n', " ")
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn build_analysis_prompt(prompts: &Prompts, topic: &str, records: &[WrongAnswerRecord]) -> String {
  let listing = render_wrong_answers(records);
  fill_template(&prompts.analysis_user_template, &[("topic", topic), ("wrong_answers", listing.as_str())])
}

pub fn build_themes_prompt(prompts: &Prompts, topic: &str, records: &[WrongAnswerRecord]) -> String {
  let listing = render_wrong_answers(records);
  fill_template(&prompts.themes_user_template, &[("topic", topic), ("wrong_answers", listing.as_str())])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Section;

  fn request(include_diagrams: bool) -> QuizRequest {
    QuizRequest::resolve(
      "  Rust ownership ",
      Some(Difficulty::Advanced),
      None,
      Some(2),
      Some(include_diagrams),
      None,
      &GenerationDefaults::default(),
    )
    .unwrap()
  }

  #[test]
  fn resolve_applies_defaults_and_trims() {
    let req = request(false);
    assert_eq!(req.topic, "Rust ownership");
    assert_eq!(req.style, QuestionStyle::Mixed);
    assert_eq!(req.questions_per_section, 2);
    assert_eq!(req.model, None);
  }

  #[test]
  fn resolve_rejects_bad_input() {
    let d = GenerationDefaults::default();
    assert_eq!(
      QuizRequest::resolve("   ", None, None, None, None, None, &d),
      Err(RequestError::EmptyTopic)
    );
    assert_eq!(
      QuizRequest::resolve("Rust", None, None, Some(11), None, None, &d),
      Err(RequestError::QuestionCount { got: 11, max: 10 })
    );
    assert!(QuizRequest::resolve("Rust", None, None, Some(0), None, None, &d).is_err());
  }

  #[test]
  fn quiz_prompt_fills_every_placeholder() {
    let prompt = build_quiz_prompt(&Prompts::default(), &request(false));
    assert!(prompt.contains("about Rust ownership"));
    assert!(prompt.contains("Difficulty level: Advanced"));
    assert!(prompt.contains("Question style: Mixed"));
    assert!(prompt.contains("provide exactly 2 questions"));
    assert!(prompt.contains("Include diagram-based questions: No"));
    assert!(!prompt.contains("diagram description"));
    assert!(!prompt.contains('{'), "unfilled placeholder in: {prompt}");
  }

  #[test]
  fn placeholder_in_topic_stays_literal() {
    let req = QuizRequest::resolve(
      "Templates {count} and {difficulty}",
      Some(Difficulty::Beginner),
      None,
      Some(4),
      None,
      None,
      &GenerationDefaults::default(),
    )
    .unwrap();
    let prompt = build_quiz_prompt(&Prompts::default(), &req);
    assert!(prompt.contains("about Templates {count} and {difficulty} with"), "{prompt}");
    assert!(prompt.contains("provide exactly 4 questions"));
  }

  #[test]
  fn diagram_rule_only_when_requested() {
    let prompt = build_quiz_prompt(&Prompts::default(), &request(true));
    assert!(prompt.contains("Include diagram-based questions: Yes"));
    assert!(prompt.contains("- Include at least one diagram description per section"));
  }

  #[test]
  fn wrong_answers_render_as_numbered_text() {
    let records = vec![WrongAnswerRecord {
      section: Section::CurrentTrends,
      question: "What is async?".into(),
      user_answer: "Not attempted".into(),
      correct_answer: "Cooperative concurrency".into(),
      explanation: "Futures\nare polled.".into(),
    }];
    let prompt = build_analysis_prompt(&Prompts::default(), "Rust", &records);
    assert!(prompt.contains("1. [Current Trends] What is async?"));
    assert!(prompt.contains("Your answer: Not attempted"));
    assert!(prompt.contains("Explanation: Futures are polled."));
    assert!(prompt.contains("from a Rust quiz"));
  }

  #[test]
  fn style_names_round_trip_through_serde() {
    let s: QuestionStyle = serde_json::from_str("\"Scenario-based\"").unwrap();
    assert_eq!(s, QuestionStyle::ScenarioBased);
    assert_eq!(s.to_string(), "Scenario-based");
  }
}
