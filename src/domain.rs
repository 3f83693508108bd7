//! Domain models: quiz sections, questions, the parsed quiz set, and the
//! derived records produced after a quiz is answered.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every quiz has exactly these three categories, in this display order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
  #[serde(rename = "Basic Concepts")]
  BasicConcepts,
  #[serde(rename = "Advanced Concepts")]
  AdvancedConcepts,
  #[serde(rename = "Current Trends")]
  CurrentTrends,
}

impl Section {
  pub const ALL: [Section; 3] = [Section::BasicConcepts, Section::AdvancedConcepts, Section::CurrentTrends];

  /// Canonical (title-cased) label.
  pub fn label(self) -> &'static str {
    match self {
      Section::BasicConcepts => "Basic Concepts",
      Section::AdvancedConcepts => "Advanced Concepts",
      Section::CurrentTrends => "Current Trends",
    }
  }

  /// Lenient lookup: case-insensitive, ignores whitespace ("current   TRENDS").
  pub fn from_label(s: &str) -> Option<Section> {
    let squashed: String = s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
    match squashed.as_str() {
      "basicconcepts" => Some(Section::BasicConcepts),
      "advancedconcepts" => Some(Section::AdvancedConcepts),
      "currenttrends" => Some(Section::CurrentTrends),
      _ => None,
    }
  }
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A multiple-choice question. Built incrementally by the parser and
/// frozen once the validator accepts it; only `user_answer_index` changes later.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub text: String,
  pub options: Vec<String>,
  pub correct_index: Option<usize>,
  pub explanation: String,
  pub section: Section,
  #[serde(default)]
  pub user_answer_index: Option<usize>,
}

impl Question {
  pub fn new(text: impl Into<String>, section: Section) -> Self {
    Self {
      text: text.into(),
      options: Vec::new(),
      correct_index: None,
      explanation: String::new(),
      section,
      user_answer_index: None,
    }
  }

  pub fn option_text(&self, index: usize) -> Option<&str> {
    self.options.get(index).map(String::as_str)
  }

  pub fn correct_option(&self) -> Option<&str> {
    self.correct_index.and_then(|i| self.option_text(i))
  }
}

/// Number of options every accepted question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// The three fixed sections, each an ordered list of accepted questions.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizSet {
  #[serde(rename = "Basic Concepts")]
  pub basic_concepts: Vec<Question>,
  #[serde(rename = "Advanced Concepts")]
  pub advanced_concepts: Vec<Question>,
  #[serde(rename = "Current Trends")]
  pub current_trends: Vec<Question>,
}

impl QuizSet {
  pub fn questions(&self, section: Section) -> &[Question] {
    match section {
      Section::BasicConcepts => &self.basic_concepts,
      Section::AdvancedConcepts => &self.advanced_concepts,
      Section::CurrentTrends => &self.current_trends,
    }
  }

  pub fn questions_mut(&mut self, section: Section) -> &mut Vec<Question> {
    match section {
      Section::BasicConcepts => &mut self.basic_concepts,
      Section::AdvancedConcepts => &mut self.advanced_concepts,
      Section::CurrentTrends => &mut self.current_trends,
    }
  }

  /// Sections in display order with their questions.
  pub fn sections(&self) -> impl Iterator<Item = (Section, &[Question])> + '_ {
    Section::ALL.into_iter().map(move |s| (s, self.questions(s)))
  }

  /// Every question with its 1-based number inside its section.
  pub fn numbered(&self) -> impl Iterator<Item = (Section, usize, &Question)> + '_ {
    self
      .sections()
      .flat_map(|(s, qs)| qs.iter().enumerate().map(move |(i, q)| (s, i + 1, q)))
  }

  pub fn total_questions(&self) -> usize {
    Section::ALL.iter().map(|s| self.questions(*s).len()).sum()
  }

  pub fn empty_sections(&self) -> Vec<Section> {
    Section::ALL.into_iter().filter(|s| self.questions(*s).is_empty()).collect()
  }

  /// Copy the chosen indices into `user_answer_index` (answering phase only).
  pub fn record_answers(&mut self, answers: &AnswerSheet) {
    for section in Section::ALL {
      for (i, q) in self.questions_mut(section).iter_mut().enumerate() {
        q.user_answer_index = answers.get(&answer_key(section, i + 1)).copied();
      }
    }
  }
}

/// User answers keyed by `"<Section label>_<1-based question number>"`.
pub type AnswerSheet = HashMap<String, usize>;

pub fn answer_key(section: Section, number: usize) -> String {
  format!("{}_{}", section.label(), number)
}

/// Shown in place of the user's choice when a question was skipped.
pub const NOT_ATTEMPTED: &str = "Not attempted";

/// One incorrectly answered (or skipped) question; recomputed on demand.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswerRecord {
  pub section: Section,
  pub question: String,
  pub user_answer: String,
  pub correct_answer: String,
  pub explanation: String,
}

/// One scored quiz in the session's in-memory history.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistoryEntry {
  pub topic: String,
  /// Model that generated the quiz ("sample" for the built-in one).
  pub model: String,
  pub date: DateTime<Utc>,
  pub correct: usize,
  pub total: usize,
  pub percentage: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn section_lookup_is_lenient() {
    assert_eq!(Section::from_label("basic concepts"), Some(Section::BasicConcepts));
    assert_eq!(Section::from_label("Advanced   Concepts"), Some(Section::AdvancedConcepts));
    assert_eq!(Section::from_label("CURRENTTRENDS"), Some(Section::CurrentTrends));
    assert_eq!(Section::from_label("Future Trends"), None);
  }

  #[test]
  fn quiz_set_serializes_with_section_labels() {
    let mut quiz = QuizSet::default();
    quiz.questions_mut(Section::CurrentTrends).push(Question::new("What is new?", Section::CurrentTrends));
    let v = serde_json::to_value(&quiz).unwrap();
    assert!(v["Basic Concepts"].as_array().unwrap().is_empty());
    assert_eq!(v["Current Trends"][0]["text"], "What is new?");
    assert_eq!(v["Current Trends"][0]["section"], "Current Trends");
  }

  #[test]
  fn record_answers_uses_one_based_keys() {
    let mut quiz = QuizSet::default();
    quiz.questions_mut(Section::BasicConcepts).push(Question::new("a", Section::BasicConcepts));
    quiz.questions_mut(Section::BasicConcepts).push(Question::new("b", Section::BasicConcepts));
    let answers = AnswerSheet::from([(answer_key(Section::BasicConcepts, 2), 3)]);
    quiz.record_answers(&answers);
    assert_eq!(quiz.basic_concepts[0].user_answer_index, None);
    assert_eq!(quiz.basic_concepts[1].user_answer_index, Some(3));
    assert_eq!(answer_key(Section::BasicConcepts, 2), "Basic Concepts_2");
  }
}
