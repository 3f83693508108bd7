//! Line classification for model-generated quiz text.
//!
//! Each normalized line is matched against independent patterns in a fixed
//! priority order (section, question, option, explanation); the first match
//! wins. Anything else is continuation prose, except heading-like or empty
//! tokens which are reported as `Unrecognized` so they never leak into an
//! explanation.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Section;

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^#{1,3}\s*(basic\s*concepts|advanced\s*concepts|current\s*trends)\b").expect("valid regex")
});

static QUESTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?:q\s*\d+[:.)]|question\s*\d+(?:[:.)]|\s)|\[q\d+\])\s*(.+)$").expect("valid regex")
});

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^([a-d1-4])[).\s]\s*(.*?)(?:\s*(\[?\b(?:correct|right|answer)\b\]?))?\s*$").expect("valid regex")
});

static EXPLANATION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?:explanation|exp|reason|answer)\s*[:.]\s*(.*)$").expect("valid regex")
});

/// Heading markers or bare numbering tokens that carry no usable content.
static STRAY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?:#{1,6}(?:\s|$)|(?:q\s*\d+[:.)]?|question\s*\d+[:.)]?|\[q\d+\])$)").expect("valid regex")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
  SectionHeader(Section),
  QuestionHeader { text: String },
  OptionLine { text: String, correct: bool },
  ExplanationHeader { text: String },
  Continuation(String),
  Unrecognized,
}

pub fn classify_line(line: &str) -> LineKind {
  let line = line.trim();
  if line.is_empty() {
    return LineKind::Unrecognized;
  }

  if let Some(caps) = SECTION_HEADER.captures(line) {
    if let Some(section) = Section::from_label(&caps[1]) {
      return LineKind::SectionHeader(section);
    }
  }

  if let Some(caps) = QUESTION_HEADER.captures(line) {
    return LineKind::QuestionHeader { text: caps[1].trim().to_string() };
  }

  if let Some(caps) = OPTION_LINE.captures(line) {
    return LineKind::OptionLine {
      text: caps[2].trim().to_string(),
      correct: caps.get(3).is_some(),
    };
  }

  if let Some(caps) = EXPLANATION_HEADER.captures(line) {
    return LineKind::ExplanationHeader { text: caps[1].trim().to_string() };
  }

  if STRAY_HEADER.is_match(line) {
    return LineKind::Unrecognized;
  }

  LineKind::Continuation(line.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn opt(text: &str, correct: bool) -> LineKind {
    LineKind::OptionLine { text: text.into(), correct }
  }

  #[test]
  fn section_headers() {
    assert_eq!(classify_line("### Basic Concepts"), LineKind::SectionHeader(Section::BasicConcepts));
    assert_eq!(classify_line("#advanced   concepts"), LineKind::SectionHeader(Section::AdvancedConcepts));
    assert_eq!(classify_line("## CURRENT TRENDS (2024)"), LineKind::SectionHeader(Section::CurrentTrends));
    assert_eq!(classify_line("#### Basic Concepts"), LineKind::Unrecognized);
    assert_eq!(classify_line("Basic Concepts"), LineKind::Continuation("Basic Concepts".into()));
  }

  #[test]
  fn question_header_spellings() {
    for line in [
      "Q1: What is Rust?",
      "Q1. What is Rust?",
      "Q1) What is Rust?",
      "q 1: What is Rust?",
      "Question 1: What is Rust?",
      "Question 1. What is Rust?",
      "Question 1) What is Rust?",
      "Question 1 What is Rust?",
      "[Q1] What is Rust?",
    ] {
      assert_eq!(
        classify_line(line),
        LineKind::QuestionHeader { text: "What is Rust?".into() },
        "line: {line}"
      );
    }
  }

  #[test]
  fn bare_question_token_is_unrecognized() {
    assert_eq!(classify_line("Q2:"), LineKind::Unrecognized);
    assert_eq!(classify_line("Question 3."), LineKind::Unrecognized);
    assert_eq!(classify_line("### Bonus Round"), LineKind::Unrecognized);
  }

  #[test]
  fn option_labels_and_separators() {
    assert_eq!(classify_line("a) 3"), opt("3", false));
    assert_eq!(classify_line("B. Four"), opt("Four", false));
    assert_eq!(classify_line("3) Five"), opt("Five", false));
    assert_eq!(classify_line("d Six"), opt("Six", false));
  }

  #[test]
  fn correctness_marker_is_stripped() {
    assert_eq!(classify_line("b) 4 [CORRECT]"), opt("4", true));
    assert_eq!(classify_line("b) 4 correct"), opt("4", true));
    assert_eq!(classify_line("c) Ownership [Right]"), opt("Ownership", true));
    assert_eq!(classify_line("2. Borrowing [ANSWER]"), opt("Borrowing", true));
  }

  #[test]
  fn marker_inside_a_word_does_not_count() {
    assert_eq!(classify_line("a) Incorrectly typed"), opt("Incorrectly typed", false));
  }

  #[test]
  fn explanation_headers() {
    assert_eq!(
      classify_line("Explanation: Basic arithmetic."),
      LineKind::ExplanationHeader { text: "Basic arithmetic.".into() }
    );
    assert_eq!(classify_line("exp. short"), LineKind::ExplanationHeader { text: "short".into() });
    assert_eq!(classify_line("Reason: because"), LineKind::ExplanationHeader { text: "because".into() });
    assert_eq!(classify_line("Answer: b"), LineKind::ExplanationHeader { text: "b".into() });
    assert_eq!(classify_line("Explanation:"), LineKind::ExplanationHeader { text: String::new() });
  }

  #[test]
  fn explanatory_prose_is_continuation() {
    assert_eq!(
      classify_line("Explanatory note follows"),
      LineKind::Continuation("Explanatory note follows".into())
    );
  }
}
