//! Structural checks applied to every candidate question before it is accepted.

use thiserror::Error;

use crate::domain::{Question, OPTIONS_PER_QUESTION};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("missing question text")]
  MissingText,
  #[error("expected 4 options, got {0}")]
  OptionCount(usize),
  #[error("no option is marked as correct")]
  NoCorrectOption,
  #[error("correct answer index {0} is out of range (0-3)")]
  CorrectOutOfRange(usize),
  #[error("missing explanation")]
  MissingExplanation,
  #[error("option {0} is empty")]
  EmptyOption(usize),
}

/// Checks run in a fixed order; the first failure is reported.
pub fn validate_question(q: &Question) -> Result<(), ValidationError> {
  if q.text.trim().is_empty() {
    return Err(ValidationError::MissingText);
  }
  if q.options.len() != OPTIONS_PER_QUESTION {
    return Err(ValidationError::OptionCount(q.options.len()));
  }
  match q.correct_index {
    None => return Err(ValidationError::NoCorrectOption),
    Some(i) if i >= OPTIONS_PER_QUESTION => return Err(ValidationError::CorrectOutOfRange(i)),
    Some(_) => {}
  }
  if q.explanation.trim().is_empty() {
    return Err(ValidationError::MissingExplanation);
  }
  if let Some(i) = q.options.iter().position(|o| o.trim().is_empty()) {
    return Err(ValidationError::EmptyOption(i + 1));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Section;

  fn complete() -> Question {
    let mut q = Question::new("What is 2+2?", Section::BasicConcepts);
    q.options = vec!["3".into(), "4".into(), "5".into(), "6".into()];
    q.correct_index = Some(1);
    q.explanation = "Basic arithmetic.".into();
    q
  }

  #[test]
  fn accepts_complete_question() {
    assert_eq!(validate_question(&complete()), Ok(()));
  }

  #[test]
  fn rejects_blank_text() {
    let mut q = complete();
    q.text = "   ".into();
    assert_eq!(validate_question(&q), Err(ValidationError::MissingText));
  }

  #[test]
  fn rejects_wrong_option_count() {
    let mut q = complete();
    q.options.pop();
    assert_eq!(validate_question(&q), Err(ValidationError::OptionCount(3)));
  }

  #[test]
  fn rejects_missing_or_out_of_range_answer() {
    let mut q = complete();
    q.correct_index = None;
    assert_eq!(validate_question(&q), Err(ValidationError::NoCorrectOption));
    q.correct_index = Some(4);
    assert_eq!(validate_question(&q), Err(ValidationError::CorrectOutOfRange(4)));
  }

  #[test]
  fn rejects_blank_explanation_and_options() {
    let mut q = complete();
    q.explanation = "\n".into();
    assert_eq!(validate_question(&q), Err(ValidationError::MissingExplanation));

    let mut q = complete();
    q.options[2] = " ".into();
    assert_eq!(validate_question(&q), Err(ValidationError::EmptyOption(3)));
  }

  #[test]
  fn reasons_are_human_readable() {
    assert_eq!(ValidationError::OptionCount(5).to_string(), "expected 4 options, got 5");
  }
}
