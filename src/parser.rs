//! Quiz parser: a single linear pass over classified lines.
//!
//! State is the current section, the question being built, and the quiz
//! accumulator. A question is flushed through the validator whenever the
//! next question header arrives and once more at end of input. Invalid
//! questions are dropped and reported as diagnostics; the parse only fails
//! when a whole section ends up empty, in which case no partial quiz escapes.

use std::fmt;

use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::classify::{classify_line, LineKind};
use crate::domain::{Question, QuizSet, Section, OPTIONS_PER_QUESTION};
use crate::normalize::normalize_lines;
use crate::validate::{validate_question, ValidationError};

/// A question that was discarded, with where it started and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  /// 1-based index into the normalized (non-empty) lines.
  pub line: usize,
  pub section: Section,
  pub question: String,
  pub reason: ValidationError,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let preview: String = self.question.chars().take(60).collect();
    write!(
      f,
      "Discarded question at line {} in {} (\"{}\"): {}",
      self.line, self.section, preview, self.reason
    )
  }
}

#[derive(Debug)]
pub struct ParsedQuiz {
  pub quiz: QuizSet,
  pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Error)]
#[error("{}", empty_sections_message(.empty_sections))]
pub struct ParseFailure {
  pub empty_sections: Vec<Section>,
  pub diagnostics: Vec<Diagnostic>,
}

fn empty_sections_message(sections: &[Section]) -> String {
  let names: Vec<&str> = sections.iter().map(|s| s.label()).collect();
  format!("No valid questions in section(s): {}", names.join(", "))
}

#[derive(Default)]
struct QuizBuilder {
  section: Option<Section>,
  current: Option<(usize, Question)>,
  quiz: QuizSet,
  diagnostics: Vec<Diagnostic>,
}

impl QuizBuilder {
  fn flush(&mut self) {
    let Some((line, q)) = self.current.take() else { return };
    match validate_question(&q) {
      Ok(()) => self.quiz.questions_mut(q.section).push(q),
      Err(reason) => {
        warn!(target: "quiz", line, section = %q.section, %reason, "Discarding invalid question");
        self.diagnostics.push(Diagnostic { line, section: q.section, question: q.text, reason });
      }
    }
  }

  fn step(&mut self, line_no: usize, line: &str, kind: LineKind) {
    match kind {
      LineKind::SectionHeader(section) => {
        self.section = Some(section);
      }
      LineKind::QuestionHeader { text } => {
        let Some(section) = self.section else { return };
        self.flush();
        self.current = Some((line_no, Question::new(text, section)));
      }
      LineKind::OptionLine { text, correct } => {
        let Some((_, q)) = self.current.as_mut() else { return };
        if q.options.len() < OPTIONS_PER_QUESTION {
          q.options.push(text);
          if correct {
            q.correct_index = Some(q.options.len() - 1);
          }
        } else if !q.explanation.is_empty() {
          // Prose such as "A stack is LIFO." after the explanation started.
          q.explanation.push('\n');
          q.explanation.push_str(line);
        } else {
          debug!(target: "quiz", line = line_no, "Ignoring option beyond the fourth");
        }
      }
      LineKind::ExplanationHeader { text } => {
        let Some((_, q)) = self.current.as_mut() else { return };
        q.explanation = text;
      }
      LineKind::Continuation(text) => {
        let Some((_, q)) = self.current.as_mut() else { return };
        // Prose only extends an explanation that already has text.
        if !q.explanation.is_empty() {
          q.explanation.push('\n');
          q.explanation.push_str(&text);
        }
      }
      LineKind::Unrecognized => {}
    }
  }

  fn finish(mut self) -> Result<ParsedQuiz, ParseFailure> {
    self.flush();
    let empty_sections = self.quiz.empty_sections();
    if !empty_sections.is_empty() {
      return Err(ParseFailure { empty_sections, diagnostics: self.diagnostics });
    }
    Ok(ParsedQuiz { quiz: self.quiz, diagnostics: self.diagnostics })
  }
}

/// Parse raw model output into a quiz. All-or-nothing: every section must
/// end up with at least one valid question.
#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
pub fn parse_quiz(raw: &str) -> Result<ParsedQuiz, ParseFailure> {
  let mut builder = QuizBuilder::default();
  for (i, line) in normalize_lines(raw).iter().enumerate() {
    builder.step(i + 1, line, classify_line(line));
  }

  let result = builder.finish();
  match &result {
    Ok(parsed) => debug!(
      target: "quiz",
      questions = parsed.quiz.total_questions(),
      discarded = parsed.diagnostics.len(),
      "Parsed quiz"
    ),
    Err(failure) => error!(
      target: "quiz",
      error = %failure,
      discarded = failure.diagnostics.len(),
      "Quiz parse failed"
    ),
  }
  result
}
