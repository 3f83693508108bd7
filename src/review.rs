//! Post-quiz review: the per-question answer review and the wrong-answer
//! records handed to the analysis model.

use serde::Serialize;

use crate::domain::{answer_key, AnswerSheet, QuizSet, Section, WrongAnswerRecord, NOT_ATTEMPTED};

/// One row of the answer review, for every question in display order.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReview {
  pub section: Section,
  pub number: usize,
  pub question: String,
  pub user_answer: String,
  pub correct_answer: String,
  pub is_correct: bool,
  pub explanation: String,
}

/// Outcome of wrong-answer extraction. `Perfect` short-circuits analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WrongAnswers {
  Perfect,
  Found(Vec<WrongAnswerRecord>),
}

impl WrongAnswers {
  pub fn records(&self) -> &[WrongAnswerRecord] {
    match self {
      WrongAnswers::Perfect => &[],
      WrongAnswers::Found(records) => records,
    }
  }
}

fn chosen_text(options: &[String], chosen: Option<usize>) -> String {
  chosen
    .and_then(|i| options.get(i))
    .cloned()
    .unwrap_or_else(|| NOT_ATTEMPTED.to_string())
}

pub fn review_answers(quiz: &QuizSet, answers: &AnswerSheet) -> Vec<AnswerReview> {
  quiz
    .numbered()
    .map(|(section, number, q)| {
      let chosen = answers.get(&answer_key(section, number)).copied();
      AnswerReview {
        section,
        number,
        question: q.text.clone(),
        user_answer: chosen_text(&q.options, chosen),
        correct_answer: q.correct_option().unwrap_or_default().to_string(),
        is_correct: chosen.is_some() && chosen == q.correct_index,
        explanation: q.explanation.clone(),
      }
    })
    .collect()
}

/// Every question whose recorded answer differs from the correct one.
/// Unanswered questions count as wrong and show `NOT_ATTEMPTED`.
pub fn extract_wrong_answers(quiz: &QuizSet, answers: &AnswerSheet) -> WrongAnswers {
  let records: Vec<WrongAnswerRecord> = review_answers(quiz, answers)
    .into_iter()
    .filter(|r| !r.is_correct)
    .map(|r| WrongAnswerRecord {
      section: r.section,
      question: r.question,
      user_answer: r.user_answer,
      correct_answer: r.correct_answer,
      explanation: r.explanation,
    })
    .collect();

  if records.is_empty() {
    WrongAnswers::Perfect
  } else {
    WrongAnswers::Found(records)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Question;

  fn quiz() -> QuizSet {
    let mut quiz = QuizSet::default();
    for (section, text) in [
      (Section::BasicConcepts, "What is 2+2?"),
      (Section::AdvancedConcepts, "What is 9/3?"),
      (Section::CurrentTrends, "What is 2*3?"),
    ] {
      let mut q = Question::new(text, section);
      q.options = vec!["3".into(), "4".into(), "5".into(), "6".into()];
      q.correct_index = Some(match section {
        Section::BasicConcepts => 1,
        Section::AdvancedConcepts => 0,
        Section::CurrentTrends => 3,
      });
      q.explanation = "Arithmetic.".into();
      quiz.questions_mut(section).push(q);
    }
    quiz
  }

  #[test]
  fn all_correct_is_perfect() {
    let answers = AnswerSheet::from([
      (answer_key(Section::BasicConcepts, 1), 1),
      (answer_key(Section::AdvancedConcepts, 1), 0),
      (answer_key(Section::CurrentTrends, 1), 3),
    ]);
    let wrong = extract_wrong_answers(&quiz(), &answers);
    assert_eq!(wrong, WrongAnswers::Perfect);
    assert!(wrong.records().is_empty());
  }

  #[test]
  fn wrong_and_unanswered_are_reported() {
    let answers = AnswerSheet::from([
      (answer_key(Section::BasicConcepts, 1), 2),
      (answer_key(Section::AdvancedConcepts, 1), 0),
    ]);
    let wrong = extract_wrong_answers(&quiz(), &answers);
    let records = wrong.records();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].section, Section::BasicConcepts);
    assert_eq!(records[0].question, "What is 2+2?");
    assert_eq!(records[0].user_answer, "5");
    assert_eq!(records[0].correct_answer, "4");
    assert_eq!(records[0].explanation, "Arithmetic.");

    assert_eq!(records[1].section, Section::CurrentTrends);
    assert_eq!(records[1].user_answer, NOT_ATTEMPTED);
    assert_eq!(records[1].correct_answer, "6");
  }

  #[test]
  fn review_covers_every_question() {
    let answers = AnswerSheet::from([(answer_key(Section::BasicConcepts, 1), 1)]);
    let review = review_answers(&quiz(), &answers);
    assert_eq!(review.len(), 3);
    assert!(review[0].is_correct);
    assert_eq!(review[0].user_answer, "4");
    assert!(!review[1].is_correct);
    assert_eq!(review[1].number, 1);
  }
}
