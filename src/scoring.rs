//! Scoring engine: per-section and overall correctness, plus the performance tier.

use serde::Serialize;

use crate::domain::{answer_key, AnswerSheet, QuizSet, Section};

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct Score {
  pub correct: usize,
  pub total: usize,
  /// In [0, 1]; 0 when there are no questions.
  pub percentage: f64,
}

impl Score {
  fn new(correct: usize, total: usize) -> Self {
    let percentage = if total == 0 { 0.0 } else { correct as f64 / total as f64 };
    Self { correct, total, percentage }
  }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum PerformanceTier {
  Excellent,
  Good,
  #[serde(rename = "Needs Improvement")]
  NeedsImprovement,
}

impl PerformanceTier {
  pub fn from_percentage(p: f64) -> Self {
    if p >= 0.8 {
      PerformanceTier::Excellent
    } else if p >= 0.6 {
      PerformanceTier::Good
    } else {
      PerformanceTier::NeedsImprovement
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      PerformanceTier::Excellent => "Excellent",
      PerformanceTier::Good => "Good",
      PerformanceTier::NeedsImprovement => "Needs Improvement",
    }
  }

  /// Study suggestions shown next to the results.
  pub fn recommendations(self) -> Vec<String> {
    let items: &[&str] = match self {
      PerformanceTier::Excellent => &[
        "Excellent performance! Move on to advanced courses on the topic.",
        "Read recent research papers and write-ups on new developments.",
        "Build a practical project to apply what you know.",
      ],
      PerformanceTier::Good => &[
        "Good performance! Take an intermediate course to close the remaining gaps.",
        "Use practice tests to find the areas you still miss.",
        "Review the foundational concepts behind the questions you got wrong.",
      ],
      PerformanceTier::NeedsImprovement => &[
        "Start with a beginner course that covers the fundamentals.",
        "Work through a foundational textbook chapter by chapter.",
        "Practice on interactive platforms before retaking the quiz.",
      ],
    };
    items.iter().map(|s| s.to_string()).collect()
  }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SectionScore {
  pub section: Section,
  #[serde(flatten)]
  pub score: Score,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScoreReport {
  pub sections: Vec<SectionScore>,
  pub overall: Score,
  pub tier: PerformanceTier,
}

/// Pure and idempotent: the same quiz and answers always give the same report.
pub fn score_quiz(quiz: &QuizSet, answers: &AnswerSheet) -> ScoreReport {
  let sections: Vec<SectionScore> = quiz
    .sections()
    .map(|(section, questions)| {
      let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| {
          let chosen = answers.get(&answer_key(section, i + 1)).copied();
          chosen.is_some() && chosen == q.correct_index
        })
        .count();
      SectionScore { section, score: Score::new(correct, questions.len()) }
    })
    .collect();

  let correct = sections.iter().map(|s| s.score.correct).sum();
  let total = sections.iter().map(|s| s.score.total).sum();
  let overall = Score::new(correct, total);

  ScoreReport { sections, tier: PerformanceTier::from_percentage(overall.percentage), overall }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Question;

  fn question(section: Section, correct: usize) -> Question {
    let mut q = Question::new("q", section);
    q.options = vec!["a".into(), "b".into(), "c".into(), "d".into()];
    q.correct_index = Some(correct);
    q.explanation = "e".into();
    q
  }

  fn quiz() -> QuizSet {
    let mut quiz = QuizSet::default();
    for section in Section::ALL {
      quiz.questions_mut(section).push(question(section, 0));
      quiz.questions_mut(section).push(question(section, 2));
    }
    quiz
  }

  fn perfect_answers(quiz: &QuizSet) -> AnswerSheet {
    quiz
      .numbered()
      .map(|(s, n, q)| (answer_key(s, n), q.correct_index.unwrap()))
      .collect()
  }

  #[test]
  fn own_answers_score_full_marks() {
    let quiz = quiz();
    let report = score_quiz(&quiz, &perfect_answers(&quiz));
    for s in &report.sections {
      assert_eq!(s.score.percentage, 1.0);
    }
    assert_eq!(report.overall, Score { correct: 6, total: 6, percentage: 1.0 });
    assert_eq!(report.tier, PerformanceTier::Excellent);
  }

  #[test]
  fn scenario_d_half_correct_section() {
    let quiz = quiz();
    let answers = AnswerSheet::from([
      (answer_key(Section::BasicConcepts, 1), 0),
      (answer_key(Section::BasicConcepts, 2), 1),
    ]);
    let report = score_quiz(&quiz, &answers);
    assert_eq!(report.sections[0].section, Section::BasicConcepts);
    assert_eq!(report.sections[0].score, Score { correct: 1, total: 2, percentage: 0.5 });
    assert_eq!(report.overall.correct, 1);
    assert_eq!(report.overall.total, 6);
  }

  #[test]
  fn empty_quiz_has_zero_percentage() {
    let report = score_quiz(&QuizSet::default(), &AnswerSheet::new());
    assert_eq!(report.overall, Score { correct: 0, total: 0, percentage: 0.0 });
    assert_eq!(report.tier, PerformanceTier::NeedsImprovement);
  }

  #[test]
  fn scoring_twice_is_identical() {
    let quiz = quiz();
    let answers = AnswerSheet::from([(answer_key(Section::CurrentTrends, 2), 2)]);
    assert_eq!(score_quiz(&quiz, &answers), score_quiz(&quiz, &answers));
  }

  #[test]
  fn tier_thresholds() {
    assert_eq!(PerformanceTier::from_percentage(0.8), PerformanceTier::Excellent);
    assert_eq!(PerformanceTier::from_percentage(0.79), PerformanceTier::Good);
    assert_eq!(PerformanceTier::from_percentage(0.6), PerformanceTier::Good);
    assert_eq!(PerformanceTier::from_percentage(0.59), PerformanceTier::NeedsImprovement);
    assert_eq!(PerformanceTier::NeedsImprovement.label(), "Needs Improvement");
  }
}
