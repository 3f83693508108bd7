//! Loading quiz configuration (prompts + generation defaults) from TOML.
//!
//! See `QuizConfig`, `Prompts` and `GenerationDefaults` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::prompts::{Difficulty, QuestionStyle};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub defaults: GenerationDefaults,
}

/// Values used when a generation request leaves a field out.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationDefaults {
  pub difficulty: Difficulty,
  pub style: QuestionStyle,
  pub questions_per_section: u8,
  pub include_diagrams: bool,
}

impl Default for GenerationDefaults {
  fn default() -> Self {
    Self {
      difficulty: Difficulty::Intermediate,
      style: QuestionStyle::Mixed,
      questions_per_section: 3,
      include_diagrams: false,
    }
  }
}

/// Prompts used by the model client. Each field may be overridden in TOML.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Quiz generation
  pub quiz_system: String,
  pub quiz_user_template: String,
  // Wrong-answer analysis (free text)
  pub analysis_system: String,
  pub analysis_user_template: String,
  // Theme counts (JSON object)
  pub themes_system: String,
  pub themes_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_system: "You are an expert quiz generator who crafts perfect MCQs with clear explanations.".into(),
      quiz_user_template: DEFAULT_QUIZ_TEMPLATE.trim_start().into(),
      analysis_system: "You are a patient tutor who explains knowledge gaps and suggests study material.".into(),
      analysis_user_template: DEFAULT_ANALYSIS_TEMPLATE.trim_start().into(),
      themes_system: "You classify quiz mistakes into technical themes. Respond ONLY with strict JSON.".into(),
      themes_user_template: "Analyze these wrong answers about {topic}:\n{wrong_answers}\n\nIdentify the 3-5 most common technical themes/concepts that were misunderstood.\nReturn JSON of the form {\"themes\": {\"<concept>\": <count>}}.\nExample: {\"themes\": {\"Object-oriented programming\": 3, \"Database normalization\": 2}}".into(),
    }
  }
}

const DEFAULT_QUIZ_TEMPLATE: &str = r#"
Generate a multiple choice quiz about {topic} with these specifications:
- Difficulty level: {difficulty}
- Question style: {style}
- Questions per section: {count}
- Include diagram-based questions: {diagrams}

Create questions in these categories:
1. Basic Concepts
2. Advanced Concepts
3. Current Trends

For each category, provide exactly {count} questions following this exact format:

### [Category Name]
Q1: [Question text]?
a) Option 1
b) Option 2 [CORRECT]
c) Option 3
d) Option 4
Explanation: [Detailed explanation of the correct answer]

Important requirements:
- Each question must have exactly 4 options
- Mark the correct answer with [CORRECT]
- Provide clear, technical explanations
- Questions should match the {difficulty} difficulty level
- Use {style}-style questions
{diagram_rule}
Example for {topic} ({difficulty} level):

### Basic Concepts
Q1: What is the primary purpose of a constructor in OOP?
a) To destroy objects
b) To initialize object properties [CORRECT]
c) To perform arithmetic operations
d) To handle exceptions
Explanation: Constructors are special methods called when an object is created...
"#;

const DEFAULT_ANALYSIS_TEMPLATE: &str = r#"
Analyze these incorrect answers from a {topic} quiz:
{wrong_answers}

Identify 3-5 specific technical areas that need improvement, focusing on:
- Core concepts that were misunderstood
- Patterns in the mistakes
- Fundamental knowledge gaps

For each area provide:
1. The specific concept/topic
2. Why it's important for {topic}
3. Recommended study materials
4. Related concepts to review

Format your response as follows:

Detailed Analysis for {topic}:

Focus Area 1: [Concept Name]
- Importance: [Why this matters]
- Resources: [Books/Courses/Articles]
- Related: [Related topics]
"#;

pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "quizgen_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizgen_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizgen_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = parse_quiz_config("").unwrap();
    assert_eq!(cfg.defaults.questions_per_section, 3);
    assert_eq!(cfg.defaults.difficulty, Difficulty::Intermediate);
    assert!(cfg.prompts.quiz_user_template.contains("[CORRECT]"));
  }

  #[test]
  fn partial_overrides_keep_other_defaults() {
    let cfg = parse_quiz_config(
      r#"
      [prompts]
      quiz_system = "Be brief."

      [defaults]
      difficulty = "Advanced"
      style = "Scenario-based"
      questions_per_section = 5
      "#,
    )
    .unwrap();
    assert_eq!(cfg.prompts.quiz_system, "Be brief.");
    assert!(cfg.prompts.analysis_user_template.contains("{wrong_answers}"));
    assert_eq!(cfg.defaults.difficulty, Difficulty::Advanced);
    assert_eq!(cfg.defaults.style, QuestionStyle::ScenarioBased);
    assert_eq!(cfg.defaults.questions_per_section, 5);
    assert!(!cfg.defaults.include_diagrams);
  }

  #[test]
  fn unknown_difficulty_is_rejected() {
    assert!(parse_quiz_config("[defaults]\ndifficulty = \"Expert\"").is_err());
  }
}
