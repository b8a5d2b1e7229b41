//! Loading agent configuration (prompts + optional data overrides) from TOML.
//!
//! See `AgentConfig` and `Prompts` for the expected schema. Everything is
//! optional; empty sections fall back to the built-in seeds.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{PromptQuestion, QuizQuestion};
use crate::taxonomy::TaxonomyCategory;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Full taxonomy override. Replaces the built-in taxonomy when non-empty.
  #[serde(default)]
  pub taxonomy: Vec<TaxonomyCategory>,
  #[serde(default)]
  pub writing_questions: Vec<PromptQuestion>,
  #[serde(default)]
  pub speaking_questions: Vec<PromptQuestion>,
  #[serde(default)]
  pub quiz: Vec<QuizQuestion>,
}

/// Prompts used by the OpenAI client. Defaults are sensible for IELTS coaching.
/// Override in TOML to tune tone/structure; keep the numbered
/// Error/Correct/Explanation/Category shape or the parser will extract nothing.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub analysis_system: String,
  /// Template slots: {question}, {taxonomy}, {essay}
  pub writing_user_template: String,
  /// Template slots: {question}, {taxonomy}, {transcript}
  pub speaking_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      analysis_system: "You are an expert IELTS coach.".into(),
      writing_user_template: r#"You are an IELTS writing coach. Analyze the following essay for:
- Grammatical errors (subject-verb agreement, tense consistency, etc.)
- Vocabulary issues (word choice, collocations, academic language)
- Structural problems (paragraph organization, coherence, cohesion)
- Task achievement (addressing all parts of the question)
- Tone and register appropriateness

Essay Question:
"""
{question}
"""

Here is a list of mistake categories and subcategories you MUST use to classify each mistake:
{taxonomy}

For each mistake you find, output it in the following format (one after another, numbered):

1. Error: <the error, with context>
Correct: <the correct version>
Explanation: <explanation of the rule/principle violated>
Category: <choose the closest match from the list above, e.g., Grammar > Subject-Verb Agreement>

After listing all mistakes, add a section:

Strengths:
- <list strengths>

Summary:
<overall summary>

Score Estimate: <estimated IELTS band from 0 to 9, at most one decimal digit>

Essay:
"""
{essay}
"""

Respond ONLY in the above format. Do not add extra commentary or formatting."#
        .into(),
      speaking_user_template: r#"You are an IELTS speaking coach. Analyze the following spoken answer for:
- Grammatical errors (subject-verb agreement, tense consistency, etc.)
- Vocabulary issues (word choice, collocations, academic language)
- Structural problems (organization, coherence, cohesion)
- Task achievement (addressing all parts of the question)
- Tone and register appropriateness

Speaking Question:
"""
{question}
"""

Here is a list of mistake categories and subcategories you MUST use to classify each mistake:
{taxonomy}

For each mistake you find, output it in the following format (one after another, numbered):

1. Error: <the error, with context>
Correct: <the correct version>
Explanation: <explanation of the rule/principle violated>
Category: <choose the closest match from the list above, e.g., Grammar > Subject-Verb Agreement>

After listing all mistakes, add a section:

Strengths:
- <list strengths>

Summary:
<overall summary>

Score Estimate: <estimated IELTS band from 0 to 9, at most one decimal digit>

Spoken answer:
"""
{transcript}
"""

Respond ONLY in the above format. Do not add extra commentary or formatting."#
        .into(),
    }
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AgentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "bandcoach_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "bandcoach_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "bandcoach_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
