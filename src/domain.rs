//! Domain models used by the backend: attempt mode, mistake records, attempts, and question types.

use serde::{Deserialize, Serialize};

/// Which skill was the attempt exercising?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
  /// Typed essay submitted directly.
  Writing,
  /// Recorded answer, transcribed before analysis.
  Speaking,
}
impl Default for Mode {
  fn default() -> Self { Mode::Writing }
}

/// One structured finding extracted from the coach feedback text.
/// `category` is free text from the model, ideally `"<Category> > <Subcategory>"`,
/// but nothing guarantees it matches the taxonomy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct MistakeRecord {
  #[serde(default)] pub error: String,
  #[serde(default)] pub correct: String,
  #[serde(default)] pub explanation: String,
  #[serde(default)] pub category: String,
}

/// A mistake record annotated with the timestamp of the attempt that produced it.
/// This is the shape range queries hand back to the visualization.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedMistake {
  #[serde(flatten)]
  pub record: MistakeRecord,
  #[serde(rename = "attemptTimestamp")]
  pub attempt_timestamp: i64,
}

/// One completed analysis request. Appended to the owning user's history,
/// never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attempt {
  pub id: String,
  /// Epoch millis. Non-decreasing across appends for one user (best effort).
  pub timestamp: i64,
  #[serde(rename = "userId")]
  pub user_id: String,
  pub mode: Mode,
  #[serde(rename = "questionId")]
  pub question_id: String,
  /// Essay text, or the transcript for speaking attempts.
  #[serde(rename = "sourceText")]
  pub source_text: String,
  /// Raw feedback text from the coach model.
  #[serde(rename = "analysisText")]
  pub analysis_text: String,
  pub mistakes: Vec<MistakeRecord>,
  /// Band estimate extracted from the feedback, if the model emitted one.
  /// Passed through unclamped.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score: Option<f32>,
}

/// The durable unit: all attempts for one user, in append order.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserHistory {
  #[serde(default)]
  pub attempts: Vec<Attempt>,
}

/// Writing/speaking prompt served to the user before an attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromptQuestion {
  pub id: String,
  pub question: String,
}

/// Multiple-choice practice item from the static quiz bank.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuizQuestion {
  pub id: String,
  pub question: String,
  pub options: Vec<String>,
  #[serde(rename = "correctIndex")]
  pub correct_index: usize,
  pub category: String,
  pub subcategory: String,
}
