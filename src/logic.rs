//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Running one analysis request end to end (validate → collaborator →
//!     parse → append → respond), in that strict order
//!   - Resolving mistake-range queries ("current"/"7days"/"30days")
//!   - Building the heatmap aggregate and quiz recommendations

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::domain::{AnnotatedMistake, Attempt, Mode, QuizQuestion};
use crate::parser::parse_feedback;
use crate::protocol::{AnalyzeIn, AnalyzeOut};
use crate::recommend::recommend;
use crate::reconcile::{bucket, CellCount};
use crate::state::AppState;
use crate::util::{now_millis, trunc_for_log};

pub const DEFAULT_USER_ID: &str = "default";
pub const DEFAULT_RECOMMENDATIONS: usize = 3;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// How one analysis request failed. The HTTP layer maps these to status codes.
#[derive(Debug)]
pub enum AnalyzeError {
  /// Rejected before any parsing or storage work.
  BadRequest(String),
  /// The text-generation/transcription collaborator failed. Terminal for the
  /// request; nothing partial is stored and nothing is retried.
  Upstream(String),
  /// The attempt could not be persisted.
  Storage(String),
}

/// Run one analysis request: validate, call the collaborator, parse the
/// feedback, persist the attempt, and build the response.
///
/// Parse degradation is deliberately invisible here: malformed feedback just
/// produces fewer (or zero) mistake records and still records the attempt.
#[instrument(level = "info", skip(state, input), fields(question_id = %input.question_id))]
pub async fn run_analysis(state: &AppState, input: AnalyzeIn) -> Result<AnalyzeOut, AnalyzeError> {
  let mode = input.mode.unwrap_or_default();
  let user_id = input
    .user_id
    .filter(|u| !u.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

  if input.question_id.trim().is_empty() {
    return Err(AnalyzeError::BadRequest("questionId is required.".into()));
  }
  let question = state
    .find_question(mode, &input.question_id)
    .ok_or_else(|| AnalyzeError::BadRequest("Invalid questionId.".into()))?
    .clone();

  let oa = state.openai.as_ref().ok_or_else(|| {
    AnalyzeError::Upstream("OPENAI_API_KEY not set; analysis is unavailable.".into())
  })?;

  let taxonomy_lines = state.taxonomy.prompt_lines();

  let (source_text, analysis_text) = match mode {
    Mode::Writing => {
      let essay = input.essay.unwrap_or_default();
      if essay.trim().is_empty() {
        return Err(AnalyzeError::BadRequest("essay is required for writing mode.".into()));
      }
      let analysis = oa
        .analyze_writing(&state.prompts, &question.question, &taxonomy_lines, &essay)
        .await
        .map_err(AnalyzeError::Upstream)?;
      (essay, analysis)
    }
    Mode::Speaking => {
      let audio = match input.audio_base64 {
        Some(a) if !a.trim().is_empty() => a,
        _ => {
          return Err(AnalyzeError::BadRequest(
            "audioBase64 is required for speaking mode.".into(),
          ))
        }
      };
      let mime = input.mime.unwrap_or_else(|| "audio/webm".into());
      let transcript = oa
        .transcribe_audio(&audio, &mime)
        .await
        .map_err(AnalyzeError::Upstream)?;
      let analysis = oa
        .analyze_speaking(&state.prompts, &question.question, &taxonomy_lines, &transcript)
        .await
        .map_err(AnalyzeError::Upstream)?;
      (transcript, analysis)
    }
  };

  let (mistakes, score) = parse_feedback(&analysis_text);
  info!(
    target: "analysis",
    %user_id, ?mode, question_id = %question.id,
    mistake_count = mistakes.len(), score = ?score,
    analysis_preview = %trunc_for_log(&analysis_text, 80),
    "Feedback parsed"
  );

  let attempt = Attempt {
    id: Uuid::new_v4().to_string(),
    timestamp: now_millis(),
    user_id: user_id.clone(),
    mode,
    question_id: question.id.clone(),
    source_text: source_text.clone(),
    analysis_text: analysis_text.clone(),
    mistakes: mistakes.clone(),
    score,
  };
  let attempt_id = attempt.id.clone();

  if let Err(e) = state.store.append(attempt).await {
    error!(target: "store", %user_id, error = %e, "Failed to persist attempt");
    return Err(AnalyzeError::Storage(e));
  }

  Ok(AnalyzeOut {
    analysis: analysis_text,
    transcript: source_text,
    mistakes,
    score,
    attempt_id,
  })
}

/// Query window selected by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MistakeRange {
  /// Only the most recent attempt.
  Current,
  Days7,
  Days30,
  /// Anything else falls back to the full history.
  All,
}

impl MistakeRange {
  pub fn parse(s: &str) -> Self {
    match s {
      "current" => MistakeRange::Current,
      "7days" => MistakeRange::Days7,
      "30days" => MistakeRange::Days30,
      _ => MistakeRange::All,
    }
  }

  /// Inclusive (from, to) bounds, or None for the latest-attempt window.
  pub fn bounds(self, now: i64) -> Option<(i64, i64)> {
    match self {
      MistakeRange::Current => None,
      MistakeRange::Days7 => Some((now - 7 * DAY_MILLIS, now)),
      MistakeRange::Days30 => Some((now - 30 * DAY_MILLIS, now)),
      MistakeRange::All => Some((0, now)),
    }
  }
}

/// Annotated mistake records for the selected window.
#[instrument(level = "info", skip(state), fields(%user_id, %range))]
pub fn mistakes_for_range(
  state: &AppState,
  user_id: &str,
  range: &str,
  mode: Option<Mode>,
) -> Vec<AnnotatedMistake> {
  match MistakeRange::parse(range).bounds(now_millis()) {
    None => state.store.query_latest(user_id, mode),
    Some((from, to)) => state.store.query_range(user_id, from, to, mode),
  }
}

/// Heatmap cell counts for the selected window: the range's records bucketed
/// against the taxonomy.
#[instrument(level = "info", skip(state), fields(%user_id, %range))]
pub fn heatmap_for_range(
  state: &AppState,
  user_id: &str,
  range: &str,
  mode: Option<Mode>,
) -> Vec<CellCount> {
  let annotated = mistakes_for_range(state, user_id, range, mode);
  let records: Vec<_> = annotated.into_iter().map(|a| a.record).collect();
  bucket(&records, &state.taxonomy)
}

/// Quiz questions targeting the most recent attempt's top mistake labels.
#[instrument(level = "info", skip(state), fields(%user_id, n))]
pub fn recommendations_for_latest(
  state: &AppState,
  user_id: &str,
  mode: Option<Mode>,
  n: usize,
) -> Vec<QuizQuestion> {
  let latest = state.store.query_latest(user_id, mode);
  let records: Vec<_> = latest.into_iter().map(|a| a.record).collect();
  recommend(&records, &state.quiz_bank, n)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn range_parsing_covers_the_protocol_values() {
    assert_eq!(MistakeRange::parse("current"), MistakeRange::Current);
    assert_eq!(MistakeRange::parse("7days"), MistakeRange::Days7);
    assert_eq!(MistakeRange::parse("30days"), MistakeRange::Days30);
    assert_eq!(MistakeRange::parse("everything"), MistakeRange::All);
  }

  #[test]
  fn range_bounds_are_anchored_at_now() {
    let now = 1_000_000_000;
    assert_eq!(MistakeRange::Current.bounds(now), None);
    assert_eq!(MistakeRange::Days7.bounds(now), Some((now - 7 * DAY_MILLIS, now)));
    assert_eq!(MistakeRange::Days30.bounds(now), Some((now - 30 * DAY_MILLIS, now)));
    assert_eq!(MistakeRange::All.bounds(now), Some((0, now)));
  }
}
