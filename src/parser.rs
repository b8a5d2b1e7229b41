//! Feedback parser: free text from the coach model → structured mistake records.
//!
//! The coach is asked to emit numbered blocks of the form
//!
//!   1. Error: <...>
//!   Correct: <...>
//!   Explanation: <...>
//!   Category: <Category> > <Subcategory>
//!
//! followed by Strengths/Summary sections and an optional `Score Estimate:` line.
//! Nothing enforces that contract, so this parser is deliberately lenient: it
//! never fails, it just extracts fewer (or zero) records from malformed text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::MistakeRecord;

// Block boundary: a numbered-list marker at the start of a line.
static BLOCK_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\d+\. ").unwrap());

// Field labels, case-insensitive, searched anywhere in the block.
// The value runs from the label to the next newline (or end of block).
static ERROR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Error:([^\n]*)").unwrap());
static CORRECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Correct:([^\n]*)").unwrap());
static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Explanation:([^\n]*)").unwrap());
static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Category:([^\n]*)").unwrap());

// Band estimate: a number with zero or one decimal digit, first match wins.
static SCORE_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)Score Estimate:\s*(\d+(?:\.\d)?)").unwrap());

/// Parse one block of raw feedback into ordered mistake records plus an
/// optional band estimate.
///
/// A block yields a record if at least one of the four labels is present;
/// missing labels become empty strings. Blocks with no label at all (the
/// Strengths/Summary tail) are dropped silently — that is how non-mistake
/// sections get filtered without explicit markers.
///
/// The score is searched over the whole text, independent of block
/// segmentation, and is passed through without range validation.
pub fn parse_feedback(raw: &str) -> (Vec<MistakeRecord>, Option<f32>) {
  let mut records = Vec::new();

  for block in BLOCK_SPLIT_RE.split(raw) {
    if block.trim().is_empty() {
      continue;
    }
    let error = field(&ERROR_RE, block);
    let correct = field(&CORRECT_RE, block);
    let explanation = field(&EXPLANATION_RE, block);
    let category = field(&CATEGORY_RE, block);

    if error.is_none() && correct.is_none() && explanation.is_none() && category.is_none() {
      continue;
    }
    records.push(MistakeRecord {
      error: error.unwrap_or_default(),
      correct: correct.unwrap_or_default(),
      explanation: explanation.unwrap_or_default(),
      category: category.unwrap_or_default(),
    });
  }

  let score = SCORE_RE
    .captures(raw)
    .and_then(|c| c.get(1))
    .and_then(|m| m.as_str().parse::<f32>().ok());

  (records, score)
}

fn field(re: &Regex, block: &str) -> Option<String> {
  re.captures(block)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn well_formed_blocks_yield_one_record_each() {
    let raw = "1. Error: she go\nCorrect: she goes\nExplanation: verb form\nCategory: Grammar > Subject-Verb Agreement\n\n2. Error: a honest man\nCorrect: an honest man\nExplanation: article before vowel sound\nCategory: Grammar > Articles\n";
    let (records, score) = parse_feedback(raw);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].error, "she go");
    assert_eq!(records[0].correct, "she goes");
    assert_eq!(records[0].explanation, "verb form");
    assert_eq!(records[0].category, "Grammar > Subject-Verb Agreement");
    assert_eq!(records[1].category, "Grammar > Articles");
    assert_eq!(score, None);
  }

  #[test]
  fn text_without_markers_yields_nothing() {
    let (records, score) = parse_feedback("Great essay overall. Keep practicing!");
    assert!(records.is_empty());
    assert_eq!(score, None);
  }

  #[test]
  fn labels_are_case_insensitive_and_values_trimmed() {
    let raw = "1. ERROR:   he don't   \ncorrect: he doesn't\n";
    let (records, _) = parse_feedback(raw);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].error, "he don't");
    assert_eq!(records[0].correct, "he doesn't");
    assert_eq!(records[0].explanation, "");
    assert_eq!(records[0].category, "");
  }

  #[test]
  fn unlabeled_blocks_are_filtered_out() {
    let raw = "1. Error: x\nCorrect: y\n\n2. Just some commentary with no labels at all.\n";
    let (records, _) = parse_feedback(raw);
    assert_eq!(records.len(), 1);
  }

  #[test]
  fn score_estimate_is_extracted_from_anywhere() {
    let (_, score) = parse_feedback("Summary: fine.\nScore Estimate: 6.5\n");
    assert_eq!(score, Some(6.5));
    let (_, score) = parse_feedback("score estimate: 7");
    assert_eq!(score, Some(7.0));
    // First match wins.
    let (_, score) = parse_feedback("Score Estimate: 5.0\nScore Estimate: 8.0");
    assert_eq!(score, Some(5.0));
  }

  #[test]
  fn absent_score_is_none_not_zero() {
    let (_, score) = parse_feedback("1. Error: x\n");
    assert_eq!(score, None);
  }

  #[test]
  fn out_of_range_score_passes_through_unclamped() {
    let (_, score) = parse_feedback("Score Estimate: 42.5");
    assert_eq!(score, Some(42.5));
  }

  #[test]
  fn empty_and_garbage_input_never_panics() {
    assert_eq!(parse_feedback(""), (vec![], None));
    let (records, score) = parse_feedback("\n\n3. \n   \n12. \n");
    assert!(records.is_empty());
    assert_eq!(score, None);
  }

  // Realistic full response: one mistake block, Strengths/Summary tail,
  // and a trailing band estimate.
  #[test]
  fn end_to_end_feedback_sample() {
    let raw = "1. Error: she go\nCorrect: she goes\nExplanation: verb form\nCategory: Grammar > Subject-Verb Agreement\n\nStrengths:\n- good vocabulary\n\nSummary: decent attempt\nScore Estimate: 6.0";
    let (records, score) = parse_feedback(raw);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].error, "she go");
    assert_eq!(records[0].correct, "she goes");
    assert_eq!(records[0].explanation, "verb form");
    assert_eq!(records[0].category, "Grammar > Subject-Verb Agreement");
    assert_eq!(score, Some(6.0));
  }
}
