//! Recommendation engine: pick practice quiz questions targeting the most
//! frequent mistake labels from a set of records.

use rand::seq::SliceRandom;
use tracing::debug;

use crate::domain::{MistakeRecord, QuizQuestion};
use crate::reconcile::top_frequencies;

/// Select up to `n` quiz questions, one per top-ranked mistake label.
///
/// For each label (in rank order) the bank is filtered on an exact,
/// case-sensitive (category, subcategory) match and one question is chosen
/// uniformly at random. Labels with no matching bank entry contribute
/// nothing, so the result can be shorter than `n` — it is never padded.
/// There is no cross-call memory; repeat calls may pick the same question.
pub fn recommend(records: &[MistakeRecord], bank: &[QuizQuestion], n: usize) -> Vec<QuizQuestion> {
  let mut rng = rand::thread_rng();
  let mut picked = Vec::new();

  for (category, subcategory) in top_frequencies(records, n) {
    let matching: Vec<&QuizQuestion> = bank
      .iter()
      .filter(|q| q.category == category && q.subcategory == subcategory)
      .collect();
    match matching.choose(&mut rng) {
      Some(q) => picked.push((*q).clone()),
      None => {
        debug!(target: "analysis", %category, %subcategory, "No quiz question for label");
      }
    }
  }

  picked
}
