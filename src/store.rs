//! Attempt store: per-user append-only history, one JSON document per user.
//!
//! Discipline: `append` is a read-modify-write of the whole user file
//! (load, push, persist). An in-process async lock serializes writers inside
//! this process; a second process writing the same file can still race and
//! lose an append. That matches the original single-writer assumption and is
//! documented rather than fixed.
//!
//! Reads are tolerant: a missing or unreadable file is an empty history, so
//! queries never fail. Only write failures propagate.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::domain::{AnnotatedMistake, Attempt, Mode, UserHistory};

#[derive(Clone)]
pub struct AttemptStore {
  dir: PathBuf,
  write_lock: Arc<Mutex<()>>,
}

impl AttemptStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into(), write_lock: Arc::new(Mutex::new(())) }
  }

  /// Build from DATA_DIR (default "./data").
  pub fn from_env() -> Self {
    let dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into());
    Self::new(dir)
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn user_path(&self, user_id: &str) -> PathBuf {
    self.dir.join(format!("{}.json", sanitize_user_id(user_id)))
  }

  fn load_history(&self, user_id: &str) -> UserHistory {
    let path = self.user_path(user_id);
    match fs::read_to_string(&path) {
      Ok(s) => match serde_json::from_str::<UserHistory>(&s) {
        Ok(h) => h,
        Err(e) => {
          warn!(target: "store", %user_id, path = %path.display(), error = %e, "Unreadable history file; treating as empty");
          UserHistory::default()
        }
      },
      // Missing file is the normal first-attempt case.
      Err(_) => UserHistory::default(),
    }
  }

  /// Append one attempt to the user's history. Durable before this returns.
  #[instrument(level = "debug", skip(self, attempt), fields(user_id = %attempt.user_id, attempt_id = %attempt.id))]
  pub async fn append(&self, attempt: Attempt) -> Result<(), String> {
    let _guard = self.write_lock.lock().await;

    fs::create_dir_all(&self.dir)
      .map_err(|e| format!("Failed to create data dir {}: {}", self.dir.display(), e))?;

    let user_id = attempt.user_id.clone();
    let mut history = self.load_history(&user_id);
    history.attempts.push(attempt);

    let path = self.user_path(&user_id);
    let json = serde_json::to_string_pretty(&history)
      .map_err(|e| format!("Failed to serialize history: {}", e))?;
    fs::write(&path, json)
      .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    debug!(target: "store", %user_id, attempts = history.attempts.len(), "History persisted");
    Ok(())
  }

  /// All mistake records from attempts with `from <= timestamp <= to`
  /// (inclusive on both bounds), flattened in attempt order and annotated
  /// with the owning attempt's timestamp. Attempts are pre-filtered by mode
  /// when a filter is given.
  #[instrument(level = "debug", skip(self), fields(%user_id))]
  pub fn query_range(
    &self,
    user_id: &str,
    from: i64,
    to: i64,
    mode: Option<Mode>,
  ) -> Vec<AnnotatedMistake> {
    let history = self.load_history(user_id);
    history
      .attempts
      .iter()
      .filter(|a| a.timestamp >= from && a.timestamp <= to)
      .filter(|a| mode.map_or(true, |m| a.mode == m))
      .flat_map(annotate)
      .collect()
  }

  /// Records of the most recent attempt surviving the mode filter, or empty.
  /// A newer attempt of a different mode does not shadow an older match.
  #[instrument(level = "debug", skip(self), fields(%user_id))]
  pub fn query_latest(&self, user_id: &str, mode: Option<Mode>) -> Vec<AnnotatedMistake> {
    let history = self.load_history(user_id);
    history
      .attempts
      .iter()
      .filter(|a| mode.map_or(true, |m| a.mode == m))
      .last()
      .map(|a| annotate(a).collect())
      .unwrap_or_default()
  }
}

fn annotate(attempt: &Attempt) -> impl Iterator<Item = AnnotatedMistake> + '_ {
  let ts = attempt.timestamp;
  attempt
    .mistakes
    .iter()
    .map(move |m| AnnotatedMistake { record: m.clone(), attempt_timestamp: ts })
}

/// Keep user-supplied ids from escaping the data directory.
fn sanitize_user_id(user_id: &str) -> String {
  let cleaned: String = user_id
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
    .collect();
  if cleaned.is_empty() { "default".into() } else { cleaned }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::MistakeRecord;
  use tempfile::tempdir;

  fn attempt(user: &str, ts: i64, mode: Mode, categories: &[&str]) -> Attempt {
    Attempt {
      id: format!("a-{ts}"),
      timestamp: ts,
      user_id: user.into(),
      mode,
      question_id: "q1".into(),
      source_text: "text".into(),
      analysis_text: "analysis".into(),
      mistakes: categories
        .iter()
        .map(|c| MistakeRecord { category: (*c).into(), ..Default::default() })
        .collect(),
      score: None,
    }
  }

  #[tokio::test]
  async fn append_then_query_roundtrip() {
    let dir = tempdir().unwrap();
    let store = AttemptStore::new(dir.path());
    store.append(attempt("u1", 100, Mode::Writing, &["Grammar > Articles"])).await.unwrap();
    store.append(attempt("u1", 200, Mode::Writing, &["Vocabulary > Spelling"])).await.unwrap();

    let all = store.query_range("u1", 0, 1000, None);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].attempt_timestamp, 100);
    assert_eq!(all[1].record.category, "Vocabulary > Spelling");
  }

  #[tokio::test]
  async fn range_bounds_are_inclusive() {
    let dir = tempdir().unwrap();
    let store = AttemptStore::new(dir.path());
    for ts in [100, 200, 300] {
      store.append(attempt("u1", ts, Mode::Writing, &["x"])).await.unwrap();
    }
    let hits = store.query_range("u1", 100, 200, None);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].attempt_timestamp, 100);
    assert_eq!(hits[1].attempt_timestamp, 200);
  }

  #[tokio::test]
  async fn latest_respects_mode_filter() {
    let dir = tempdir().unwrap();
    let store = AttemptStore::new(dir.path());
    store.append(attempt("u1", 100, Mode::Speaking, &["old speaking"])).await.unwrap();
    store.append(attempt("u1", 200, Mode::Writing, &["newer writing"])).await.unwrap();

    // The newer writing attempt does not shadow the speaking match.
    let latest_speaking = store.query_latest("u1", Some(Mode::Speaking));
    assert_eq!(latest_speaking.len(), 1);
    assert_eq!(latest_speaking[0].record.category, "old speaking");

    let latest_any = store.query_latest("u1", None);
    assert_eq!(latest_any[0].record.category, "newer writing");

    // No matching mode at all → empty, not an error.
    assert!(store.query_latest("u2", Some(Mode::Speaking)).is_empty());
  }

  #[tokio::test]
  async fn mode_filter_applies_before_flattening_ranges() {
    let dir = tempdir().unwrap();
    let store = AttemptStore::new(dir.path());
    store.append(attempt("u1", 100, Mode::Writing, &["w"])).await.unwrap();
    store.append(attempt("u1", 200, Mode::Speaking, &["s"])).await.unwrap();

    let speaking = store.query_range("u1", 0, 1000, Some(Mode::Speaking));
    assert_eq!(speaking.len(), 1);
    assert_eq!(speaking[0].record.category, "s");
  }

  #[tokio::test]
  async fn history_survives_store_reconstruction() {
    let dir = tempdir().unwrap();
    {
      let store = AttemptStore::new(dir.path());
      store.append(attempt("u1", 100, Mode::Writing, &["x"])).await.unwrap();
    }
    let reopened = AttemptStore::new(dir.path());
    assert_eq!(reopened.query_range("u1", 0, 1000, None).len(), 1);
  }

  #[tokio::test]
  async fn histories_are_isolated_per_user() {
    let dir = tempdir().unwrap();
    let store = AttemptStore::new(dir.path());
    store.append(attempt("alice", 100, Mode::Writing, &["a"])).await.unwrap();
    store.append(attempt("bob", 100, Mode::Writing, &["b"])).await.unwrap();

    assert_eq!(store.query_range("alice", 0, 1000, None).len(), 1);
    assert_eq!(store.query_range("bob", 0, 1000, None)[0].record.category, "b");
    assert!(store.query_range("carol", 0, 1000, None).is_empty());
  }

  #[test]
  fn user_ids_cannot_escape_the_data_dir() {
    assert_eq!(sanitize_user_id("../../etc/passwd"), "______etc_passwd");
    assert_eq!(sanitize_user_id("alice-01"), "alice-01");
    assert_eq!(sanitize_user_id(""), "default");
  }
}
