//! The fixed two-level mistake taxonomy: category → ordered subcategories.
//!
//! Loaded once at startup (built-in seeds or TOML override) and immutable for
//! the process lifetime. It is used in two places:
//!   - rendered into the coach prompt so the model classifies against it
//!   - matched against parsed free-text labels when bucketing counts

use serde::{Deserialize, Serialize};

/// Fallback category for records whose label matches nothing.
pub const OTHER_CATEGORY: &str = "Other";
/// Fallback subcategory, also synthesized per-category for partial matches.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subcategory {
  pub name: String,
  #[serde(default)] pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaxonomyCategory {
  pub category: String,
  pub subcategories: Vec<Subcategory>,
}

#[derive(Clone, Debug, Default)]
pub struct Taxonomy {
  categories: Vec<TaxonomyCategory>,
}

impl Taxonomy {
  pub fn new(categories: Vec<TaxonomyCategory>) -> Self {
    Self { categories }
  }

  pub fn categories(&self) -> &[TaxonomyCategory] {
    &self.categories
  }

  pub fn cell_count(&self) -> usize {
    self.categories.iter().map(|c| c.subcategories.len()).sum()
  }

  /// Exact (case-sensitive) category match.
  pub fn has_category(&self, category: &str) -> bool {
    self.categories.iter().any(|c| c.category == category)
  }

  /// Exact (case-sensitive) category + subcategory match.
  pub fn has_cell(&self, category: &str, subcategory: &str) -> bool {
    self
      .categories
      .iter()
      .find(|c| c.category == category)
      .map(|c| c.subcategories.iter().any(|s| s.name == subcategory))
      .unwrap_or(false)
  }

  /// Render the taxonomy as the classification list embedded in coach prompts,
  /// one `- Category > Subcategory: description` line per cell.
  pub fn prompt_lines(&self) -> String {
    let mut lines = Vec::with_capacity(self.cell_count());
    for cat in &self.categories {
      for sub in &cat.subcategories {
        lines.push(format!(
          "- {} > {}: {}",
          cat.category,
          sub.name,
          sub.description.as_deref().unwrap_or("")
        ));
      }
    }
    lines.join("\n")
  }
}

/// Split a free-text label on the first `>` into trimmed (category, subcategory).
/// A label without `>` yields an empty subcategory.
pub fn split_label(label: &str) -> (String, String) {
  match label.split_once('>') {
    Some((cat, sub)) => (cat.trim().to_string(), sub.trim().to_string()),
    None => (label.trim().to_string(), String::new()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tax() -> Taxonomy {
    Taxonomy::new(vec![TaxonomyCategory {
      category: "Grammar".into(),
      subcategories: vec![
        Subcategory { name: "Articles".into(), description: Some("a/an/the usage".into()) },
        Subcategory { name: "Tense Consistency".into(), description: None },
      ],
    }])
  }

  #[test]
  fn cell_lookup_is_exact() {
    let t = tax();
    assert!(t.has_cell("Grammar", "Articles"));
    assert!(!t.has_cell("Grammar", "articles"));
    assert!(!t.has_cell("grammar", "Articles"));
    assert!(t.has_category("Grammar"));
    assert!(!t.has_category("Vocabulary"));
  }

  #[test]
  fn prompt_lines_cover_every_cell() {
    let t = tax();
    let lines = t.prompt_lines();
    assert_eq!(lines.lines().count(), t.cell_count());
    assert!(lines.contains("- Grammar > Articles: a/an/the usage"));
    assert!(lines.contains("- Grammar > Tense Consistency: "));
  }

  #[test]
  fn split_label_uses_first_separator() {
    assert_eq!(split_label("Grammar > Articles"), ("Grammar".into(), "Articles".into()));
    assert_eq!(split_label("A > B > C"), ("A".into(), "B > C".into()));
    assert_eq!(split_label("Grammar"), ("Grammar".into(), String::new()));
    assert_eq!(split_label("  Grammar  >  Articles  "), ("Grammar".into(), "Articles".into()));
  }
}
