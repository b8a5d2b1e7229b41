//! Taxonomy reconciler: bucket free-text category labels into taxonomy cells
//! and rank raw labels by frequency.
//!
//! The upstream categorization is unvalidated text, so bucketing uses a
//! three-tier fallback that guarantees every record lands in exactly one cell:
//!   1. exact (category, subcategory) match → that cell
//!   2. category-only match → that category's `Uncategorized` cell
//!   3. anything else → `Other / Uncategorized`

use serde::Serialize;

use crate::domain::MistakeRecord;
use crate::taxonomy::{split_label, Taxonomy, OTHER_CATEGORY, UNCATEGORIZED};

/// One heatmap cell with its mistake count.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CellCount {
  pub category: String,
  pub subcategory: String,
  pub count: usize,
}

/// Count records per taxonomy cell. The result covers the full grid in
/// taxonomy order (zero cells included) plus any synthesized fallback cells,
/// so it can back the visualization directly.
pub fn bucket(records: &[MistakeRecord], taxonomy: &Taxonomy) -> Vec<CellCount> {
  let mut cells: Vec<CellCount> = Vec::with_capacity(taxonomy.cell_count());
  for cat in taxonomy.categories() {
    for sub in &cat.subcategories {
      cells.push(CellCount {
        category: cat.category.clone(),
        subcategory: sub.name.clone(),
        count: 0,
      });
    }
  }

  for rec in records {
    let label = rec.category.trim();
    if !label.is_empty() {
      let (cat, sub) = split_label(label);
      if !sub.is_empty() && taxonomy.has_cell(&cat, &sub) {
        bump(&mut cells, &cat, &sub);
        continue;
      }
      if taxonomy.has_category(&cat) {
        bump(&mut cells, &cat, UNCATEGORIZED);
        continue;
      }
    }
    bump(&mut cells, OTHER_CATEGORY, UNCATEGORIZED);
  }

  cells
}

/// Increment a cell, synthesizing it if the taxonomy didn't declare it.
/// Synthesized cells are inserted after the last cell of the same category
/// so the grid stays grouped.
fn bump(cells: &mut Vec<CellCount>, category: &str, subcategory: &str) {
  if let Some(cell) = cells
    .iter_mut()
    .find(|c| c.category == category && c.subcategory == subcategory)
  {
    cell.count += 1;
    return;
  }
  let pos = cells
    .iter()
    .rposition(|c| c.category == category)
    .map(|i| i + 1)
    .unwrap_or(cells.len());
  cells.insert(
    pos,
    CellCount { category: category.to_string(), subcategory: subcategory.to_string(), count: 1 },
  );
}

/// Rank raw category labels by frequency and return the top `n` as split
/// (category, subcategory) pairs.
///
/// The literal trimmed label is the ranking key — no taxonomy validation here.
/// Empty labels are excluded. Ties keep first-appearance order (the sort is
/// stable). An unmatched label still produces an entry; it just won't find
/// any quiz question downstream.
pub fn top_frequencies(records: &[MistakeRecord], n: usize) -> Vec<(String, String)> {
  let mut freq: Vec<(String, usize)> = Vec::new();
  for rec in records {
    let label = rec.category.trim();
    if label.is_empty() {
      continue;
    }
    match freq.iter_mut().find(|(l, _)| l.as_str() == label) {
      Some((_, count)) => *count += 1,
      None => freq.push((label.to_string(), 1)),
    }
  }
  freq.sort_by(|a, b| b.1.cmp(&a.1));
  freq
    .into_iter()
    .take(n)
    .map(|(label, _)| split_label(&label))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::taxonomy::{Subcategory, TaxonomyCategory};

  fn tax() -> Taxonomy {
    let cat = |name: &str, subs: &[&str]| TaxonomyCategory {
      category: name.into(),
      subcategories: subs
        .iter()
        .map(|s| Subcategory { name: (*s).into(), description: None })
        .collect(),
    };
    Taxonomy::new(vec![
      cat("Grammar", &["Subject-Verb Agreement", "Articles"]),
      cat("Vocabulary", &["Word Choice"]),
      cat("Other", &["Uncategorized"]),
    ])
  }

  fn rec(category: &str) -> MistakeRecord {
    MistakeRecord { category: category.into(), ..Default::default() }
  }

  fn count_of(cells: &[CellCount], cat: &str, sub: &str) -> usize {
    cells
      .iter()
      .find(|c| c.category == cat && c.subcategory == sub)
      .map(|c| c.count)
      .unwrap_or(0)
  }

  #[test]
  fn exact_match_hits_only_that_cell() {
    let cells = bucket(&[rec("Grammar > Articles")], &tax());
    assert_eq!(count_of(&cells, "Grammar", "Articles"), 1);
    assert_eq!(cells.iter().map(|c| c.count).sum::<usize>(), 1);
  }

  #[test]
  fn category_only_match_goes_to_synthesized_uncategorized() {
    let cells = bucket(&[rec("Grammar > Gerunds")], &tax());
    assert_eq!(count_of(&cells, "Grammar", "Uncategorized"), 1);
    // Synthesized cell stays grouped with its category.
    let idx = cells
      .iter()
      .position(|c| c.category == "Grammar" && c.subcategory == "Uncategorized")
      .unwrap();
    assert_eq!(cells[idx - 1].category, "Grammar");
  }

  #[test]
  fn unknown_and_empty_labels_fall_back_to_other() {
    let cells = bucket(&[rec("Rhetoric > Pathos"), rec(""), rec("Grammar")], &tax());
    // "Grammar" with no subcategory is a category-only match.
    assert_eq!(count_of(&cells, "Grammar", "Uncategorized"), 1);
    assert_eq!(count_of(&cells, "Other", "Uncategorized"), 2);
  }

  #[test]
  fn every_record_is_counted_exactly_once() {
    let records = vec![
      rec("Grammar > Articles"),
      rec("Grammar > Articles"),
      rec("Vocabulary > Word Choice"),
      rec("Vocabulary > Collocations"),
      rec("nonsense"),
      rec(""),
    ];
    let cells = bucket(&records, &tax());
    assert_eq!(cells.iter().map(|c| c.count).sum::<usize>(), records.len());
  }

  #[test]
  fn zero_cells_cover_the_full_grid() {
    let cells = bucket(&[], &tax());
    assert_eq!(cells.len(), tax().cell_count());
    assert!(cells.iter().all(|c| c.count == 0));
  }

  #[test]
  fn top_frequencies_ranks_by_count_then_first_appearance() {
    let records = vec![
      rec("Grammar > Articles"),
      rec("Vocabulary > Word Choice"),
      rec("Grammar > Articles"),
      rec("Structure > Coherence"),
      rec("Vocabulary > Word Choice"),
      rec(""),
    ];
    let top = top_frequencies(&records, 3);
    assert_eq!(
      top,
      vec![
        ("Grammar".to_string(), "Articles".to_string()),
        ("Vocabulary".to_string(), "Word Choice".to_string()),
        ("Structure".to_string(), "Coherence".to_string()),
      ]
    );
  }

  #[test]
  fn top_frequencies_truncates_and_splits_unvalidated_labels() {
    let records = vec![rec("Made Up > Label"), rec("NoSeparator")];
    let top = top_frequencies(&records, 1);
    assert_eq!(top, vec![("Made Up".to_string(), "Label".to_string())]);
    let all = top_frequencies(&records, 10);
    assert_eq!(all.len(), 2);
    assert_eq!(all[1], ("NoSeparator".to_string(), String::new()));
  }
}
