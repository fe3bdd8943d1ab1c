use std::collections::BTreeSet;

use super::error::InvalidParameter;
use super::model::PaperTable;

// ---------------------------------------------------------------------------
// Filter selection: the conjunction of predicates driven by the side panel
// ---------------------------------------------------------------------------

/// The current filter controls. A record passes when its year is inside
/// `[year_min, year_max]`, its source is selected, and the search term (if
/// any) appears case-insensitively in its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub year_min: i32,
    pub year_max: i32,
    pub selected_sources: BTreeSet<String>,
    pub search_term: String,
}

impl FilterSelection {
    /// All sources selected, full year span of the table, no search term.
    pub fn all_of(table: &PaperTable) -> Self {
        let (year_min, year_max) = table.year_bounds().unwrap_or((2015, 2024));
        FilterSelection {
            year_min,
            year_max,
            selected_sources: table.sources().into_iter().collect(),
            search_term: String::new(),
        }
    }

    /// Reject selections that cannot describe any result. An empty source
    /// set is valid (it selects the empty table), an inverted year range is
    /// not.
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        if self.year_min > self.year_max {
            return Err(InvalidParameter::InvertedYearRange {
                min: self.year_min,
                max: self.year_max,
            });
        }
        Ok(())
    }
}

/// Apply the selection, producing a new table. Preserves input order
/// (stable), never mutates `table`, and is idempotent: filtering the result
/// again with the same selection is a no-op.
pub fn apply(table: &PaperTable, selection: &FilterSelection) -> PaperTable {
    let needle = selection.search_term.trim().to_lowercase();

    let papers = table
        .papers()
        .iter()
        .filter(|p| {
            let year = p.publish_year();
            year >= selection.year_min
                && year <= selection.year_max
                && selection.selected_sources.contains(&p.source)
                && (needle.is_empty() || p.title.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    PaperTable::new(papers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate;
    use crate::data::loader::generate_sample_table;
    use crate::data::model::tests::three_row_table;

    #[test]
    fn year_range_keeps_only_matching_rows() {
        let table = three_row_table();
        let mut sel = FilterSelection::all_of(&table);
        sel.year_min = 2021;
        sel.year_max = 2021;
        let filtered = apply(&table, &sel);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.papers()[0].publish_year(), 2021);
    }

    #[test]
    fn empty_source_set_yields_empty_table_without_error() {
        let table = three_row_table();
        let mut sel = FilterSelection::all_of(&table);
        sel.selected_sources.clear();
        assert!(sel.validate().is_ok());

        let filtered = apply(&table, &sel);
        assert!(filtered.is_empty());

        // Downstream aggregates degrade to zero/None.
        let summary = aggregate::summarize(&filtered);
        assert!(summary.yearly_counts.is_empty());
        assert_eq!(summary.mean_abstract_len, None);
    }

    #[test]
    fn title_search_is_case_insensitive() {
        let table = three_row_table();
        let mut sel = FilterSelection::all_of(&table);
        sel.search_term = "VACCINE".to_string();
        let filtered = apply(&table, &sel);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.papers()[0].title.contains("vaccine efficacy"));
    }

    #[test]
    fn filter_never_grows_and_is_idempotent() {
        let table = generate_sample_table(500);
        let mut sel = FilterSelection::all_of(&table);
        sel.year_min = 2020;
        sel.year_max = 2021;
        sel.selected_sources.remove("arXiv");

        let once = apply(&table, &sel);
        assert!(once.len() <= table.len());
        let twice = apply(&once, &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn output_preserves_input_order() {
        let table = generate_sample_table(300);
        let sel = FilterSelection {
            year_min: 2020,
            year_max: 2022,
            selected_sources: table.sources().into_iter().collect(),
            search_term: String::new(),
        };
        let filtered = apply(&table, &sel);
        let mut last_index = 0usize;
        for p in filtered.papers() {
            let idx = table.papers()[last_index..]
                .iter()
                .position(|q| q == p)
                .expect("filtered row missing from source order")
                + last_index;
            last_index = idx + 1;
        }
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let table = three_row_table();
        let mut sel = FilterSelection::all_of(&table);
        sel.year_min = 2022;
        sel.year_max = 2020;
        assert!(sel.validate().is_err());
    }
}
