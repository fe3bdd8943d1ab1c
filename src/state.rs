use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::aggregate::{self, AggregateSummary};
use crate::data::filter::{self, FilterSelection};
use crate::data::loader::{DataSource, LoaderCache};
use crate::data::model::{PaperTable, SortColumn};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The base table is immutable and shared; every control change reruns
/// filter → aggregate over it and replaces the derived pieces wholesale.
pub struct AppState {
    /// Memoized loader; owns the cache key of the last load.
    pub loader: LoaderCache,

    /// The table as loaded (None until the first load finishes).
    pub base: Option<Arc<PaperTable>>,

    /// Rows dropped at load time because their date failed to parse.
    pub dropped_rows: usize,

    /// Current filter controls.
    pub selection: FilterSelection,

    /// Result of applying `selection` to `base` (recomputed on change).
    pub filtered: PaperTable,

    /// Aggregates over `filtered` (recomputed on change).
    pub summary: AggregateSummary,

    /// Stable colours per source category.
    pub source_colors: CategoryColors,

    // ---- display controls ----
    pub top_n_journals: usize,
    pub sort_column: SortColumn,
    pub sort_ascending: bool,
    pub rows_to_show: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loader: LoaderCache::default(),
            base: None,
            dropped_rows: 0,
            selection: FilterSelection {
                year_min: 2015,
                year_max: 2024,
                selected_sources: Default::default(),
                search_term: String::new(),
            },
            filtered: PaperTable::default(),
            summary: AggregateSummary::default(),
            source_colors: CategoryColors::default(),
            top_n_journals: 10,
            sort_column: SortColumn::PublishDate,
            sort_ascending: false,
            rows_to_show: 25,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load (or re-load) the base table from `source` through the cache.
    /// Failures leave the previous table in place and surface a message.
    pub fn load(&mut self, source: DataSource) {
        match self.loader.load(&source) {
            Ok(outcome) => {
                log::info!(
                    "loaded {} papers ({} rows dropped)",
                    outcome.table.len(),
                    outcome.dropped_rows
                );
                self.dropped_rows = outcome.dropped_rows;
                self.selection = FilterSelection::all_of(&outcome.table);
                self.source_colors = CategoryColors::new(&outcome.table.sources());
                self.base = Some(outcome.table);
                self.refilter();
            }
            Err(e) => {
                log::error!("failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the filtered table and its aggregates. Invalid selections
    /// keep the previous view and show the validation message instead.
    pub fn refilter(&mut self) {
        let Some(base) = &self.base else { return };

        if let Err(e) = self.selection.validate() {
            self.status_message = Some(e.to_string());
            return;
        }

        self.filtered = filter::apply(base, &self.selection);
        self.summary = aggregate::summarize(&self.filtered);

        // The load-time warning about dropped rows stays visible across
        // filter changes; an empty result takes precedence over it.
        self.status_message = if self.filtered.is_empty() && !base.is_empty() {
            Some("No papers match the current filters".to_string())
        } else if self.dropped_rows > 0 {
            Some(format!(
                "{} rows dropped (unparseable publish date)",
                self.dropped_rows
            ))
        } else {
            None
        };
    }

    /// Toggle one source in the filter selection.
    pub fn toggle_source(&mut self, source: &str) {
        if !self.selection.selected_sources.remove(source) {
            self.selection.selected_sources.insert(source.to_string());
        }
        self.refilter();
    }

    /// Select every source present in the base table.
    pub fn select_all_sources(&mut self) {
        if let Some(base) = &self.base {
            self.selection.selected_sources = base.sources().into_iter().collect();
        }
        self.refilter();
    }

    /// Clear the source selection; the filtered view becomes empty.
    pub fn select_no_sources(&mut self) {
        self.selection.selected_sources.clear();
        self.refilter();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.load(DataSource::Synthetic { records: 200 });
        state
    }

    #[test]
    fn load_initialises_selection_to_everything() {
        let state = loaded_state();
        let base = state.base.as_ref().unwrap();
        assert_eq!(state.filtered.len(), base.len());
        assert_eq!(
            state.selection.selected_sources.len(),
            base.sources().len()
        );
    }

    #[test]
    fn invalid_selection_keeps_previous_view() {
        let mut state = loaded_state();
        let before = state.filtered.clone();

        state.selection.year_min = 2023;
        state.selection.year_max = 2016;
        state.refilter();

        assert_eq!(state.filtered, before);
        assert!(state.status_message.as_deref().unwrap().contains("inverted"));
    }

    #[test]
    fn deselecting_all_sources_empties_the_view() {
        let mut state = loaded_state();
        state.select_no_sources();
        assert!(state.filtered.is_empty());
        assert_eq!(state.summary, AggregateSummary::default());
        assert!(state.status_message.is_some());

        state.select_all_sources();
        assert!(!state.filtered.is_empty());
    }

    #[test]
    fn dropped_rows_warning_survives_refilter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(
            &path,
            "title,abstract,publish_time,journal,source_x,authors\n\
             A paper,one two,2020-05-01,BMJ,PubMed,X et al.\n\
             Bad row,three,???,BMJ,PMC,Y et al.\n",
        )
        .unwrap();

        let mut state = AppState::default();
        state.load(DataSource::File(path));
        assert_eq!(state.dropped_rows, 1);
        assert!(
            state
                .status_message
                .as_deref()
                .is_some_and(|m| m.contains("1 rows dropped")),
            "expected dropped-row warning, got {:?}",
            state.status_message
        );

        // Still shown after a filter change with a non-empty result.
        state.selection.search_term = "paper".to_string();
        state.refilter();
        assert_eq!(state.filtered.len(), 1);
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("dropped")));
    }

    #[test]
    fn failed_load_leaves_table_untouched() {
        let mut state = loaded_state();
        let before = state.base.clone();
        state.load(DataSource::File("missing/metadata.csv".into()));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(
            state.base.as_ref().map(|t| t.len()),
            before.as_ref().map(|t| t.len())
        );
    }
}
