use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::error::InvalidParameter;

// ---------------------------------------------------------------------------
// Paper – one row of the metadata table
// ---------------------------------------------------------------------------

/// A single research-paper metadata record.
///
/// `publish_year` is deliberately not a field: it is derived from
/// `publish_date` on demand so the two can never disagree. Rows whose date
/// could not be parsed are dropped at load time, so every record in a
/// [`PaperTable`] carries a valid calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub title: String,
    pub abstract_text: String,
    pub publish_date: NaiveDate,
    pub journal: String,
    pub source: String,
    pub authors: String,
    pub abstract_word_count: u32,
}

impl Paper {
    /// Calendar year of `publish_date`.
    pub fn publish_year(&self) -> i32 {
        self.publish_date.year()
    }
}

// ---------------------------------------------------------------------------
// PaperTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered, immutable-after-load sequence of [`Paper`] records.
///
/// Filtering produces a fresh table; nothing downstream mutates in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperTable {
    papers: Vec<Paper>,
}

impl PaperTable {
    pub fn new(papers: Vec<Paper>) -> Self {
        PaperTable { papers }
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Distinct source names in first-seen order.
    pub fn sources(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for p in &self.papers {
            if !seen.iter().any(|s| s == &p.source) {
                seen.push(p.source.clone());
            }
        }
        seen
    }

    /// Number of distinct journal names.
    pub fn unique_journal_count(&self) -> usize {
        let mut journals: Vec<&str> = self.papers.iter().map(|p| p.journal.as_str()).collect();
        journals.sort_unstable();
        journals.dedup();
        journals.len()
    }

    /// (min, max) publish year, or `None` for the empty table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.papers.iter().map(Paper::publish_year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

// ---------------------------------------------------------------------------
// SortColumn – the columns the display projection may sort by
// ---------------------------------------------------------------------------

/// The closed set of sortable columns.
///
/// Column access is by this enum rather than by string name; any other
/// string is rejected at the boundary with [`InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    PublishDate,
    Journal,
    AbstractWordCount,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [
        SortColumn::PublishDate,
        SortColumn::Journal,
        SortColumn::AbstractWordCount,
    ];

    /// Human-readable label for UI selectors.
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::PublishDate => "Publication Date",
            SortColumn::Journal => "Journal",
            SortColumn::AbstractWordCount => "Abstract Words",
        }
    }
}

impl FromStr for SortColumn {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish_time" | "publish_date" => Ok(SortColumn::PublishDate),
            "journal" => Ok(SortColumn::Journal),
            "abstract_word_count" => Ok(SortColumn::AbstractWordCount),
            other => Err(InvalidParameter::UnknownSortColumn(other.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortColumn::PublishDate => "publish_time",
            SortColumn::Journal => "journal",
            SortColumn::AbstractWordCount => "abstract_word_count",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a paper with the fields most tests care about.
    pub(crate) fn paper(title: &str, year: i32, journal: &str, source: &str, words: u32) -> Paper {
        Paper {
            title: title.to_string(),
            abstract_text: format!("Abstract with {words} words about COVID-19 research..."),
            publish_date: NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
            journal: journal.to_string(),
            source: source.to_string(),
            authors: "Author0 et al.".to_string(),
            abstract_word_count: words,
        }
    }

    /// The three-row fixture used across the data-layer tests:
    /// years [2020, 2020, 2021], sources [PubMed, PubMed, PMC].
    pub(crate) fn three_row_table() -> PaperTable {
        PaperTable::new(vec![
            paper("SARS-CoV-2 vaccine efficacy and safety analysis", 2020, "The Lancet", "PubMed", 120),
            paper("Respiratory complications in coronavirus patients", 2020, "BMJ", "PubMed", 180),
            paper("Long COVID symptoms and patient outcomes", 2021, "The Lancet", "PMC", 150),
        ])
    }

    #[test]
    fn publish_year_follows_publish_date() {
        let mut p = paper("t", 2020, "j", "PubMed", 100);
        assert_eq!(p.publish_year(), 2020);
        p.publish_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        assert_eq!(p.publish_year(), 2023);
    }

    #[test]
    fn sources_are_first_seen_order() {
        assert_eq!(three_row_table().sources(), vec!["PubMed", "PMC"]);
    }

    #[test]
    fn year_bounds_and_journal_count() {
        let t = three_row_table();
        assert_eq!(t.year_bounds(), Some((2020, 2021)));
        assert_eq!(t.unique_journal_count(), 2);
        assert_eq!(PaperTable::default().year_bounds(), None);
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let err = "bogus".parse::<SortColumn>().unwrap_err();
        assert_eq!(err, InvalidParameter::UnknownSortColumn("bogus".into()));
        assert_eq!("journal".parse::<SortColumn>(), Ok(SortColumn::Journal));
    }
}
