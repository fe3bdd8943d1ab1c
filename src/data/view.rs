use super::aggregate;
use super::model::{PaperTable, SortColumn};

// ---------------------------------------------------------------------------
// Chart-ready series
// ---------------------------------------------------------------------------

/// Papers per year inside `[range.0, range.1]`, ascending. Years without
/// data are omitted, matching the aggregator's charting semantics.
pub fn timeline(table: &PaperTable, range: (i32, i32)) -> Vec<(i32, usize)> {
    aggregate::summarize(table)
        .yearly_counts
        .into_iter()
        .filter(|&(year, _)| year >= range.0 && year <= range.1)
        .collect()
}

/// Top journals as (journal, papers), descending by count.
pub fn journal_chart(table: &PaperTable, top_n: usize) -> Vec<(String, usize)> {
    aggregate::top_journals(table, top_n)
}

/// One slice of the source distribution pie.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSlice {
    pub source: String,
    pub count: usize,
    /// count / total; the slices of a non-empty table sum to 1.0.
    pub fraction: f64,
}

/// Source distribution with fractions. Empty table → empty sequence.
pub fn source_pie(table: &PaperTable) -> Vec<SourceSlice> {
    let total = table.len();
    if total == 0 {
        return Vec::new();
    }
    aggregate::summarize(table)
        .source_counts
        .into_iter()
        .map(|(source, count)| SourceSlice {
            source,
            count,
            fraction: count as f64 / total as f64,
        })
        .collect()
}

/// One bin of the abstract-length histogram: `[lo, hi)` word counts.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Histogram of abstract word counts over `bins` equal-width bins spanning
/// the observed min..=max. The last bin is closed so the maximum lands in it.
pub fn abstract_histogram(table: &PaperTable, bins: usize) -> Vec<HistogramBin> {
    if table.is_empty() || bins == 0 {
        return Vec::new();
    }
    let counts: Vec<f64> = table
        .papers()
        .iter()
        .map(|p| f64::from(p.abstract_word_count))
        .collect();
    let lo = counts.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = counts.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if (hi - lo).abs() < f64::EPSILON {
        // Degenerate: every abstract has the same length.
        return vec![HistogramBin {
            lo,
            hi,
            count: counts.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lo: lo + i as f64 * width,
            hi: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for v in counts {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}

/// Mean abstract word count per year, ascending by year.
pub fn yearly_mean_abstract_len(table: &PaperTable) -> Vec<(i32, f64)> {
    let mut sums: std::collections::BTreeMap<i32, (u64, usize)> = std::collections::BTreeMap::new();
    for p in table.papers() {
        let entry = sums.entry(p.publish_year()).or_insert((0, 0));
        entry.0 += u64::from(p.abstract_word_count);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(year, (sum, n))| (year, sum as f64 / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Display projection (the data table shown in the UI)
// ---------------------------------------------------------------------------

/// A row of the on-screen table: a fixed projection of display columns with
/// the date pre-formatted as an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub title: String,
    pub journal: String,
    pub publish_date: String,
    pub abstract_word_count: u32,
    pub source: String,
}

/// Project, sort and truncate the table for display. The sort is stable
/// (ties keep original order) and truncation happens after sorting.
pub fn display_projection(
    table: &PaperTable,
    sort_column: SortColumn,
    ascending: bool,
    limit: usize,
) -> Vec<DisplayRow> {
    let mut papers: Vec<_> = table.papers().iter().collect();
    papers.sort_by(|a, b| {
        let ord = match sort_column {
            SortColumn::PublishDate => a.publish_date.cmp(&b.publish_date),
            SortColumn::Journal => a.journal.cmp(&b.journal),
            SortColumn::AbstractWordCount => a.abstract_word_count.cmp(&b.abstract_word_count),
        };
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    papers
        .into_iter()
        .take(limit)
        .map(|p| DisplayRow {
            title: p.title.clone(),
            journal: p.journal.clone(),
            publish_date: p.publish_date.format("%Y-%m-%d").to_string(),
            abstract_word_count: p.abstract_word_count,
            source: p.source.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::generate_sample_table;
    use crate::data::model::tests::{paper, three_row_table};
    use crate::data::model::PaperTable;

    #[test]
    fn timeline_omits_years_without_data() {
        let table = three_row_table();
        assert_eq!(timeline(&table, (2015, 2024)), vec![(2020, 2), (2021, 1)]);
        assert_eq!(timeline(&table, (2021, 2024)), vec![(2021, 1)]);
        assert!(timeline(&table, (2015, 2019)).is_empty());
    }

    #[test]
    fn pie_fractions_sum_to_one() {
        let table = generate_sample_table(777);
        let slices = source_pie(&table);
        assert!(!slices.is_empty());
        let total: f64 = slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-9, "fractions summed to {total}");
        let counted: usize = slices.iter().map(|s| s.count).sum();
        assert_eq!(counted, table.len());
    }

    #[test]
    fn pie_of_empty_table_is_empty() {
        assert!(source_pie(&PaperTable::default()).is_empty());
    }

    #[test]
    fn histogram_counts_sum_to_table_len() {
        let table = generate_sample_table(400);
        let bins = abstract_histogram(&table, 30);
        assert_eq!(bins.len(), 30);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, table.len());
    }

    #[test]
    fn histogram_handles_degenerate_input() {
        let table = PaperTable::new(vec![
            paper("a", 2020, "BMJ", "PMC", 120),
            paper("b", 2020, "BMJ", "PMC", 120),
        ]);
        let bins = abstract_histogram(&table, 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert!(abstract_histogram(&PaperTable::default(), 10).is_empty());
    }

    #[test]
    fn yearly_mean_length_is_grouped_and_sorted() {
        let table = PaperTable::new(vec![
            paper("a", 2021, "BMJ", "PMC", 200),
            paper("b", 2020, "BMJ", "PMC", 100),
            paper("c", 2021, "BMJ", "PMC", 100),
        ]);
        assert_eq!(
            yearly_mean_abstract_len(&table),
            vec![(2020, 100.0), (2021, 150.0)]
        );
    }

    #[test]
    fn projection_sorts_and_truncates() {
        let table = three_row_table();
        let rows = display_projection(&table, SortColumn::AbstractWordCount, true, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].abstract_word_count, 120);
        assert_eq!(rows[1].abstract_word_count, 150);
        assert_eq!(rows[0].publish_date, "2020-06-15");

        let desc = display_projection(&table, SortColumn::AbstractWordCount, false, 10);
        assert_eq!(desc[0].abstract_word_count, 180);
    }

    #[test]
    fn projection_sort_is_stable_on_ties() {
        let table = PaperTable::new(vec![
            paper("first", 2020, "BMJ", "PMC", 100),
            paper("second", 2020, "BMJ", "PMC", 100),
            paper("third", 2020, "BMJ", "PMC", 100),
        ]);
        let rows = display_projection(&table, SortColumn::Journal, true, 10);
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
