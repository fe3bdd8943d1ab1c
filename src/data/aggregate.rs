use std::collections::{BTreeMap, HashMap};

use super::model::PaperTable;

// ---------------------------------------------------------------------------
// Descriptive statistics over a paper table
// ---------------------------------------------------------------------------

/// Summary statistics for a table. Total on the empty table: counts are
/// empty and the length statistics are `None` rather than NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSummary {
    /// (year, papers) ascending by year; only years present in the table.
    pub yearly_counts: Vec<(i32, usize)>,
    /// (source, papers) descending by count, first-seen order on ties.
    pub source_counts: Vec<(String, usize)>,
    pub mean_abstract_len: Option<f64>,
    pub median_abstract_len: Option<f64>,
}

/// One full pass over the table. Always recomputed from scratch, never
/// updated incrementally.
pub fn summarize(table: &PaperTable) -> AggregateSummary {
    if table.is_empty() {
        return AggregateSummary::default();
    }

    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for p in table.papers() {
        *by_year.entry(p.publish_year()).or_default() += 1;
    }

    AggregateSummary {
        yearly_counts: by_year.into_iter().collect(),
        source_counts: ranked_counts(table.papers().iter().map(|p| p.source.as_str())),
        mean_abstract_len: mean(table),
        median_abstract_len: median(table),
    }
}

/// Top `n` journals by paper count, descending, ties in first-seen order.
/// `n = 0` gives an empty result; `n` past the number of distinct journals
/// gives all of them.
pub fn top_journals(table: &PaperTable, n: usize) -> Vec<(String, usize)> {
    let mut ranked = ranked_counts(table.papers().iter().map(|p| p.journal.as_str()));
    ranked.truncate(n);
    ranked
}

/// The year with the most papers, or `None` for the empty table.
pub fn most_productive_year(table: &PaperTable) -> Option<(i32, usize)> {
    let mut best: Option<(i32, usize)> = None;
    for &(year, count) in &summarize(table).yearly_counts {
        // Strict comparison keeps the earliest year on ties.
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((year, count));
        }
    }
    best
}

/// The single most frequent journal, or `None` for the empty table.
pub fn top_journal(table: &PaperTable) -> Option<(String, usize)> {
    top_journals(table, 1).into_iter().next()
}

/// Percent change of the pandemic-era publication peak (years ≥ 2020)
/// relative to the pre-2020 peak. `None` unless both periods have data.
pub fn pandemic_increase_pct(table: &PaperTable) -> Option<f64> {
    let yearly = summarize(table).yearly_counts;
    let pre_peak = yearly
        .iter()
        .filter(|&&(year, _)| year < 2020)
        .map(|&(_, count)| count)
        .max()?;
    let peak = yearly
        .iter()
        .filter(|&&(year, _)| year >= 2020)
        .map(|&(_, count)| count)
        .max()?;
    Some((peak as f64 - pre_peak as f64) / pre_peak as f64 * 100.0)
}

/// Count occurrences of a categorical key, then order descending by count.
/// The stable sort keeps first-encountered order for equal counts.
fn ranked_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key.to_string(), order.len());
                order.push((key.to_string(), 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

fn mean(table: &PaperTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let sum: u64 = table
        .papers()
        .iter()
        .map(|p| u64::from(p.abstract_word_count))
        .sum();
    Some(sum as f64 / table.len() as f64)
}

fn median(table: &PaperTable) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let mut counts: Vec<u32> = table
        .papers()
        .iter()
        .map(|p| p.abstract_word_count)
        .collect();
    counts.sort_unstable();
    let mid = counts.len() / 2;
    Some(if counts.len() % 2 == 0 {
        f64::from(counts[mid - 1] + counts[mid]) / 2.0
    } else {
        f64::from(counts[mid])
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
