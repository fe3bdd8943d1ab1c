use anyhow::{Context, Result};
use serde::Serialize;

use super::aggregate;
use super::model::PaperTable;

// ---------------------------------------------------------------------------
// CSV export (RFC 4180 via the csv crate)
// ---------------------------------------------------------------------------

/// Row layout of the exported table. Matches the metadata input schema so an
/// export re-loads cleanly through the CSV loader.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    title: &'a str,
    #[serde(rename = "abstract")]
    abstract_text: &'a str,
    publish_time: String,
    journal: &'a str,
    source_x: &'a str,
    authors: &'a str,
    abstract_word_count: u32,
}

/// Serialize the whole table as CSV, header row included, dates ISO-8601.
pub fn table_to_csv(table: &PaperTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for p in table.papers() {
        writer
            .serialize(ExportRow {
                title: &p.title,
                abstract_text: &p.abstract_text,
                publish_time: p.publish_date.format("%Y-%m-%d").to_string(),
                journal: &p.journal,
                source_x: &p.source,
                authors: &p.authors,
                abstract_word_count: p.abstract_word_count,
            })
            .context("serializing CSV row")?;
    }
    let bytes = writer.into_inner().context("flushing CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

/// Two-column `Metric,Value` summary in a fixed order. Statistics that are
/// undefined on the empty table render as `N/A`.
pub fn summary_to_csv(table: &PaperTable) -> Result<String> {
    let summary = aggregate::summarize(table);

    let year_range = table
        .year_bounds()
        .map(|(lo, hi)| format!("{lo}-{hi}"))
        .unwrap_or_else(|| "N/A".to_string());
    let avg_len = summary
        .mean_abstract_len
        .map(|m| format!("{m:.1} words"))
        .unwrap_or_else(|| "N/A".to_string());
    let best_year = aggregate::most_productive_year(table)
        .map(|(year, _)| year.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let best_journal = aggregate::top_journal(table)
        .map(|(journal, _)| journal)
        .unwrap_or_else(|| "N/A".to_string());

    let rows = [
        ("Total Papers", table.len().to_string()),
        ("Unique Journals", table.unique_journal_count().to_string()),
        ("Year Range", year_range),
        ("Avg Abstract Length", avg_len),
        ("Most Productive Year", best_year),
        ("Top Journal", best_journal),
    ];

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Metric", "Value"])
        .context("writing summary header")?;
    for (metric, value) in rows {
        writer
            .write_record([metric, &value])
            .context("writing summary row")?;
    }
    let bytes = writer.into_inner().context("flushing CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::loader::{self, DataSource};
    use crate::data::model::tests::{paper, three_row_table};
    use crate::data::model::PaperTable;

    #[test]
    fn csv_round_trips_through_the_loader() {
        let table = loader::generate_sample_table(150);
        let csv_text = table_to_csv(&table).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(csv_text.as_bytes()).unwrap();
        drop(f);

        let reloaded = loader::load(&DataSource::File(path)).unwrap();
        assert_eq!(reloaded.dropped_rows, 0);
        assert_eq!(reloaded.table.len(), table.len());
        assert_eq!(*reloaded.table, table);
    }

    #[test]
    fn quoting_follows_rfc_4180() {
        let mut p = paper("t", 2020, "j", "PMC", 2);
        p.title = "Commas, and \"quotes\"".to_string();
        p.abstract_text = "line\nbreak".to_string();
        let csv_text = table_to_csv(&PaperTable::new(vec![p])).unwrap();

        assert!(csv_text.starts_with(
            "title,abstract,publish_time,journal,source_x,authors,abstract_word_count"
        ));
        assert!(csv_text.contains("\"Commas, and \"\"quotes\"\"\""));
        assert!(csv_text.contains("\"line\nbreak\""));
    }

    #[test]
    fn summary_has_fixed_metric_order() {
        let text = summary_to_csv(&three_row_table()).unwrap();
        let metrics: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(
            metrics,
            vec![
                "Total Papers",
                "Unique Journals",
                "Year Range",
                "Avg Abstract Length",
                "Most Productive Year",
                "Top Journal",
            ]
        );
        assert!(text.contains("Total Papers,3"));
        assert!(text.contains("Year Range,2020-2021"));
        assert!(text.contains("Avg Abstract Length,150.0 words"));
        assert!(text.contains("Most Productive Year,2020"));
        assert!(text.contains("Top Journal,The Lancet"));
    }

    #[test]
    fn empty_table_summary_uses_na() {
        let text = summary_to_csv(&PaperTable::default()).unwrap();
        assert!(text.contains("Total Papers,0"));
        assert!(text.contains("Year Range,N/A"));
        assert!(text.contains("Most Productive Year,N/A"));
        assert!(text.contains("Top Journal,N/A"));
    }
}
