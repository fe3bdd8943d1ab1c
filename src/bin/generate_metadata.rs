//! Writes a deterministic sample `metadata.csv` for demos and manual testing.
//!
//! Reuses the in-app synthetic generator and CSV exporter, so the output
//! always matches the schema and catalogs the dashboard's loader expects.

use paper_lens::data::export;
use paper_lens::data::loader::generate_sample_table;

fn main() -> anyhow::Result<()> {
    let records: usize = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(5000);

    let table = generate_sample_table(records);
    let csv_text = export::table_to_csv(&table)?;

    let output_path = "metadata.csv";
    std::fs::write(output_path, csv_text)?;

    println!("Wrote {} paper records to {output_path}", table.len());
    Ok(())
}
