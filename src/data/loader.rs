use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Paper, PaperTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Where the metadata table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Deterministic sample data (fixed seed); `records` rows.
    Synthetic { records: usize },
    /// A metadata file on disk (`.csv` or `.json`).
    File(PathBuf),
}

impl DataSource {
    pub fn synthetic_default() -> Self {
        DataSource::Synthetic { records: 5000 }
    }
}

/// Result of a load: the table plus how many rows were dropped because their
/// publish date could not be parsed.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: Arc<PaperTable>,
    pub dropped_rows: usize,
}

/// Load a paper table from the given source. Dispatch by extension for files.
///
/// Supported formats:
/// * `.csv`  – header row with columns title, abstract, publish_time,
///   journal, source_x, authors and optionally abstract_word_count
/// * `.json` – records-oriented array of objects with the same keys
pub fn load(source: &DataSource) -> Result<LoadOutcome> {
    match source {
        DataSource::Synthetic { records } => Ok(LoadOutcome {
            table: Arc::new(generate_sample_table(*records)),
            dropped_rows: 0,
        }),
        DataSource::File(path) => load_file(path),
    }
}

fn load_file(path: &Path) -> Result<LoadOutcome> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let outcome = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if outcome.dropped_rows > 0 {
        log::warn!(
            "{}: dropped {} rows with unparseable publish_time",
            path.display(),
            outcome.dropped_rows
        );
    }
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Load cache
// ---------------------------------------------------------------------------

/// Memoizes the most recent load, keyed by the source plus the file's
/// modification time. A repeated load with an unchanged key hands back the
/// same `Arc<PaperTable>`; a parameter or mtime change triggers a reload.
#[derive(Default)]
pub struct LoaderCache {
    entry: Option<(CacheKey, LoadOutcome)>,
}

#[derive(PartialEq, Eq)]
struct CacheKey {
    source: DataSource,
    mtime: Option<SystemTime>,
}

impl LoaderCache {
    pub fn load(&mut self, source: &DataSource) -> Result<LoadOutcome> {
        let key = CacheKey {
            source: source.clone(),
            mtime: source_mtime(source),
        };

        if let Some((cached_key, outcome)) = &self.entry {
            if *cached_key == key {
                log::debug!("loader cache hit for {source:?}");
                return Ok(outcome.clone());
            }
        }

        let outcome = load(source)?;
        self.entry = Some((key, outcome.clone()));
        Ok(outcome)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

fn source_mtime(source: &DataSource) -> Option<SystemTime> {
    match source {
        DataSource::Synthetic { .. } => None,
        DataSource::File(path) => std::fs::metadata(path).and_then(|m| m.modified()).ok(),
    }
}

// ---------------------------------------------------------------------------
// Free-form date coercion
// ---------------------------------------------------------------------------

/// Parse the free-form `publish_time` text found in real metadata files.
///
/// Accepts ISO dates (with or without a time suffix), slash dates,
/// `YYYY Mon DD`, `Mon DD, YYYY` and a bare year (mapped to January 1st).
pub fn parse_publish_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // ISO timestamp: keep the date part.
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
    }

    for fmt in ["%Y %b %d", "%b %d, %Y", "%d %b %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }

    // Bare year.
    if let Ok(year) = text.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LoadOutcome> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening metadata file {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let title_idx = col("title")?;
    let abstract_idx = col("abstract")?;
    let time_idx = col("publish_time")?;
    let journal_idx = col("journal")?;
    let source_idx = col("source_x")?;
    let authors_idx = col("authors")?;
    let words_idx = headers.iter().position(|h| h == "abstract_word_count");

    let mut papers = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let Some(publish_date) = parse_publish_date(record.get(time_idx).unwrap_or("")) else {
            dropped += 1;
            continue;
        };

        let abstract_text = field(abstract_idx);
        let abstract_word_count = match words_idx {
            Some(idx) => record
                .get(idx)
                .unwrap_or("")
                .trim()
                .parse::<u32>()
                .unwrap_or_else(|_| count_words(&abstract_text)),
            None => count_words(&abstract_text),
        };

        papers.push(Paper {
            title: field(title_idx),
            abstract_text,
            publish_date,
            journal: field(journal_idx),
            source: field(source_idx),
            authors: field(authors_idx),
            abstract_word_count,
        });
    }

    Ok(LoadOutcome {
        table: Arc::new(PaperTable::new(papers)),
        dropped_rows: dropped,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One record of the records-oriented JSON export
/// (`df.to_json(orient='records')`).
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: String,
    #[serde(rename = "abstract", default)]
    abstract_text: String,
    #[serde(default)]
    publish_time: String,
    #[serde(default)]
    journal: String,
    #[serde(rename = "source_x", default)]
    source: String,
    #[serde(default)]
    authors: String,
    abstract_word_count: Option<u32>,
}

fn load_json(path: &Path) -> Result<LoadOutcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading metadata file {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut papers = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for (i, rec) in records.iter().enumerate() {
        let raw: RawRecord = serde_json::from_value(rec.clone())
            .with_context(|| format!("Row {i} is not a valid metadata record"))?;

        let Some(publish_date) = parse_publish_date(&raw.publish_time) else {
            dropped += 1;
            continue;
        };

        let abstract_word_count = raw
            .abstract_word_count
            .unwrap_or_else(|| count_words(&raw.abstract_text));

        papers.push(Paper {
            title: raw.title,
            abstract_text: raw.abstract_text,
            publish_date,
            journal: raw.journal,
            source: raw.source,
            authors: raw.authors,
            abstract_word_count,
        });
    }

    Ok(LoadOutcome {
        table: Arc::new(PaperTable::new(papers)),
        dropped_rows: dropped,
    })
}

// ---------------------------------------------------------------------------
// Synthetic sample data
// ---------------------------------------------------------------------------

pub const SAMPLE_TITLES: [&str; 20] = [
    "COVID-19 transmission dynamics in healthcare settings",
    "SARS-CoV-2 vaccine efficacy and safety analysis",
    "Respiratory complications in coronavirus patients",
    "Economic impact of pandemic control measures",
    "Mental health effects of social distancing policies",
    "Clinical characteristics of COVID-19 in elderly patients",
    "Diagnostic accuracy of rapid antigen tests",
    "Long COVID symptoms and patient outcomes",
    "Healthcare worker infection rates during pandemic",
    "Effectiveness of mask mandates in reducing transmission",
    "COVID-19 variants and immune escape mechanisms",
    "Pediatric COVID-19 clinical presentation",
    "Vaccine hesitancy and public health messaging",
    "Remote work productivity during lockdowns",
    "Supply chain disruptions in pharmaceutical industry",
    "COVID-19 impact on cancer screening programs",
    "Telemedicine adoption during pandemic",
    "School closure effects on student learning",
    "Food security challenges during COVID-19",
    "Environmental changes during lockdown periods",
];

pub const SAMPLE_JOURNALS: [&str; 15] = [
    "Nature Medicine",
    "The Lancet",
    "New England Journal of Medicine",
    "Science",
    "Cell",
    "BMJ",
    "JAMA",
    "PNAS",
    "Nature",
    "PLoS ONE",
    "Journal of Virology",
    "Clinical Infectious Diseases",
    "Epidemiology",
    "Public Health Reports",
    "Vaccine",
];

pub const SAMPLE_SOURCES: [&str; 5] = ["PubMed", "PMC", "bioRxiv", "medRxiv", "arXiv"];

const SAMPLE_SEED: u64 = 42;

/// Generate the deterministic sample table.
///
/// Publication dates are biased towards the pandemic years: 70% of rows fall
/// in 2020–2022 (weighted 0.3/0.4/0.3), the rest are uniform over 2015–2023.
/// Day-of-month stays in 1–28 so every generated date is valid.
pub fn generate_sample_table(records: usize) -> PaperTable {
    let mut rng = SimpleRng::new(SAMPLE_SEED);
    let mut papers = Vec::with_capacity(records);

    for i in 0..records {
        let year = if rng.next_f64() < 0.7 {
            let roll = rng.next_f64();
            if roll < 0.3 {
                2020
            } else if roll < 0.7 {
                2021
            } else {
                2022
            }
        } else {
            2015 + rng.next_range(9) as i32
        };
        let month = 1 + rng.next_range(12) as u32;
        let day = 1 + rng.next_range(28) as u32;
        // month 1-12, day 1-28: always a valid date
        let publish_date = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap());

        let words = rng.gauss(150.0, 50.0).round().clamp(50.0, 300.0) as u32;

        papers.push(Paper {
            title: SAMPLE_TITLES[rng.next_range(SAMPLE_TITLES.len() as u64) as usize].to_string(),
            abstract_text: format!("Abstract with {words} words about COVID-19 research..."),
            publish_date,
            journal: SAMPLE_JOURNALS[rng.next_range(SAMPLE_JOURNALS.len() as u64) as usize]
                .to_string(),
            source: SAMPLE_SOURCES[rng.next_range(SAMPLE_SOURCES.len() as u64) as usize]
                .to_string(),
            authors: format!("Author{} et al.", i % 100),
            abstract_word_count: words,
        });
    }

    PaperTable::new(papers)
}

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[0, n)`.
    pub fn next_range(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
