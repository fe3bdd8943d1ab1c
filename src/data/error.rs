use thiserror::Error;

// ---------------------------------------------------------------------------
// Parameter validation errors
// ---------------------------------------------------------------------------

/// A caller-supplied parameter was rejected before any computation ran.
///
/// These are surfaced to the UI immediately; the previously valid view stays
/// on screen. Load-time I/O failures use `anyhow` context chains instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidParameter {
    #[error("unknown sort column: '{0}' (expected publish_time, journal or abstract_word_count)")]
    UnknownSortColumn(String),

    #[error("year range is inverted: {min} > {max}")]
    InvertedYearRange { min: i32, max: i32 },
}
