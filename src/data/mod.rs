/// Data layer: core types, loading, filtering, aggregation, and export.
///
/// Architecture:
/// ```text
///  metadata.csv / .json / synthetic
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse or generate → PaperTable (memoized)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ PaperTable  │  Vec<Paper>, immutable after load
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range ∧ source set ∧ title search → PaperTable
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌──────────┐  ┌──────────┐  ┌──────────┐
///   │ aggregate │  │   view    │  │  export   │
///   └──────────┘  └──────────┘  └──────────┘
/// ```
///
/// Everything below `loader` is a pure function of its inputs; the UI layer
/// recomputes the whole chain on every selection change.

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
