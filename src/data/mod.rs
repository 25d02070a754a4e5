/// Data layer: catalog types, brand schema, loading, normalization and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .json / dir of .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  one RawSheet per brand sheet
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐   schema: per-brand rules,
///   │ normalize  │◄─ filter fields, part number column
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CatalogTable  │  typed, immutable after load
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Criteria → filtered table → part details
///   └──────────┘
/// ```

pub mod criteria;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod schema;
