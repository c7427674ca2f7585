//! Data layer: core types, loading, querying and export.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Catalog (brand allow-list applied)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Catalog  │  Vec<ProductRecord>, brand / type indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  Query predicates + stable sort → view
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  view → CSV with value / efficiency columns
//!   └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
