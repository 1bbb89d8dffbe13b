//! Data layer: core types, loading, normalization and filtering.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → raw Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  upper/trim headers, numeric income → Dataset
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year / city / level / class cascade → narrowed Dataset
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
