/// Data layer: core types, the five loaders, and memoization.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv stores
///        │
///        ▼
///   ┌───────────────────────────────┐
///   │ reference  albedo  station     │  read one store → typed records
///   │ flux       hexbin              │  (columns.rs extracts Arrow columns)
///   └───────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataStore │  per-loader memo tables, keyed queries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date windows over loaded series
///   └──────────┘
/// ```
pub mod cache;
pub mod filter;
pub mod model;
pub mod store;

mod albedo;
mod columns;
mod flux;
mod hexbin;
mod reference;
mod station;

#[cfg(test)]
pub(crate) mod testdata;

pub use flux::FLUX_WINDOW_DAYS;
pub use station::{STATION_B, STATION_L};
