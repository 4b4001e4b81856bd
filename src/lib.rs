//! Data layer for a Greenland ice-albedo dashboard.
//!
//! A user-selected date fans out to five loaders (static reference data,
//! albedo observations with histogram bands, station temperature series,
//! river flux windows, and hexagon-binned surface classifications) whose
//! outputs are bundled for an external renderer. All stores are immutable
//! on-disk Parquet/JSON files; every query is memoized per key for the life
//! of the process.

pub mod dashboard;
pub mod data;
pub mod error;

pub use data::store::DataStore;
pub use error::LoadError;
