use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::data::filter::date_window;
use crate::data::model::{
    AlbedoSlice, FluxRecord, HexagonBandSnapshot, HourlyTemp, ReferenceDataset, StationSeries,
    SurfaceClass,
};
use crate::data::store::DataStore;
use crate::data::{STATION_B, STATION_L};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Date selector bounds
// ---------------------------------------------------------------------------

/// Half-width of the hourly temperature window shown next to the selected
/// date: ±14 days.
pub const HOURLY_WINDOW_DAYS: i64 = 14;

/// Earliest selectable date.
pub fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 1, 1).expect("valid date")
}

/// Latest selectable date.
pub fn max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 12, 31).expect("valid date")
}

/// Default selection: the day the Watson River bridge was almost washed
/// away by meltwater.
pub fn default_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 7, 12).expect("valid date")
}

/// Whether a date is within the selectable range.
pub fn in_range(date: NaiveDate) -> bool {
    min_date() <= date && date <= max_date()
}

// ---------------------------------------------------------------------------
// Render cycle – fan-out over the five loaders
// ---------------------------------------------------------------------------

/// Everything the renderer needs for one selected date. No loader output
/// feeds another loader; the snapshot is a pure fan-out bundle.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub date: NaiveDate,
    pub reference: Arc<ReferenceDataset>,
    pub albedo: Arc<AlbedoSlice>,
    /// Surface class of the widest histogram band, if any band exists.
    pub surface: Option<SurfaceClass>,
    pub kan_b: Arc<StationSeries>,
    pub kan_l: Arc<StationSeries>,
    /// Hourly station readings within ±14 days of the date, for the
    /// short-range temperature view.
    pub kan_b_hourly_window: Vec<HourlyTemp>,
    pub kan_l_hourly_window: Vec<HourlyTemp>,
    /// Hourly river flux within ±7 days of the date.
    pub flux_window: Vec<FluxRecord>,
    pub hexbins: HexagonBandSnapshot,
}

/// Run all five loaders for one selected date and bundle the results.
///
/// Loader failures propagate unmodified; no partial or degraded snapshot is
/// produced, and nothing is retried (storage is local and deterministic).
pub fn render_cycle(store: &DataStore, date: NaiveDate) -> Result<DashboardSnapshot, LoadError> {
    let reference = store.reference()?;
    let albedo = store.albedo_slice(date.year(), date.ordinal() as u16)?;
    let kan_b = store.station_series(STATION_B)?;
    let kan_l = store.station_series(STATION_L)?;
    let flux_window = store.flux_window(date)?;
    let hexbins = store.hexagon_bands(date)?;

    let surface = albedo.classification();
    let kan_b_hourly_window = date_window(&kan_b.hourly, date, HOURLY_WINDOW_DAYS);
    let kan_l_hourly_window = date_window(&kan_l.hourly, date, HOURLY_WINDOW_DAYS);

    log::info!(
        "render {date}: {} albedo points, surface {:?}, {} flux readings, {} hexagons",
        albedo.observations.len(),
        surface,
        flux_window.len(),
        hexbins.cells.len()
    );

    Ok(DashboardSnapshot {
        date,
        reference,
        albedo,
        surface,
        kan_b,
        kan_l,
        kan_b_hourly_window,
        kan_l_hourly_window,
        flux_window,
        hexbins,
    })
}
