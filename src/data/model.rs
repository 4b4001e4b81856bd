use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AttrValue – a single cell in a dynamic attribute column
// ---------------------------------------------------------------------------

/// A dynamically-typed attribute value for stores whose column set is not
/// fixed (the drainage-basin table carries whatever attributes the upstream
/// product shipped with).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{s}"),
            AttrValue::Integer(i) => write!(f, "{i}"),
            AttrValue::Float(v) => write!(f, "{v:.4}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Null => write!(f, "<null>"),
        }
    }
}

impl AttrValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Static reference data
// ---------------------------------------------------------------------------

/// Attribute table of drainage basins: one row per basin, dynamic columns.
#[derive(Debug, Clone, Default)]
pub struct BasinTable {
    pub rows: Vec<BTreeMap<String, AttrValue>>,
    /// Ordered list of attribute column names.
    pub column_names: Vec<String>,
}

impl BasinTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One cell of the fixed hexagon grid.
#[derive(Debug, Clone)]
pub struct HexGridCell {
    pub hex_id: i64,
    /// Cell geometry as opaque WKB bytes; decoded by the renderer.
    pub wkb: Vec<u8>,
}

/// The three fixed reference datasets, loaded once per process.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    /// Country outline polygons, WKB per row.
    pub outline: Vec<Vec<u8>>,
    pub basins: BasinTable,
    pub hexgrid: Vec<HexGridCell>,
}

// ---------------------------------------------------------------------------
// Albedo observations and histogram bands
// ---------------------------------------------------------------------------

/// One satellite-derived point observation. All observations in a slice
/// share the same (year, day-of-year) partition key.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbedoObservation {
    pub lat: f64,
    pub lon: f64,
    /// Elevation [m].
    pub elev: f64,
    /// Albedo [%], 0..100.
    pub albedo: f64,
    /// Surface temperature [°C].
    pub temp: f64,
}

/// Rectangle descriptor summarizing one elevation/albedo bucket for a date.
/// Field names mirror the on-disk histogram table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBand {
    /// Lower edge of the band on the albedo axis.
    #[serde(rename = "yfrom")]
    pub y_from: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
}

/// Surface classification derived from the widest histogram band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceClass {
    FreshSnow,
    WetSnow,
    DarkIce,
}

impl fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceClass::FreshSnow => write!(f, "Mostly Fresh Snow"),
            SurfaceClass::WetSnow => write!(f, "Mostly Wet Snow"),
            SurfaceClass::DarkIce => write!(f, "Mostly Dark, Bare Ice"),
        }
    }
}

impl SurfaceClass {
    /// Classify a date by its widest histogram band.
    ///
    /// Bands are scanned in stored order; the first band whose width
    /// strictly exceeds the running maximum wins, so ties keep the earliest
    /// band. A `y_from` of 60 puts the bulk of observations in the bright
    /// fresh-snow bucket, 40 in the wet-snow bucket, anything else in the
    /// dark-ice buckets.
    pub fn classify(bands: &[HistogramBand]) -> Option<SurfaceClass> {
        let mut max_width = f64::NEG_INFINITY;
        let mut class = None;
        for band in bands {
            if band.width > max_width {
                max_width = band.width;
                class = Some(match band.y_from {
                    y if (y - 60.0).abs() < 0.5 => SurfaceClass::FreshSnow,
                    y if (y - 40.0).abs() < 0.5 => SurfaceClass::WetSnow,
                    _ => SurfaceClass::DarkIce,
                });
            }
        }
        class
    }
}

/// Output of the albedo slice loader: the point observations for one
/// (year, day-of-year) plus that date's precomputed histogram bands.
#[derive(Debug, Clone)]
pub struct AlbedoSlice {
    pub year: i32,
    pub day_of_year: u16,
    pub observations: Vec<AlbedoObservation>,
    pub bands: Vec<HistogramBand>,
}

impl AlbedoSlice {
    pub fn classification(&self) -> Option<SurfaceClass> {
        SurfaceClass::classify(&self.bands)
    }
}

// ---------------------------------------------------------------------------
// Station temperature series
// ---------------------------------------------------------------------------

/// One daily-resolution temperature reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTemp {
    pub year: i32,
    pub day_of_year: u16,
    pub temp_c: f64,
}

/// One hourly-resolution temperature reading.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyTemp {
    pub at: NaiveDateTime,
    pub temp_c: f64,
}

/// Whole-series temperature data for one weather station. No date filtering
/// happens at this layer; callers window the series themselves.
#[derive(Debug, Clone)]
pub struct StationSeries {
    pub station_id: String,
    pub daily: Vec<DailyTemp>,
    pub hourly: Vec<HourlyTemp>,
}

// ---------------------------------------------------------------------------
// River flux
// ---------------------------------------------------------------------------

/// One hourly river-discharge reading at the fixed monitoring site.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxRecord {
    pub at: NaiveDateTime,
    /// Discharge [m³/s].
    pub flux: f64,
}

// ---------------------------------------------------------------------------
// Hexagon band snapshots
// ---------------------------------------------------------------------------

/// One hexagon cell with relative abundances of the three surface classes.
#[derive(Debug, Clone)]
pub struct HexagonCell {
    /// Cell geometry as opaque WKB bytes.
    pub wkb: Vec<u8>,
    pub dark_ice: f64,
    pub wet_snow: f64,
    pub snow: f64,
}

/// All hexagon cells observed on one exact calendar date. An empty cell set
/// is a valid outcome (no satellite pass that day).
#[derive(Debug, Clone)]
pub struct HexagonBandSnapshot {
    pub date: NaiveDate,
    pub cells: Vec<HexagonCell>,
}

impl HexagonBandSnapshot {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
