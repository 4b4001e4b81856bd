use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoadError;

use super::columns::{f64_col, i32_col, read_batches, timestamp_col};
use super::model::{DailyTemp, HourlyTemp, StationSeries};

/// The two PROMICE reference stations the dashboard plots by default
/// (KAN_B and KAN_L, 67.1252°N 50.1832°W). Any identifier with matching
/// backing files works.
pub const STATION_B: &str = "B";
pub const STATION_L: &str = "L";

/// Load the whole daily and hourly temperature series for one station.
///
/// Backing files are `KAN_{id}_day` and `KAN_{id}_hour`, as Parquet or CSV
/// (Parquet preferred, dispatch by extension as in the other loaders). If
/// either file is missing in both formats the identifier is unknown: a
/// bad-key failure, not an I/O one.
pub(crate) fn load_series(root: &Path, station_id: &str) -> Result<StationSeries, LoadError> {
    let daily_path = resolve(root, &format!("KAN_{station_id}_day"));
    let hourly_path = resolve(root, &format!("KAN_{station_id}_hour"));
    let (Some(daily_path), Some(hourly_path)) = (daily_path, hourly_path) else {
        return Err(LoadError::UnknownStation(station_id.to_string()));
    };

    let daily = load_daily(&daily_path)?;
    let hourly = load_hourly(&hourly_path)?;
    log::debug!(
        "station {station_id}: {} daily, {} hourly readings",
        daily.len(),
        hourly.len()
    );
    Ok(StationSeries {
        station_id: station_id.to_string(),
        daily,
        hourly,
    })
}

/// First existing backing file for a store stem, by format preference.
fn resolve(root: &Path, stem: &str) -> Option<PathBuf> {
    ["parquet", "csv"]
        .iter()
        .map(|ext| root.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

// ---------------------------------------------------------------------------
// Daily series: year, dayofyear, airtemperature_c
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DailyRow {
    year: i32,
    dayofyear: u16,
    airtemperature_c: f64,
}

fn load_daily(path: &Path) -> Result<Vec<DailyTemp>, LoadError> {
    if path.extension().and_then(|e| e.to_str()) == Some("csv") {
        return load_daily_csv(path);
    }

    let mut series = Vec::new();
    for batch in read_batches(path)? {
        let years = i32_col(&batch, "year").map_err(|e| LoadError::storage(path, e))?;
        let doys = i32_col(&batch, "dayofyear").map_err(|e| LoadError::storage(path, e))?;
        let temps = f64_col(&batch, "airtemperature_c").map_err(|e| LoadError::storage(path, e))?;
        for i in 0..batch.num_rows() {
            series.push(DailyTemp {
                year: years[i],
                day_of_year: doys[i] as u16,
                temp_c: temps[i],
            });
        }
    }
    Ok(series)
}

fn load_daily_csv(path: &Path) -> Result<Vec<DailyTemp>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| LoadError::storage(path, e))?;
    let mut series = Vec::new();
    for result in reader.deserialize() {
        let row: DailyRow = result.map_err(|e| LoadError::storage(path, e))?;
        series.push(DailyTemp {
            year: row.year,
            day_of_year: row.dayofyear,
            temp_c: row.airtemperature_c,
        });
    }
    Ok(series)
}

// ---------------------------------------------------------------------------
// Hourly series: datetime_date, ta
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HourlyRow {
    datetime_date: chrono::NaiveDateTime,
    ta: f64,
}

fn load_hourly(path: &Path) -> Result<Vec<HourlyTemp>, LoadError> {
    if path.extension().and_then(|e| e.to_str()) == Some("csv") {
        return load_hourly_csv(path);
    }

    let mut series = Vec::new();
    for batch in read_batches(path)? {
        let stamps = timestamp_col(&batch, "datetime_date").map_err(|e| LoadError::storage(path, e))?;
        let temps = f64_col(&batch, "ta").map_err(|e| LoadError::storage(path, e))?;
        series.extend(
            stamps
                .into_iter()
                .zip(temps)
                .map(|(at, temp_c)| HourlyTemp { at, temp_c }),
        );
    }
    Ok(series)
}

fn load_hourly_csv(path: &Path) -> Result<Vec<HourlyTemp>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| LoadError::storage(path, e))?;
    let mut series = Vec::new();
    for result in reader.deserialize() {
        let row: HourlyRow = result.map_err(|e| LoadError::storage(path, e))?;
        series.push(HourlyTemp {
            at: row.datetime_date,
            temp_c: row.ta,
        });
    }
    Ok(series)
}
