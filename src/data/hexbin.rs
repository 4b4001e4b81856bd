use std::path::Path;

use chrono::NaiveDate;

use crate::error::LoadError;

use super::columns::{binary_col, f64_col, read_batches, timestamp_col};
use super::model::{HexagonBandSnapshot, HexagonCell};

/// One row of a year partition: a dated hexagon cell.
#[derive(Debug, Clone)]
pub(crate) struct HexDatedCell {
    pub date: NaiveDate,
    pub cell: HexagonCell,
}

/// Load one year partition of the hexagon-band store
/// (`t_albedobands_hexmapped_{yyyy}.parquet`).
///
/// The partition is resolved from the reference date's year; a missing
/// partition file is a bad-key failure, distinct from a corrupt store.
pub(crate) fn load_year(root: &Path, year: i32) -> Result<Vec<HexDatedCell>, LoadError> {
    let path = root.join(format!("t_albedobands_hexmapped_{year}.parquet"));
    if !path.is_file() {
        return Err(LoadError::NoPartitionForYear(year));
    }

    let mut rows = Vec::new();
    for batch in read_batches(&path)? {
        let stamps = timestamp_col(&batch, "datetime_date").map_err(|e| LoadError::storage(&path, e))?;
        let dark_ice = f64_col(&batch, "darkice").map_err(|e| LoadError::storage(&path, e))?;
        let wet_snow = f64_col(&batch, "wetsnow").map_err(|e| LoadError::storage(&path, e))?;
        let snow = f64_col(&batch, "snow").map_err(|e| LoadError::storage(&path, e))?;
        let wkbs = binary_col(&batch, "geometry").map_err(|e| LoadError::storage(&path, e))?;

        for (i, wkb) in wkbs.into_iter().enumerate() {
            rows.push(HexDatedCell {
                date: stamps[i].date(),
                cell: HexagonCell {
                    wkb,
                    dark_ice: dark_ice[i],
                    wet_snow: wet_snow[i],
                    snow: snow[i],
                },
            });
        }
    }
    log::debug!("hexagon bands {year}: {} dated cells", rows.len());
    Ok(rows)
}

/// Snapshot of the cells observed on exactly `date` (equality, not a
/// window). An empty snapshot means no satellite pass that day.
pub(crate) fn snapshot_for(rows: &[HexDatedCell], date: NaiveDate) -> HexagonBandSnapshot {
    HexagonBandSnapshot {
        date,
        cells: rows
            .iter()
            .filter(|r| r.date == date)
            .map(|r| r.cell.clone())
            .collect(),
    }
}
