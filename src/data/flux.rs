use std::path::Path;

use crate::error::LoadError;

use super::columns::{f64_col, read_batches, timestamp_col};
use super::model::FluxRecord;

const FLUX_FILE: &str = "t_greenland_watson_river_hourly.parquet";

/// Half-width of the window handed to the renderer: ±7 days around the
/// selected date.
pub const FLUX_WINDOW_DAYS: i64 = 7;

/// Load the full hourly discharge series for the Watson River monitoring
/// site (67.005159°N 50.686733°W). The ±7-day window is applied per query
/// from the memoized series, so repeated renders never re-read the store.
pub(crate) fn load_series(root: &Path) -> Result<Vec<FluxRecord>, LoadError> {
    let path = root.join(FLUX_FILE);
    let mut series = Vec::new();
    for batch in read_batches(&path)? {
        let stamps = timestamp_col(&batch, "datetime_date").map_err(|e| LoadError::storage(&path, e))?;
        let fluxes = f64_col(&batch, "flux").map_err(|e| LoadError::storage(&path, e))?;
        series.extend(
            stamps
                .into_iter()
                .zip(fluxes)
                .map(|(at, flux)| FluxRecord { at, flux }),
        );
    }
    log::debug!("river flux: {} hourly readings", series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    #[test]
    fn loads_full_hourly_series_in_order() {
        let dir = tempfile::tempdir().unwrap();
        testdata::write_flux(
            dir.path(),
            &[
                ("2012-07-04T23:00:00", 100.0),
                ("2012-07-05T00:00:00", 120.0),
                ("2012-07-12T12:00:00", 3100.0),
            ],
        );

        let series = load_series(dir.path()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[2].flux, 3100.0);
        assert!(series[0].at < series[1].at);
    }

    #[test]
    fn missing_store_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_series(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::StorageUnavailable { .. }));
    }
}
