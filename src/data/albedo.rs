use std::fs::File;
use std::io;
use std::path::Path;

use arrow::array::{Int32Array, RecordBatch};
use arrow::compute::kernels::{boolean, cmp};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::{ArrowPredicateFn, ParquetRecordBatchReaderBuilder, RowFilter};
use parquet::arrow::ProjectionMask;
use serde::Deserialize;

use crate::error::LoadError;

use super::columns::f64_col;
use super::model::{AlbedoObservation, AlbedoSlice, HistogramBand};

const ALBEDO_DIR: &str = "albedo";
const HISTOGRAM_FILE: &str = "histogram_rects.json";

/// Load the albedo observations and histogram bands for one
/// (year, day-of-year) key.
pub(crate) fn load_slice(root: &Path, year: i32, day_of_year: u16) -> Result<AlbedoSlice, LoadError> {
    let observations = read_observations(root, year, day_of_year)?;
    let bands = lookup_bands(root, year, day_of_year)?;
    log::debug!(
        "albedo {year} doy {day_of_year}: {} observations, {} bands",
        observations.len(),
        bands.len()
    );
    Ok(AlbedoSlice {
        year,
        day_of_year,
        observations,
        bands,
    })
}

// ---------------------------------------------------------------------------
// Point observations – year-partitioned Parquet with predicate pushdown
// ---------------------------------------------------------------------------

/// Expected partition schema (`albedo/albedo_{yyyy}.parquet`):
/// - `yyyy`, `doy`: Int32 (Int64 accepted)
/// - `lat`, `lon`, `elev`, `albedo`, `temp`: Float64
///
/// The store spans multiple years of high-resolution data, so the
/// (yyyy, doy) predicate is pushed into the Parquet reader as a row filter
/// and only the five observation columns are projected out. A missing year
/// file inside an existing store directory yields an empty slice; a missing
/// store directory is an error.
fn read_observations(
    root: &Path,
    year: i32,
    day_of_year: u16,
) -> Result<Vec<AlbedoObservation>, LoadError> {
    let dir = root.join(ALBEDO_DIR);
    if !dir.is_dir() {
        return Err(LoadError::storage(
            &dir,
            io::Error::new(io::ErrorKind::NotFound, "albedo store directory missing"),
        ));
    }

    let path = dir.join(format!("albedo_{year}.parquet"));
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let file = File::open(&path).map_err(|e| LoadError::storage(&path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::storage(&path, e))?;

    let key_mask = ProjectionMask::columns(builder.parquet_schema(), ["yyyy", "doy"]);
    let doy = i32::from(day_of_year);
    let predicate = ArrowPredicateFn::new(key_mask, move |batch: RecordBatch| {
        let year_mask = key_eq(&batch, "yyyy", year)?;
        let doy_mask = key_eq(&batch, "doy", doy)?;
        boolean::and(&year_mask, &doy_mask)
    });

    let out_mask = ProjectionMask::columns(
        builder.parquet_schema(),
        ["lat", "lon", "elev", "albedo", "temp"],
    );
    let reader = builder
        .with_row_filter(RowFilter::new(vec![Box::new(predicate)]))
        .with_projection(out_mask)
        .build()
        .map_err(|e| LoadError::storage(&path, e))?;

    let mut observations = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::storage(&path, e))?;
        let lat = f64_col(&batch, "lat").map_err(|e| LoadError::storage(&path, e))?;
        let lon = f64_col(&batch, "lon").map_err(|e| LoadError::storage(&path, e))?;
        let elev = f64_col(&batch, "elev").map_err(|e| LoadError::storage(&path, e))?;
        let albedo = f64_col(&batch, "albedo").map_err(|e| LoadError::storage(&path, e))?;
        let temp = f64_col(&batch, "temp").map_err(|e| LoadError::storage(&path, e))?;

        for i in 0..batch.num_rows() {
            observations.push(AlbedoObservation {
                lat: lat[i],
                lon: lon[i],
                elev: elev[i],
                albedo: albedo[i],
                temp: temp[i],
            });
        }
    }
    Ok(observations)
}

/// Equality mask for an integer partition-key column.
fn key_eq(
    batch: &RecordBatch,
    name: &str,
    value: i32,
) -> Result<arrow::array::BooleanArray, ArrowError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| ArrowError::SchemaError(format!("missing partition-key column '{name}'")))?;
    let col = arrow::compute::cast(col, &DataType::Int32)?;
    cmp::eq(&col, &Int32Array::new_scalar(value))
}

// ---------------------------------------------------------------------------
// Histogram bands – precomputed JSON lookup table
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HistogramRow {
    yyyy: i32,
    doy: u16,
    histogram: Vec<HistogramBand>,
}

/// Look up the histogram bands for one (year, doy) key.
///
/// The table must hold exactly one row per key. More than one matching row
/// means the upstream table is corrupt; picking one silently would hide
/// that, so both zero and multiple matches fail.
fn lookup_bands(root: &Path, year: i32, day_of_year: u16) -> Result<Vec<HistogramBand>, LoadError> {
    let path = root.join(HISTOGRAM_FILE);
    let file = File::open(&path).map_err(|e| LoadError::storage(&path, e))?;
    let rows: Vec<HistogramRow> = serde_json::from_reader(io::BufReader::new(file))
        .map_err(|e| LoadError::storage(&path, e))?;

    let mut matches = rows
        .into_iter()
        .filter(|r| r.yyyy == year && r.doy == day_of_year);

    match (matches.next(), matches.next()) {
        (Some(row), None) => Ok(row.histogram),
        (None, _) => Err(LoadError::NoHistogramForDate {
            year,
            doy: day_of_year,
            found: 0,
        }),
        (Some(_), Some(_)) => Err(LoadError::NoHistogramForDate {
            year,
            doy: day_of_year,
            found: 2 + matches.count(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    #[test]
    fn slice_contains_only_the_requested_key() {
        let dir = tempfile::tempdir().unwrap();
        // Partition holds three days; day 194 has two points.
        testdata::write_albedo_partition(
            dir.path(),
            2012,
            &[
                (193, 67.0, -50.0, 400.0, 55.0, 1.0),
                (194, 67.1, -50.1, 500.0, 30.0, 2.5),
                (194, 67.2, -50.2, 900.0, 35.0, 1.5),
                (195, 67.3, -50.3, 600.0, 60.0, 0.5),
            ],
        );
        testdata::write_histogram_table(
            dir.path(),
            &[(2012, 194, vec![(0.0, 9.0), (40.0, 4.0), (60.0, 2.0)])],
        );

        let slice = load_slice(dir.path(), 2012, 194).unwrap();
        assert_eq!(slice.observations.len(), 2);
        assert_eq!(slice.observations[0].elev, 500.0);
        assert_eq!(slice.observations[1].albedo, 35.0);
        assert_eq!(slice.bands.len(), 3);
        assert_eq!(
            slice.classification(),
            Some(crate::data::model::SurfaceClass::DarkIce)
        );
    }

    #[test]
    fn other_year_partition_does_not_leak_in() {
        let dir = tempfile::tempdir().unwrap();
        testdata::write_albedo_partition(dir.path(), 2012, &[(194, 67.0, -50.0, 400.0, 55.0, 1.0)]);
        testdata::write_albedo_partition(dir.path(), 2013, &[(194, 67.5, -50.5, 450.0, 65.0, 0.0)]);
        testdata::write_histogram_table(dir.path(), &[(2013, 194, vec![(60.0, 5.0)])]);

        let slice = load_slice(dir.path(), 2013, 194).unwrap();
        assert_eq!(slice.observations.len(), 1);
        assert_eq!(slice.observations[0].lat, 67.5);
    }

    #[test]
    fn missing_year_partition_yields_empty_observations() {
        let dir = tempfile::tempdir().unwrap();
        testdata::write_albedo_partition(dir.path(), 2012, &[(194, 67.0, -50.0, 400.0, 55.0, 1.0)]);
        testdata::write_histogram_table(dir.path(), &[(2014, 10, vec![(60.0, 5.0)])]);

        let slice = load_slice(dir.path(), 2014, 10).unwrap();
        assert!(slice.observations.is_empty());
        assert_eq!(slice.bands.len(), 1);
    }

    #[test]
    fn missing_store_directory_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_slice(dir.path(), 2012, 194).unwrap_err();
        assert!(matches!(err, LoadError::StorageUnavailable { .. }));
    }

    #[test]
    fn histogram_miss_is_a_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        testdata::write_albedo_partition(dir.path(), 2012, &[(194, 67.0, -50.0, 400.0, 55.0, 1.0)]);
        testdata::write_histogram_table(dir.path(), &[(2012, 193, vec![(60.0, 5.0)])]);

        let err = load_slice(dir.path(), 2012, 194).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NoHistogramForDate { found: 0, .. }
        ));
    }

    #[test]
    fn duplicate_histogram_rows_are_not_silently_picked() {
        let dir = tempfile::tempdir().unwrap();
        testdata::write_albedo_partition(dir.path(), 2012, &[(194, 67.0, -50.0, 400.0, 55.0, 1.0)]);
        testdata::write_histogram_table(
            dir.path(),
            &[
                (2012, 194, vec![(60.0, 5.0)]),
                (2012, 194, vec![(40.0, 5.0)]),
            ],
        );

        let err = load_slice(dir.path(), 2012, 194).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NoHistogramForDate { found: 2, .. }
        ));
    }
}
