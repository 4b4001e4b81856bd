//! Parquet/JSON fixture writers for the data-module tests.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryArray, Float64Array, Int32Array, Int64Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;
use serde_json::json;

pub(crate) fn write_parquet(path: &Path, fields: Vec<Field>, columns: Vec<ArrayRef>) {
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns).unwrap();
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn millis(ts: &str) -> i64 {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S")
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn date_millis(date: &str) -> i64 {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn fake_wkb(tag: u8) -> Vec<u8> {
    // Opaque to the data layer; three bytes are as good as a real polygon.
    vec![0x01, 0x03, tag]
}

pub(crate) fn write_reference_stores(root: &Path) {
    write_parquet(
        &root.join("gdfGreenland.parquet"),
        vec![Field::new("geometry", DataType::Binary, false)],
        vec![Arc::new(BinaryArray::from_iter_values([fake_wkb(0)]))],
    );

    write_parquet(
        &root.join("t_greenland_basins.parquet"),
        vec![
            Field::new("basin_id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("area_km2", DataType::Float64, false),
        ],
        vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(StringArray::from(vec!["Watson", "Russell"])),
            Arc::new(Float64Array::from(vec![12_000.0, 800.0])),
        ],
    );

    write_parquet(
        &root.join("t_greenland_hexagons.parquet"),
        vec![
            Field::new("hex_id", DataType::Int64, false),
            Field::new("geometry", DataType::Binary, false),
        ],
        vec![
            Arc::new(Int64Array::from(vec![0, 1, 2])),
            Arc::new(BinaryArray::from_iter_values([
                fake_wkb(0),
                fake_wkb(1),
                fake_wkb(2),
            ])),
        ],
    );
}

/// Rows: (doy, lat, lon, elev, albedo, temp).
pub(crate) fn write_albedo_partition(
    root: &Path,
    yyyy: i32,
    rows: &[(i32, f64, f64, f64, f64, f64)],
) {
    let dir = root.join("albedo");
    std::fs::create_dir_all(&dir).unwrap();
    write_parquet(
        &dir.join(format!("albedo_{yyyy}.parquet")),
        vec![
            Field::new("yyyy", DataType::Int32, false),
            Field::new("doy", DataType::Int32, false),
            Field::new("lat", DataType::Float64, false),
            Field::new("lon", DataType::Float64, false),
            Field::new("elev", DataType::Float64, false),
            Field::new("albedo", DataType::Float64, false),
            Field::new("temp", DataType::Float64, false),
        ],
        vec![
            Arc::new(Int32Array::from(vec![yyyy; rows.len()])),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.3).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.4).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.5).collect::<Vec<_>>(),
            )),
        ],
    );
}

/// Rows: (yyyy, doy, bands as (yfrom, w) pairs).
pub(crate) fn write_histogram_table(root: &Path, rows: &[(i32, u16, Vec<(f64, f64)>)]) {
    let value: Vec<_> = rows
        .iter()
        .map(|(yyyy, doy, bands)| {
            json!({
                "yyyy": yyyy,
                "doy": doy,
                "histogram": bands
                    .iter()
                    .map(|(y_from, width)| json!({"yfrom": y_from, "w": width, "h": 20.0}))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    std::fs::write(
        root.join("histogram_rects.json"),
        serde_json::to_vec(&value).unwrap(),
    )
    .unwrap();
}

/// Daily rows: (year, dayofyear, airtemperature_c); hourly rows:
/// (ISO datetime, ta).
pub(crate) fn write_station(
    root: &Path,
    station_id: &str,
    daily: &[(i32, u16, f64)],
    hourly: &[(&str, f64)],
) {
    write_parquet(
        &root.join(format!("KAN_{station_id}_day.parquet")),
        vec![
            Field::new("year", DataType::Int32, false),
            Field::new("dayofyear", DataType::Int32, false),
            Field::new("airtemperature_c", DataType::Float64, false),
        ],
        vec![
            Arc::new(Int32Array::from(
                daily.iter().map(|r| r.0).collect::<Vec<_>>(),
            )),
            Arc::new(Int32Array::from(
                daily.iter().map(|r| i32::from(r.1)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                daily.iter().map(|r| r.2).collect::<Vec<_>>(),
            )),
        ],
    );

    write_parquet(
        &root.join(format!("KAN_{station_id}_hour.parquet")),
        vec![
            Field::new(
                "datetime_date",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
            Field::new("ta", DataType::Float64, false),
        ],
        vec![
            Arc::new(TimestampMillisecondArray::from(
                hourly.iter().map(|r| millis(r.0)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                hourly.iter().map(|r| r.1).collect::<Vec<_>>(),
            )),
        ],
    );
}

pub(crate) fn write_station_csv(
    root: &Path,
    station_id: &str,
    daily: &[(i32, u16, f64)],
    hourly: &[(&str, f64)],
) {
    let mut day = String::from("year,dayofyear,airtemperature_c\n");
    for (year, doy, temp) in daily {
        day.push_str(&format!("{year},{doy},{temp}\n"));
    }
    std::fs::write(root.join(format!("KAN_{station_id}_day.csv")), day).unwrap();

    let mut hour = String::from("datetime_date,ta\n");
    for (at, ta) in hourly {
        hour.push_str(&format!("{at},{ta}\n"));
    }
    std::fs::write(root.join(format!("KAN_{station_id}_hour.csv")), hour).unwrap();
}

/// Rows: (ISO datetime, flux).
pub(crate) fn write_flux(root: &Path, rows: &[(&str, f64)]) {
    write_parquet(
        &root.join("t_greenland_watson_river_hourly.parquet"),
        vec![
            Field::new(
                "datetime_date",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
            Field::new("flux", DataType::Float64, false),
        ],
        vec![
            Arc::new(TimestampMillisecondArray::from(
                rows.iter().map(|r| millis(r.0)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            )),
        ],
    );
}

/// Rows: (ISO date, darkice, wetsnow, snow).
pub(crate) fn write_hex_partition(root: &Path, yyyy: i32, rows: &[(&str, f64, f64, f64)]) {
    write_parquet(
        &root.join(format!("t_albedobands_hexmapped_{yyyy}.parquet")),
        vec![
            Field::new(
                "datetime_date",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
            Field::new("darkice", DataType::Float64, false),
            Field::new("wetsnow", DataType::Float64, false),
            Field::new("snow", DataType::Float64, false),
            Field::new("geometry", DataType::Binary, false),
        ],
        vec![
            Arc::new(TimestampMillisecondArray::from(
                rows.iter().map(|r| date_millis(r.0)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.3).collect::<Vec<_>>(),
            )),
            Arc::new(BinaryArray::from_iter_values(
                (0..rows.len()).map(|i| fake_wkb(i as u8)),
            )),
        ],
    );
}
