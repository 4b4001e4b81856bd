//! Arrow column extraction helpers shared by the Parquet readers.

use std::fs::File;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Float32Array, Float64Array,
    Int32Array, Int64Array, LargeBinaryArray, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{LoadError, StoreError};

use super::model::AttrValue;

/// Read a whole Parquet file into record batches.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::storage(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::storage(path, e))?;
    let reader = builder.build().map_err(|e| LoadError::storage(path, e))?;
    reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::storage(path, e))
}

/// Look up a required column by name.
pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, StoreError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| StoreError::Schema(format!("missing column '{name}'")))?;
    Ok(batch.column(idx))
}

/// Extract a `Float64` (or `Float32`) column as `Vec<f64>`.
pub fn f64_col(batch: &RecordBatch, name: &str) -> Result<Vec<f64>, StoreError> {
    let col = column(batch, name)?;
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
    } else {
        Err(StoreError::Schema(format!(
            "column '{name}' is {:?}, expected Float64 or Float32",
            col.data_type()
        )))
    }
}

/// Extract an `Int32` (or `Int64`) column as `Vec<i32>`.
pub fn i32_col(batch: &RecordBatch, name: &str) -> Result<Vec<i32>, StoreError> {
    let col = column(batch, name)?;
    if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.values().to_vec())
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.values().iter().map(|&v| v as i32).collect())
    } else {
        Err(StoreError::Schema(format!(
            "column '{name}' is {:?}, expected Int32 or Int64",
            col.data_type()
        )))
    }
}

/// Extract an `Int64` (or `Int32`) column as `Vec<i64>`.
pub fn i64_col(batch: &RecordBatch, name: &str) -> Result<Vec<i64>, StoreError> {
    let col = column(batch, name)?;
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.values().to_vec())
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.values().iter().map(|&v| v as i64).collect())
    } else {
        Err(StoreError::Schema(format!(
            "column '{name}' is {:?}, expected Int64 or Int32",
            col.data_type()
        )))
    }
}

/// Extract a timestamp column as naive datetimes.
///
/// Accepts millisecond, microsecond, and nanosecond units as well as
/// `Date32` (pandas writes nanoseconds by default, our sample generator
/// milliseconds).
pub fn timestamp_col(batch: &RecordBatch, name: &str) -> Result<Vec<NaiveDateTime>, StoreError> {
    let col = column(batch, name)?;
    match col.data_type() {
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            let arr = col
                .as_any()
                .downcast_ref::<TimestampMillisecondArray>()
                .ok_or_else(|| StoreError::Schema(format!("column '{name}': bad timestamp array")))?;
            arr.values()
                .iter()
                .map(|&ms| {
                    DateTime::from_timestamp_millis(ms)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            StoreError::Schema(format!("column '{name}': timestamp {ms} out of range"))
                        })
                })
                .collect()
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let arr = col
                .as_any()
                .downcast_ref::<TimestampMicrosecondArray>()
                .ok_or_else(|| StoreError::Schema(format!("column '{name}': bad timestamp array")))?;
            arr.values()
                .iter()
                .map(|&us| {
                    DateTime::from_timestamp_micros(us)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            StoreError::Schema(format!("column '{name}': timestamp {us} out of range"))
                        })
                })
                .collect()
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            let arr = col
                .as_any()
                .downcast_ref::<TimestampNanosecondArray>()
                .ok_or_else(|| StoreError::Schema(format!("column '{name}': bad timestamp array")))?;
            Ok(arr
                .values()
                .iter()
                .map(|&ns| DateTime::from_timestamp_nanos(ns).naive_utc())
                .collect())
        }
        DataType::Date32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| StoreError::Schema(format!("column '{name}': bad date array")))?;
            arr.values()
                .iter()
                .map(|&days| {
                    DateTime::from_timestamp(i64::from(days) * 86_400, 0)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            StoreError::Schema(format!("column '{name}': date {days} out of range"))
                        })
                })
                .collect()
        }
        other => Err(StoreError::Schema(format!(
            "column '{name}' is {other:?}, expected a timestamp or date type"
        ))),
    }
}

/// Extract a `Binary` (or `LargeBinary`) column as owned byte vectors.
pub fn binary_col(batch: &RecordBatch, name: &str) -> Result<Vec<Vec<u8>>, StoreError> {
    let col = column(batch, name)?;
    if let Some(arr) = col.as_any().downcast_ref::<BinaryArray>() {
        Ok((0..arr.len()).map(|i| arr.value(i).to_vec()).collect())
    } else if let Some(arr) = col.as_any().downcast_ref::<LargeBinaryArray>() {
        Ok((0..arr.len()).map(|i| arr.value(i).to_vec()).collect())
    } else {
        Err(StoreError::Schema(format!(
            "column '{name}' is {:?}, expected Binary or LargeBinary",
            col.data_type()
        )))
    }
}

/// Extract a single dynamically-typed attribute value at a given row.
pub fn attr_value(col: &ArrayRef, row: usize) -> AttrValue {
    if col.is_null(row) {
        return AttrValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                AttrValue::String(s.value(row).to_string())
            } else {
                use arrow::array::AsArray;
                let s = col.as_string::<i64>();
                AttrValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            AttrValue::Integer(i64::from(arr.value(row)))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            AttrValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            AttrValue::Float(f64::from(arr.value(row)))
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            AttrValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            AttrValue::Bool(arr.value(row))
        }
        _ => AttrValue::String(format!("{:?}", col.data_type())),
    }
}
