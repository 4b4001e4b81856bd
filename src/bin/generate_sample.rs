//! Generate a synthetic `data/` tree covering 2012–2014 so the dashboard
//! data layer can be exercised without the real PROMICE exports. Output is
//! deterministic (fixed seed).

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryArray, Float64Array, Int32Array, Int64Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate, NaiveTime};
use parquet::arrow::ArrowWriter;
use serde_json::json;

const YEARS: [i32; 3] = [2012, 2013, 2014];
/// Melt-season day-of-year range covered by the satellite products.
const SEASON: std::ops::RangeInclusive<u32> = 150..=260;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// WKB encoding – enough for polygons over lon/lat
// ---------------------------------------------------------------------------

fn wkb_polygon(ring: &[(f64, f64)]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(9 + 4 + ring.len() * 16 + 16);
    buf.push(0x01); // little endian
    buf.extend_from_slice(&3u32.to_le_bytes()); // Polygon
    buf.extend_from_slice(&1u32.to_le_bytes()); // one ring
    buf.extend_from_slice(&((ring.len() + 1) as u32).to_le_bytes());
    for &(lon, lat) in ring.iter().chain(ring.first()) {
        buf.extend_from_slice(&lon.to_le_bytes());
        buf.extend_from_slice(&lat.to_le_bytes());
    }
    buf
}

fn hexagon_ring(center_lon: f64, center_lat: f64, radius: f64) -> Vec<(f64, f64)> {
    (0..6)
        .map(|i| {
            let angle = std::f64::consts::PI / 3.0 * i as f64;
            (
                center_lon + radius * angle.cos(),
                center_lat + radius * angle.sin() * 0.5,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet writing
// ---------------------------------------------------------------------------

fn write_parquet(path: &Path, fields: Vec<Field>, columns: Vec<ArrayRef>) {
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns)
        .expect("Failed to create RecordBatch");
    let file = File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn timestamp_field(name: &str) -> Field {
    Field::new(name, DataType::Timestamp(TimeUnit::Millisecond, None), false)
}

fn millis(date: NaiveDate, hour: u32) -> i64 {
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time"))
        .and_utc()
        .timestamp_millis()
}

/// All calendar days of one year, in order.
fn days_of_year(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(366);
    let mut date = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date");
    while date.year() == year {
        days.push(date);
        date = date.succ_opt().expect("valid date");
    }
    days
}

// ---------------------------------------------------------------------------
// Synthetic climate shapes
// ---------------------------------------------------------------------------

/// Seasonal air temperature [°C] at low elevation, peaking in mid July.
fn seasonal_temp(doy: u32) -> f64 {
    -12.0 + 16.0 * (-((doy as f64 - 196.0) / 70.0).powi(2)).exp()
}

/// Melt-driven albedo [%] for a given elevation and day.
fn surface_albedo(elev: f64, doy: u32, rng: &mut SimpleRng) -> f64 {
    let melt = (-((doy as f64 - 200.0) / 45.0).powi(2)).exp();
    let base = 30.0 + 55.0 * (elev / 2500.0).min(1.0) - 25.0 * melt * (1.0 - elev / 2500.0);
    (base + rng.gauss(0.0, 4.0)).clamp(5.0, 95.0)
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let root = PathBuf::from("data");
    std::fs::create_dir_all(root.join("albedo")).expect("Failed to create data directories");

    write_reference(&root);
    write_albedo_and_histograms(&root, &mut rng);
    write_stations(&root, &mut rng);
    write_flux(&root, &mut rng);
    write_hexagon_bands(&root, &mut rng);

    println!("Wrote sample stores for {YEARS:?} to {}", root.display());
}

fn write_reference(root: &Path) {
    // Crude west-Greenland outline, enough for a background map.
    let outline = wkb_polygon(&[
        (-52.0, 60.0),
        (-48.0, 61.0),
        (-42.0, 65.0),
        (-40.0, 70.0),
        (-46.0, 71.5),
        (-54.0, 68.0),
        (-55.0, 63.0),
    ]);
    write_parquet(
        &root.join("gdfGreenland.parquet"),
        vec![Field::new("geometry", DataType::Binary, false)],
        vec![Arc::new(BinaryArray::from_iter_values([outline]))],
    );

    write_parquet(
        &root.join("t_greenland_basins.parquet"),
        vec![
            Field::new("basin_id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("area_km2", DataType::Float64, false),
        ],
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["Watson", "Russell", "Isunnguata"])),
            Arc::new(Float64Array::from(vec![12_000.0, 800.0, 1_550.0])),
        ],
    );

    let (ids, geoms) = hex_grid();
    write_parquet(
        &root.join("t_greenland_hexagons.parquet"),
        vec![
            Field::new("hex_id", DataType::Int64, false),
            Field::new("geometry", DataType::Binary, false),
        ],
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(BinaryArray::from_iter_values(geoms)),
        ],
    );
}

/// Hexagon grid over the ablation zone south of 70°N.
fn hex_grid() -> (Vec<i64>, Vec<Vec<u8>>) {
    let mut ids = Vec::new();
    let mut geoms = Vec::new();
    let mut hex_id = 0i64;
    for row in 0..12 {
        for col in 0..10 {
            let lat = 61.0 + row as f64 * 0.75;
            let lon = -53.0 + col as f64 * 1.0 + if row % 2 == 0 { 0.0 } else { 0.5 };
            ids.push(hex_id);
            geoms.push(wkb_polygon(&hexagon_ring(lon, lat, 0.45)));
            hex_id += 1;
        }
    }
    (ids, geoms)
}

fn write_albedo_and_histograms(root: &Path, rng: &mut SimpleRng) {
    let mut histogram_rows = Vec::new();

    for year in YEARS {
        let mut yyyy_col = Vec::new();
        let mut doy_col = Vec::new();
        let mut lat_col = Vec::new();
        let mut lon_col = Vec::new();
        let mut elev_col = Vec::new();
        let mut albedo_col = Vec::new();
        let mut temp_col = Vec::new();

        for doy in SEASON {
            let mut bucket_counts = [0usize; 5]; // albedo 0-20, .., 80-100
            for _ in 0..400 {
                let lat = 61.0 + rng.next_f64() * 8.5;
                let lon = -53.0 + rng.next_f64() * 10.0;
                let elev = 100.0 + rng.next_f64() * 2300.0;
                let albedo = surface_albedo(elev, doy, rng);
                let temp = seasonal_temp(doy) - elev / 150.0 + rng.gauss(0.0, 1.5);

                bucket_counts[((albedo / 20.0) as usize).min(4)] += 1;
                yyyy_col.push(year);
                doy_col.push(doy as i32);
                lat_col.push(lat);
                lon_col.push(lon);
                elev_col.push(elev);
                albedo_col.push(albedo);
                temp_col.push(temp);
            }

            let total = bucket_counts.iter().sum::<usize>() as f64;
            let histogram: Vec<_> = bucket_counts
                .iter()
                .enumerate()
                .map(|(i, &count)| {
                    json!({
                        "yfrom": (i * 20) as f64,
                        "w": (count as f64 / total * 30.0 * 100.0).round() / 100.0,
                        "h": 20.0,
                    })
                })
                .collect();
            histogram_rows.push(json!({"yyyy": year, "doy": doy, "histogram": histogram}));
        }

        write_parquet(
            &root.join("albedo").join(format!("albedo_{year}.parquet")),
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
                Arc::new(Int32Array::from(yyyy_col)),
                Arc::new(Int32Array::from(doy_col)),
                Arc::new(Float64Array::from(lat_col)),
                Arc::new(Float64Array::from(lon_col)),
                Arc::new(Float64Array::from(elev_col)),
                Arc::new(Float64Array::from(albedo_col)),
                Arc::new(Float64Array::from(temp_col)),
            ],
        );
    }

    let table = serde_json::Value::Array(histogram_rows);
    std::fs::write(
        root.join("histogram_rects.json"),
        serde_json::to_vec_pretty(&table).expect("Failed to serialize histogram table"),
    )
    .expect("Failed to write histogram table");
}

fn write_stations(root: &Path, rng: &mut SimpleRng) {
    // KAN_B sits lower than KAN_L, so it runs a few degrees warmer.
    for (station_id, offset) in [("B", 2.0), ("L", -2.5)] {
        let mut years = Vec::new();
        let mut doys = Vec::new();
        let mut day_temps = Vec::new();
        let mut stamps = Vec::new();
        let mut hour_temps = Vec::new();

        for year in YEARS {
            for date in days_of_year(year) {
                let doy = date.ordinal();
                let daily_mean = seasonal_temp(doy) + offset + rng.gauss(0.0, 2.0);
                years.push(year);
                doys.push(doy as i32);
                day_temps.push(daily_mean);

                for hour in (0..24).step_by(3) {
                    let diurnal = 3.5 * ((hour as f64 - 14.0) / 24.0 * 2.0 * std::f64::consts::PI).cos();
                    stamps.push(millis(date, hour));
                    hour_temps.push(daily_mean + diurnal + rng.gauss(0.0, 0.6));
                }
            }
        }

        write_parquet(
            &root.join(format!("KAN_{station_id}_day.parquet")),
            vec![
                Field::new("year", DataType::Int32, false),
                Field::new("dayofyear", DataType::Int32, false),
                Field::new("airtemperature_c", DataType::Float64, false),
            ],
            vec![
                Arc::new(Int32Array::from(years)),
                Arc::new(Int32Array::from(doys)),
                Arc::new(Float64Array::from(day_temps)),
            ],
        );
        write_parquet(
            &root.join(format!("KAN_{station_id}_hour.parquet")),
            vec![timestamp_field("datetime_date"), Field::new("ta", DataType::Float64, false)],
            vec![
                Arc::new(TimestampMillisecondArray::from(stamps)),
                Arc::new(Float64Array::from(hour_temps)),
            ],
        );
    }
}

fn write_flux(root: &Path, rng: &mut SimpleRng) {
    let mut stamps = Vec::new();
    let mut fluxes = Vec::new();

    for year in YEARS {
        for date in days_of_year(year) {
            let doy = date.ordinal();
            // Discharge follows the melt season; the 2012 peak is the flood.
            let melt = (-((doy as f64 - 194.0) / 30.0).powi(2)).exp();
            let scale = if year == 2012 { 3100.0 } else { 1500.0 };
            for hour in 0..24 {
                let value = 20.0 + scale * melt * (1.0 + 0.08 * rng.gauss(0.0, 1.0));
                stamps.push(millis(date, hour));
                fluxes.push(value.max(0.0));
            }
        }
    }

    write_parquet(
        &root.join("t_greenland_watson_river_hourly.parquet"),
        vec![timestamp_field("datetime_date"), Field::new("flux", DataType::Float64, false)],
        vec![
            Arc::new(TimestampMillisecondArray::from(stamps)),
            Arc::new(Float64Array::from(fluxes)),
        ],
    );
}

fn write_hexagon_bands(root: &Path, rng: &mut SimpleRng) {
    let (ids, geoms) = hex_grid();

    for year in YEARS {
        let mut stamps = Vec::new();
        let mut dark_ice = Vec::new();
        let mut wet_snow = Vec::new();
        let mut snow = Vec::new();
        let mut geom_col: Vec<Vec<u8>> = Vec::new();

        // Satellite passes roughly every other day in the melt season.
        for doy in SEASON.step_by(2) {
            let date = NaiveDate::from_yo_opt(year, doy).expect("valid day-of-year");
            let melt = (-((doy as f64 - 200.0) / 45.0).powi(2)).exp();
            for i in 0..ids.len() {
                // Southern rows melt out first.
                let row_factor = 1.0 - (i / 10) as f64 / 12.0;
                let dark = (melt * row_factor + rng.gauss(0.0, 0.05)).clamp(0.0, 1.0);
                let wet = ((1.0 - dark) * 0.5 + rng.gauss(0.0, 0.05)).clamp(0.0, 1.0 - dark);
                stamps.push(millis(date, 0));
                dark_ice.push(dark);
                wet_snow.push(wet);
                snow.push((1.0 - dark - wet).max(0.0));
                geom_col.push(geoms[i].clone());
            }
        }

        write_parquet(
            &root.join(format!("t_albedobands_hexmapped_{year}.parquet")),
            vec![
                timestamp_field("datetime_date"),
                Field::new("darkice", DataType::Float64, false),
                Field::new("wetsnow", DataType::Float64, false),
                Field::new("snow", DataType::Float64, false),
                Field::new("geometry", DataType::Binary, false),
            ],
            vec![
                Arc::new(TimestampMillisecondArray::from(stamps)),
                Arc::new(Float64Array::from(dark_ice)),
                Arc::new(Float64Array::from(wet_snow)),
                Arc::new(Float64Array::from(snow)),
                Arc::new(BinaryArray::from_iter_values(geom_col)),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_walk_covers_every_day_and_stays_in_year() {
        let leap = days_of_year(2012);
        assert_eq!(leap.len(), 366);
        assert_eq!(leap[0], NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
        assert_eq!(*leap.last().unwrap(), NaiveDate::from_ymd_opt(2012, 12, 31).unwrap());

        assert_eq!(days_of_year(2013).len(), 365);
    }

    #[test]
    fn rng_is_deterministic_for_a_fixed_seed() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }
}
