use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::model::{FluxRecord, HourlyTemp};

// ---------------------------------------------------------------------------
// Date-window filtering over loaded time series
// ---------------------------------------------------------------------------

/// A record carrying a point-in-time stamp.
pub trait Timestamped {
    fn at(&self) -> NaiveDateTime;
}

impl Timestamped for FluxRecord {
    fn at(&self) -> NaiveDateTime {
        self.at
    }
}

impl Timestamped for HourlyTemp {
    fn at(&self) -> NaiveDateTime {
        self.at
    }
}

/// Inclusive window bounds `±days` around a reference date.
///
/// Bounds are midnights: for `center = d` and `days = 7` the window is
/// `[d-7 00:00, d+7 00:00]`, so hour 00:00 of day d+7 is inside the window
/// and hour 01:00 is not. This mirrors comparing hourly timestamps against
/// date-derived datetimes.
pub fn window_bounds(center: NaiveDate, days: i64) -> (NaiveDateTime, NaiveDateTime) {
    let from = (center - Duration::days(days)).and_time(NaiveTime::MIN);
    let to = (center + Duration::days(days)).and_time(NaiveTime::MIN);
    (from, to)
}

/// Records within the inclusive `±days` window around `center`, in input
/// order.
pub fn date_window<T: Timestamped + Clone>(records: &[T], center: NaiveDate, days: i64) -> Vec<T> {
    let (from, to) = window_bounds(center, days);
    records
        .iter()
        .filter(|r| {
            let at = r.at();
            from <= at && at <= to
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flux(date: (i32, u32, u32), hms: (u32, u32, u32)) -> FluxRecord {
        FluxRecord {
            at: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(hms.0, hms.1, hms.2)
                .unwrap(),
            flux: 1.0,
        }
    }

    #[test]
    fn window_is_inclusive_at_midnight_bounds() {
        let center = NaiveDate::from_ymd_opt(2012, 7, 12).unwrap();
        let records = vec![
            flux((2012, 7, 4), (23, 0, 0)),  // before the window
            flux((2012, 7, 5), (0, 0, 0)),   // exact lower bound
            flux((2012, 7, 12), (12, 0, 0)), // inside
            flux((2012, 7, 19), (0, 0, 0)),  // exact upper bound
            flux((2012, 7, 19), (1, 0, 0)),  // past the upper bound
        ];
        let windowed = date_window(&records, center, 7);
        assert_eq!(windowed.len(), 3);
        assert_eq!(windowed[0], records[1]);
        assert_eq!(windowed[2], records[3]);
    }

    #[test]
    fn window_preserves_input_order() {
        let center = NaiveDate::from_ymd_opt(2012, 7, 12).unwrap();
        let records = vec![
            flux((2012, 7, 13), (0, 0, 0)),
            flux((2012, 7, 11), (0, 0, 0)),
        ];
        let windowed = date_window(&records, center, 7);
        assert_eq!(windowed, records);
    }

    #[test]
    fn empty_window_is_empty_not_error() {
        let center = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
        let records = vec![flux((2012, 7, 12), (0, 0, 0))];
        assert!(date_window(&records, center, 7).is_empty());
    }
}
