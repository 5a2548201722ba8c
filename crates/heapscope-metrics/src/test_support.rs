use chrono::{NaiveDate, NaiveDateTime};

use crate::timeline::offset_micros;

/// 2024-10-01 12:00:00 plus `secs`, rounded to the microsecond.
pub(crate) fn at(secs: f64) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2024, 10, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid base timestamp");
    offset_micros(base, (secs * 1_000_000.0).round() as i64)
}
