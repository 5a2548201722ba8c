//! Timestamp arithmetic shared by the time-based transforms.

use chrono::{NaiveDateTime, TimeDelta};

/// Microseconds since the Unix epoch.
pub(crate) fn micros(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

/// `base` shifted by `offset` microseconds, saturating at chrono's range.
pub(crate) fn offset_micros(base: NaiveDateTime, offset: i64) -> NaiveDateTime {
    base.checked_add_signed(TimeDelta::microseconds(offset))
        .unwrap_or(if offset < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

/// Stable sort by timestamp; equal timestamps keep input order.
pub(crate) fn sort_by_time<T>(items: &mut [T], timestamp: impl Fn(&T) -> NaiveDateTime) {
    items.sort_by_key(|item| timestamp(item));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn micros_round_trip_through_offset() {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, 6)
            .unwrap();
        let later = offset_micros(base, 1_500_000);
        assert_eq!(micros(later) - micros(base), 1_500_000);
    }

    #[test]
    fn sort_is_stable() {
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut items = vec![(t, 'b'), (t - TimeDelta::seconds(1), 'a'), (t, 'c')];
        sort_by_time(&mut items, |(ts, _)| *ts);
        let order: String = items.iter().map(|(_, c)| *c).collect();
        assert_eq!(order, "abc");
    }
}
