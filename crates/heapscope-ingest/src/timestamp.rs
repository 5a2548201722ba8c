//! Staged timestamp parsing.
//!
//! Log producers write `%Y-%m-%d %H:%M:%S`, sometimes with a fractional
//! second. A column is parsed in three passes: each pass only sees values the
//! earlier passes left unparsed, so a value is never read against two formats
//! that could disagree.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Whole-second log format.
pub const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sub-second log format.
pub const SUBSECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Datetime layouts tried by the inferred pass, in order.
const INFERRED_DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S%.f",
    "%d-%b-%Y %H:%M",
    "%Y%m%dT%H%M%S",
];

/// Date-only layouts tried by the inferred pass; they resolve to midnight.
const INFERRED_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Parsing pass, in the order passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Seconds,
    Subsecond,
    Inferred,
}

impl ParseStage {
    pub const ALL: [ParseStage; 3] = [
        ParseStage::Seconds,
        ParseStage::Subsecond,
        ParseStage::Inferred,
    ];

    /// Parses one trimmed value with this stage's rules.
    pub fn parse(self, value: &str) -> Option<NaiveDateTime> {
        match self {
            ParseStage::Seconds => NaiveDateTime::parse_from_str(value, SECONDS_FORMAT).ok(),
            ParseStage::Subsecond => NaiveDateTime::parse_from_str(value, SUBSECOND_FORMAT).ok(),
            ParseStage::Inferred => parse_inferred(value),
        }
    }
}

/// Per-stage outcome of parsing one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampStats {
    pub seconds: usize,
    pub subsecond: usize,
    pub inferred: usize,
    pub unparsed: usize,
}

impl TimestampStats {
    fn record(&mut self, stage: ParseStage) {
        match stage {
            ParseStage::Seconds => self.seconds += 1,
            ParseStage::Subsecond => self.subsecond += 1,
            ParseStage::Inferred => self.inferred += 1,
        }
    }
}

fn parse_inferred(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in INFERRED_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in INFERRED_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Parses a single value through every stage.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    ParseStage::ALL
        .iter()
        .find_map(|stage| stage.parse(trimmed))
}

/// Parses a whole column.
///
/// Output has one slot per input value; `None` marks values that failed every
/// stage (or were null to begin with).
pub fn parse_timestamp_column(values: &[Option<&str>]) -> (Vec<Option<NaiveDateTime>>, TimestampStats) {
    let mut parsed: Vec<Option<NaiveDateTime>> = vec![None; values.len()];
    let mut stats = TimestampStats::default();

    for stage in ParseStage::ALL {
        for (slot, value) in parsed.iter_mut().zip(values) {
            if slot.is_some() {
                continue;
            }
            let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            if let Some(dt) = stage.parse(raw) {
                *slot = Some(dt);
                stats.record(stage);
            }
        }
    }

    stats.unparsed = parsed.iter().filter(|slot| slot.is_none()).count();
    (parsed, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_whole_seconds() {
        let dt = parse_timestamp("2024-10-01 12:30:45").unwrap();
        assert_eq!(dt.second(), 45);
        assert_eq!(dt.nanosecond(), 0);
    }

    #[test]
    fn parses_fractional_seconds() {
        let dt = parse_timestamp("2024-10-01 12:30:45.125").unwrap();
        assert_eq!(dt.nanosecond(), 125_000_000);
    }

    #[test]
    fn inferred_pass_handles_iso_and_dates() {
        assert!(parse_timestamp("2024-10-01T12:30:45").is_some());
        assert!(parse_timestamp("2024-10-01T12:30:45+02:00").is_some());
        let midnight = parse_timestamp("2024-10-01").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert!(parse_timestamp("10/01/2024 08:00").is_some());
    }

    #[test]
    fn rfc3339_offsets_normalize_to_utc() {
        let dt = parse_timestamp("2024-10-01T12:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01 00:00:00"), None);
    }

    #[test]
    fn column_passes_only_touch_unparsed_values() {
        let values = [
            Some("2024-10-01 12:00:00"),
            Some("2024-10-01 12:00:00.5"),
            Some("2024-10-01T12:00:01"),
            Some("not a time"),
            None,
        ];
        let (parsed, stats) = parse_timestamp_column(&values);
        assert_eq!(parsed.iter().filter(|v| v.is_some()).count(), 3);
        assert_eq!(
            stats,
            TimestampStats {
                seconds: 1,
                subsecond: 1,
                inferred: 1,
                unparsed: 2,
            }
        );
    }
}
