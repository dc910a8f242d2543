//! Weekly schedule gate for actions.
//!
//! Times are wall-clock and compared as given: no timezone conversion happens
//! here, so callers pass an instant already in the local zone. An interval with
//! `start > end` never matches; a window across midnight is configured as two
//! intervals.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interval {
    #[serde(with = "time_of_day")]
    pub start: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end: NaiveTime,
}

impl Interval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Inclusive at both ends.
    pub fn is_in_interval(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timetable {
    #[serde(default)]
    pub mon: Vec<Interval>,
    #[serde(default)]
    pub tue: Vec<Interval>,
    #[serde(default)]
    pub wed: Vec<Interval>,
    #[serde(default)]
    pub thu: Vec<Interval>,
    #[serde(default)]
    pub fri: Vec<Interval>,
    #[serde(default)]
    pub sat: Vec<Interval>,
    #[serde(default)]
    pub sun: Vec<Interval>,
}

impl Timetable {
    pub fn intervals_for(&self, weekday: Weekday) -> &[Interval] {
        match weekday {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    pub fn is_in_timetable(&self, dt: NaiveDateTime) -> bool {
        let time = dt.time();
        self.intervals_for(dt.weekday())
            .iter()
            .any(|interval| interval.is_in_interval(time))
    }
}

/// Accepts `HH:MM` as well as `HH:MM:SS[.fff]`; writes `HH:MM:SS`.
mod time_of_day {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(&raw, format).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid time of day '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2024-03-04 is a Monday.
    fn monday_at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn workday_timetable() -> Timetable {
        Timetable {
            mon: vec![Interval::new(hm(9, 0), hm(18, 0))],
            ..Default::default()
        }
    }

    #[test]
    fn test_interval_is_inclusive_at_boundaries() {
        let interval = Interval::new(hm(9, 0), hm(18, 0));
        assert!(interval.is_in_interval(hm(9, 0)));
        assert!(interval.is_in_interval(hm(18, 0)));
        assert!(!interval.is_in_interval(NaiveTime::from_hms_opt(18, 0, 1).unwrap()));
        assert!(!interval.is_in_interval(NaiveTime::from_hms_opt(8, 59, 59).unwrap()));
    }

    #[test]
    fn test_timetable_matches_only_its_weekday() {
        let timetable = workday_timetable();
        assert!(timetable.is_in_timetable(monday_at(9, 0, 0)));
        assert!(timetable.is_in_timetable(monday_at(18, 0, 0)));
        assert!(!timetable.is_in_timetable(monday_at(20, 0, 0)));

        let tuesday = monday_at(12, 0, 0) + chrono::Duration::days(1);
        assert!(!timetable.is_in_timetable(tuesday));
    }

    #[test]
    fn test_reversed_interval_never_matches() {
        let night = Interval::new(hm(22, 0), hm(6, 0));
        assert!(!night.is_in_interval(hm(23, 0)));
        assert!(!night.is_in_interval(hm(3, 0)));

        let split = Timetable {
            mon: vec![
                Interval::new(hm(22, 0), NaiveTime::from_hms_opt(23, 59, 59).unwrap()),
                Interval::new(hm(0, 0), hm(6, 0)),
            ],
            ..Default::default()
        };
        assert!(split.is_in_timetable(monday_at(23, 30, 0)));
        assert!(split.is_in_timetable(monday_at(3, 0, 0)));
        assert!(!split.is_in_timetable(monday_at(12, 0, 0)));
    }

    #[test]
    fn test_timetable_parses_short_and_long_times() {
        let raw = r#"{"mon": [{"start": "08:30", "end": "17:45:30"}], "sun": []}"#;
        let timetable: Timetable = serde_json::from_str(raw).unwrap();

        assert_eq!(timetable.mon[0].start, hm(8, 30));
        assert_eq!(
            timetable.mon[0].end,
            NaiveTime::from_hms_opt(17, 45, 30).unwrap()
        );
        assert!(timetable.tue.is_empty());

        let written = serde_json::to_value(&timetable).unwrap();
        assert_eq!(written["mon"][0]["start"], "08:30:00");
    }

    #[test]
    fn test_bad_time_is_rejected() {
        let raw = r#"{"mon": [{"start": "25:00", "end": "26:00"}]}"#;
        assert!(serde_json::from_str::<Timetable>(raw).is_err());
    }
}
