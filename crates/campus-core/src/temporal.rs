//! Date and time pattern types (RFC 3339 section 5.6 subset).
//!
//! Each type keeps its canonical string and the parsed `chrono` value it
//! decomposes into. Values are immutable; `replace` returns a new instance.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use regex::Regex;

use crate::{
  error::PatternError,
  pattern::{
    PatternType, anchored, component, grammar, mismatch, string_impls,
  },
};

fn date_grammar() -> String {
  format!("{}-{}-{}", grammar::YEAR, grammar::MONTH, grammar::DAY)
}

fn time_grammar() -> String {
  format!("{}:{}:{}", grammar::HOUR, grammar::MINUTE, grammar::SECOND)
}

/// The bytes of `raw` at `range`; empty if out of bounds. Temporal grammars
/// are fixed-width ASCII, so components sit at fixed offsets once the
/// pattern has matched.
fn slice(raw: &str, range: std::ops::Range<usize>) -> &str { raw.get(range).unwrap_or("") }

/// Parse a run of digits. The grammar guarantees digits, so a
/// failure here is reported as out of range.
fn number<T: PatternType, N: std::str::FromStr<Err = std::num::ParseIntError>>(
  raw: &str,
  component: &str,
  digits: &str,
) -> Result<N, PatternError> {
  digits.parse().map_err(|error| PatternError::OutOfRange {
    type_name: T::TYPE_NAME,
    value:     raw.to_owned(),
    reason:    format!("{component}: {error}"),
  })
}

// ─── Date ────────────────────────────────────────────────────────────────────

/// A calendar date, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
  raw:   String,
  naive: NaiveDate,
}

/// Components to change in [`Date::replace`]; `None` keeps the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateParts {
  pub year:  Option<i32>,
  pub month: Option<u32>,
  pub day:   Option<u32>,
}

impl Date {
  pub fn year(&self) -> i32 { self.naive.year() }

  pub fn month(&self) -> u32 { self.naive.month() }

  pub fn day(&self) -> u32 { self.naive.day() }

  /// 0 for Monday through 6 for Sunday.
  pub fn weekday(&self) -> u32 { self.naive.weekday().num_days_from_monday() }

  /// 1 for Monday through 7 for Sunday.
  pub fn isoweekday(&self) -> u32 { self.naive.weekday().number_from_monday() }

  /// ISO year and week number.
  pub fn isocalendar(&self) -> (i32, u32) {
    let week = self.naive.iso_week();
    (week.year(), week.week())
  }

  pub fn to_naive(&self) -> NaiveDate { self.naive }

  pub fn replace(&self, parts: DateParts) -> Result<Self, PatternError> {
    let year = parts.year.unwrap_or(self.year());
    let month = parts.month.unwrap_or(self.month());
    let day = parts.day.unwrap_or(self.day());
    Self::construct(&format!("{year:04}-{month:02}-{day:02}"))
  }

  fn parse(raw: &str) -> Result<NaiveDate, PatternError> {
    if !Self::pattern().is_match(raw) {
      return Err(mismatch::<Self>(raw));
    }
    let year = number::<Self, i32>(raw, "year", slice(raw, 0..4))?;
    let month = number::<Self, u32>(raw, "month", slice(raw, 5..7))?;
    let day = number::<Self, u32>(raw, "day", slice(raw, 8..10))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| PatternError::OutOfRange {
      type_name: Self::TYPE_NAME,
      value:     raw.to_owned(),
      reason:    "not a calendar date".into(),
    })
  }
}

impl PatternType for Date {
  const FORMAT: Option<&'static str> = Some("date");
  const TYPE_NAME: &'static str = "Date";

  fn pattern() -> &'static Regex {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
      anchored(&date_grammar())
    });
    &PATTERN
  }

  fn validate(raw: &str) -> Result<(), PatternError> { Self::parse(raw).map(|_| ()) }

  fn construct(raw: &str) -> Result<Self, PatternError> {
    let naive = Self::parse(raw)?;
    Ok(Self { raw: raw.to_owned(), naive })
  }

  fn as_str(&self) -> &str { &self.raw }
}

string_impls!(Date);

// ─── Time ────────────────────────────────────────────────────────────────────

/// A time of day, `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
  raw:   String,
  naive: NaiveTime,
}

/// Components to change in [`Time::replace`]; `None` keeps the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeParts {
  pub hour:   Option<u32>,
  pub minute: Option<u32>,
  pub second: Option<u32>,
}

impl Time {
  pub fn hour(&self) -> u32 { self.naive.hour() }

  pub fn minute(&self) -> u32 { self.naive.minute() }

  pub fn second(&self) -> u32 { self.naive.second() }

  pub fn to_naive(&self) -> NaiveTime { self.naive }

  /// ISO 8601 form, which is the canonical string.
  pub fn isoformat(&self) -> &str { &self.raw }

  pub fn replace(&self, parts: TimeParts) -> Result<Self, PatternError> {
    let hour = parts.hour.unwrap_or(self.hour());
    let minute = parts.minute.unwrap_or(self.minute());
    let second = parts.second.unwrap_or(self.second());
    Self::construct(&format!("{hour:02}:{minute:02}:{second:02}"))
  }

  fn parse(raw: &str) -> Result<NaiveTime, PatternError> {
    if !Self::pattern().is_match(raw) {
      return Err(mismatch::<Self>(raw));
    }
    let hour = number::<Self, u32>(raw, "hour", slice(raw, 0..2))?;
    let minute = number::<Self, u32>(raw, "minute", slice(raw, 3..5))?;
    let second = number::<Self, u32>(raw, "second", slice(raw, 6..8))?;
    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
      PatternError::OutOfRange {
        type_name: Self::TYPE_NAME,
        value:     raw.to_owned(),
        reason:    "not a time of day".into(),
      }
    })
  }
}

impl PatternType for Time {
  const FORMAT: Option<&'static str> = Some("time");
  const TYPE_NAME: &'static str = "Time";

  fn pattern() -> &'static Regex {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
      anchored(&time_grammar())
    });
    &PATTERN
  }

  fn validate(raw: &str) -> Result<(), PatternError> { Self::parse(raw).map(|_| ()) }

  fn construct(raw: &str) -> Result<Self, PatternError> {
    let naive = Self::parse(raw)?;
    Ok(Self { raw: raw.to_owned(), naive })
  }

  fn as_str(&self) -> &str { &self.raw }
}

string_impls!(Time);

// ─── Datetime ────────────────────────────────────────────────────────────────

/// A UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`, decomposed into a [`Date`] and a
/// [`Time`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datetime {
  raw:  String,
  date: Date,
  time: Time,
}

/// Components to change in [`Datetime::replace`]; `None` keeps the current
/// one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatetimeParts {
  pub year:   Option<i32>,
  pub month:  Option<u32>,
  pub day:    Option<u32>,
  pub hour:   Option<u32>,
  pub minute: Option<u32>,
  pub second: Option<u32>,
}

impl Datetime {
  pub fn date(&self) -> &Date { &self.date }

  pub fn time(&self) -> &Time { &self.time }

  pub fn year(&self) -> i32 { self.date.year() }

  pub fn month(&self) -> u32 { self.date.month() }

  pub fn day(&self) -> u32 { self.date.day() }

  pub fn hour(&self) -> u32 { self.time.hour() }

  pub fn minute(&self) -> u32 { self.time.minute() }

  pub fn second(&self) -> u32 { self.time.second() }

  pub fn weekday(&self) -> u32 { self.date.weekday() }

  pub fn isoweekday(&self) -> u32 { self.date.isoweekday() }

  pub fn isocalendar(&self) -> (i32, u32) { self.date.isocalendar() }

  pub fn to_chrono(&self) -> DateTime<Utc> {
    self.date.to_naive().and_time(self.time.to_naive()).and_utc()
  }

  /// Truncates to whole seconds. Fails for years outside `0000..=9999`.
  pub fn from_chrono(value: DateTime<Utc>) -> Result<Self, PatternError> {
    Self::construct(&value.format("%Y-%m-%dT%H:%M:%SZ").to_string())
  }

  pub fn replace(&self, parts: DatetimeParts) -> Result<Self, PatternError> {
    let year = parts.year.unwrap_or(self.year());
    let month = parts.month.unwrap_or(self.month());
    let day = parts.day.unwrap_or(self.day());
    let hour = parts.hour.unwrap_or(self.hour());
    let minute = parts.minute.unwrap_or(self.minute());
    let second = parts.second.unwrap_or(self.second());
    Self::construct(&format!(
      "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z"
    ))
  }
}

impl PatternType for Datetime {
  const FORMAT: Option<&'static str> = Some("date-time");
  const TYPE_NAME: &'static str = "Datetime";

  fn pattern() -> &'static Regex {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
      anchored(&format!("{}T{}Z", date_grammar(), time_grammar()))
    });
    &PATTERN
  }

  fn validate(raw: &str) -> Result<(), PatternError> {
    if !Self::pattern().is_match(raw) {
      return Err(mismatch::<Self>(raw));
    }
    let part_error = |component, source| PatternError::Component {
      type_name: Self::TYPE_NAME,
      component,
      value: raw.to_owned(),
      source: Box::new(source),
    };
    Date::validate(slice(raw, 0..10)).map_err(|source| part_error("date", source))?;
    Time::validate(slice(raw, 11..19)).map_err(|source| part_error("time", source))
  }

  fn construct(raw: &str) -> Result<Self, PatternError> {
    if !Self::pattern().is_match(raw) {
      return Err(mismatch::<Self>(raw));
    }
    Ok(Self {
      raw:  raw.to_owned(),
      date: component::<Self, _>(raw, "date", slice(raw, 0..10))?,
      time: component::<Self, _>(raw, "time", slice(raw, 11..19))?,
    })
  }

  fn as_str(&self) -> &str { &self.raw }
}

string_impls!(Datetime);

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn date_decomposes() {
    let date = Date::construct("2024-02-29").unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));
    assert_eq!(date.weekday(), 3);
    assert_eq!(date.isoweekday(), 4);
  }

  #[test]
  fn date_grammar_and_calendar() {
    let rejected = [
      "",
      "2024-1-01",
      "2024-13-01",
      "2024-00-10",
      "2024-01-32",
      "24-01-01",
      "2024/01/01",
    ];
    for raw in rejected {
      assert!(Date::validate(raw).is_err(), "{raw:?}");
      assert!(Date::construct(raw).is_err(), "{raw:?}");
    }
    // Matches the grammar but is not a real date.
    assert!(matches!(
      Date::construct("2023-02-29"),
      Err(PatternError::OutOfRange { .. })
    ));
    assert!(Date::validate("2023-02-29").is_err());
  }

  #[test]
  fn date_replace_returns_new_instance() {
    let date = Date::construct("2024-01-31").unwrap();
    let moved = date.replace(DateParts { year: Some(2025), ..Default::default() }).unwrap();
    assert_eq!(moved.as_str(), "2025-01-31");
    assert_eq!(date.as_str(), "2024-01-31");
    assert!(date.replace(DateParts { month: Some(2), ..Default::default() }).is_err());
    assert!(date.replace(DateParts { year: Some(10_000), ..Default::default() }).is_err());
  }

  #[test]
  fn time_decomposes_and_replaces() {
    let time = Time::construct("23:59:07").unwrap();
    assert_eq!((time.hour(), time.minute(), time.second()), (23, 59, 7));
    let noon = time
      .replace(TimeParts { hour: Some(12), minute: Some(0), second: Some(0) })
      .unwrap();
    assert_eq!(noon.isoformat(), "12:00:00");
    assert!(time.replace(TimeParts { hour: Some(24), ..Default::default() }).is_err());
    for raw in ["", "24:00:00", "12:60:00", "12:00:60", "12:00", "1:00:00"] {
      assert!(Time::validate(raw).is_err(), "{raw:?}");
      assert!(Time::construct(raw).is_err(), "{raw:?}");
    }
  }

  #[test]
  fn datetime_decomposes() {
    let ts = Datetime::construct("2023-10-01T12:34:56Z").unwrap();
    assert_eq!(ts.date().as_str(), "2023-10-01");
    assert_eq!(ts.time().as_str(), "12:34:56");
    assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 10, 1));
    assert_eq!((ts.hour(), ts.minute(), ts.second()), (12, 34, 56));
    assert_eq!(ts.isoweekday(), 7);
    assert_eq!(ts.isocalendar(), (2023, 39));
    assert_eq!(ts.to_chrono(), Utc.with_ymd_and_hms(2023, 10, 1, 12, 34, 56).unwrap());
  }

  #[test]
  fn datetime_grammar() {
    let rejected = [
      "",
      "2023-10-01 12:34:56Z",
      "2023-10-01T12:34:56",
      "2023-10-01T12:34:56+00:00",
      "2023-10-01t12:34:56z",
    ];
    for raw in rejected {
      assert!(Datetime::validate(raw).is_err(), "{raw:?}");
      assert!(Datetime::construct(raw).is_err(), "{raw:?}");
    }
    let Err(PatternError::Component { component, .. }) =
      Datetime::construct("2023-02-30T00:00:00Z")
    else {
      panic!("expected the date component to fail");
    };
    assert_eq!(component, "date");
    assert!(Datetime::validate("2023-02-30T00:00:00Z").is_err());
  }

  #[test]
  fn validate_and_construct_agree_on_fixed_offsets() {
    let samples = [
      "2024-02-29T23:59:59Z",
      "2023-02-29T00:00:00Z",
      "2024-04-31T10:00:00Z",
      "2024-12-31T00:00:00Z",
      "0000-01-01T00:00:00Z",
    ];
    for raw in samples {
      assert_eq!(Datetime::validate(raw).is_ok(), Datetime::construct(raw).is_ok(), "{raw:?}");
    }
    let ts = Datetime::construct("2024-02-29T23:59:59Z").unwrap();
    assert_eq!((ts.date().day(), ts.time().second()), (29, 59));
    for schema in [Date::json_schema(), Time::json_schema(), Datetime::json_schema()] {
      assert!(!schema["pattern"].as_str().unwrap().contains("(?P<"));
    }
    assert_eq!(Datetime::json_schema()["format"], "date-time");
  }

  #[test]
  fn datetime_replace_and_chrono_round_trip() {
    let ts = Datetime::construct("2024-01-01T00:00:00Z").unwrap();
    let later = ts
      .replace(DatetimeParts { month: Some(6), hour: Some(18), ..Default::default() })
      .unwrap();
    assert_eq!(later.as_str(), "2024-06-01T18:00:00Z");
    assert_eq!(Datetime::from_chrono(later.to_chrono()).unwrap(), later);
  }
}
