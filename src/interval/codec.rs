//! Parsing and synthesis of `<instant>/<duration>` interval strings, the format the NWS grid
//! API uses for every `validTime` (e.g. `2021-05-27T19:00:00+00:00/PT1H`).

use crate::interval::error::IntervalError;
use crate::types::into_instant::IntoInstant;
use chrono::{DateTime, Days, Duration, FixedOffset, Months, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The span of time a sample is valid for.
///
/// `end` is never before `start`. A zero-length interval is an instantaneous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: impl IntoInstant, end: impl IntoInstant) -> Result<Self, IntervalError> {
        let start = start.into_instant();
        let end = end.into_instant();
        if end < start {
            return Err(IntervalError::Inverted {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn point(at: impl IntoInstant) -> Self {
        let at = at.into_instant();
        Self { start: at, end: at }
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Parses `<instant>[/<duration>]`.
    ///
    /// The instant must be RFC 3339 with a numeric offset (`+00:00`, not `Z`). The duration is
    /// `P[nY][nM][nD][T[nH][nM][nS]]`; its fields are added to the start one at a time, largest
    /// first, in the instant's own offset. Month and year steps clamp to the last day of the
    /// target month, so `2021-01-31T00:00:00+00:00/P1M` ends on February 28th.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError::MalformedInterval`] if either half does not parse, and
    /// [`IntervalError::OutOfRange`] if the end falls outside chrono's representable range.
    ///
    /// # Examples
    ///
    /// ```
    /// use threat_matrix::Interval;
    ///
    /// let interval = Interval::parse("2021-05-12T14:00:00+00:00/PT6H").unwrap();
    /// assert_eq!(interval.duration().num_hours(), 6);
    /// ```
    pub fn parse(text: &str) -> Result<Self, IntervalError> {
        let (instant_text, duration_text) = match text.split_once('/') {
            Some((instant, duration)) => (instant, Some(duration)),
            None => (text, None),
        };

        let start = parse_instant(text, instant_text)?;
        let duration = match duration_text {
            Some(duration) => duration
                .parse::<DurationParts>()
                .map_err(|reason| IntervalError::malformed(text, reason))?,
            None => DurationParts::default(),
        };
        let end = duration
            .add_to(start)
            .ok_or_else(|| IntervalError::OutOfRange(text.to_string()))?;

        Ok(Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        })
    }

    /// Formats the interval as `<start>/PT..` using whole hours, minutes and seconds.
    pub fn to_text(&self) -> String {
        format_interval(self.start, &DurationParts::from_duration(self.duration()))
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::parse(s)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

fn parse_instant(text: &str, instant: &str) -> Result<DateTime<FixedOffset>, IntervalError> {
    if instant.ends_with(['Z', 'z']) {
        return Err(IntervalError::malformed(
            text,
            "instant must carry a numeric UTC offset such as +00:00",
        ));
    }
    DateTime::parse_from_rfc3339(instant)
        .map_err(|e| IntervalError::malformed(text, format!("invalid instant: {e}")))
}

/// A structured ISO 8601 duration. `None` and zero both mean "field omitted".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DurationParts {
    pub years: Option<u32>,
    pub months: Option<u32>,
    pub days: Option<u32>,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
}

impl DurationParts {
    pub fn hours(hours: u32) -> Self {
        Self {
            hours: Some(hours),
            ..Self::default()
        }
    }

    pub fn days(days: u32) -> Self {
        Self {
            days: Some(days),
            ..Self::default()
        }
    }

    /// Splits an exact span into hours, minutes and seconds. Sub-second remainders and
    /// negative spans are dropped.
    pub fn from_duration(duration: Duration) -> Self {
        let total = duration.num_seconds().max(0);
        let clamp = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
        Self {
            hours: Some(clamp(total / 3600)),
            minutes: Some(clamp(total % 3600 / 60)),
            seconds: Some(clamp(total % 60)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date_fields().iter().chain(self.time_fields().iter()).all(|(_, v)| v.is_none())
    }

    fn date_fields(&self) -> [(char, Option<u32>); 3] {
        [
            ('Y', nonzero(self.years)),
            ('M', nonzero(self.months)),
            ('D', nonzero(self.days)),
        ]
    }

    fn time_fields(&self) -> [(char, Option<u32>); 3] {
        [
            ('H', nonzero(self.hours)),
            ('M', nonzero(self.minutes)),
            ('S', nonzero(self.seconds)),
        ]
    }

    /// Adds the duration to `start` field by field, year first.
    pub fn add_to(&self, start: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let mut end = start;
        if let Some(years) = nonzero(self.years) {
            end = end.checked_add_months(Months::new(years.checked_mul(12)?))?;
        }
        if let Some(months) = nonzero(self.months) {
            end = end.checked_add_months(Months::new(months))?;
        }
        if let Some(days) = nonzero(self.days) {
            end = end.checked_add_days(Days::new(days.into()))?;
        }
        if let Some(hours) = nonzero(self.hours) {
            end = end.checked_add_signed(Duration::try_hours(hours.into())?)?;
        }
        if let Some(minutes) = nonzero(self.minutes) {
            end = end.checked_add_signed(Duration::try_minutes(minutes.into())?)?;
        }
        if let Some(seconds) = nonzero(self.seconds) {
            end = end.checked_add_signed(Duration::try_seconds(seconds.into())?)?;
        }
        Some(end)
    }
}

fn nonzero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}

/// Renders the `P..` form, or an empty string when no field is set.
impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str("P")?;
        for (designator, value) in self.date_fields() {
            if let Some(value) = value {
                write!(f, "{value}{designator}")?;
            }
        }
        let time_fields = self.time_fields();
        if time_fields.iter().any(|(_, v)| v.is_some()) {
            f.write_str("T")?;
            for (designator, value) in time_fields {
                if let Some(value) = value {
                    write!(f, "{value}{designator}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for DurationParts {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('P')
            .ok_or_else(|| format!("duration '{s}' must start with 'P'"))?;
        let (date_segment, time_segment) = match rest.split_once('T') {
            Some((_, "")) => {
                return Err(format!(
                    "duration '{s}' has a 'T' designator without hour, minute or second fields"
                ))
            }
            Some((date, time)) => (date, time),
            None => (rest, ""),
        };

        let mut parts = DurationParts::default();
        for (designator, value) in parse_fields(date_segment, &['Y', 'M', 'D'])? {
            match designator {
                'Y' => parts.years = Some(value),
                'M' => parts.months = Some(value),
                _ => parts.days = Some(value),
            }
        }
        for (designator, value) in parse_fields(time_segment, &['H', 'M', 'S'])? {
            match designator {
                'H' => parts.hours = Some(value),
                'M' => parts.minutes = Some(value),
                _ => parts.seconds = Some(value),
            }
        }
        Ok(parts)
    }
}

/// Reads `<digits><designator>` pairs, requiring designators in the given order.
fn parse_fields(segment: &str, designators: &[char]) -> Result<Vec<(char, u32)>, String> {
    let mut fields = Vec::new();
    let mut next_allowed = 0;
    let mut digits = String::new();

    for c in segment.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let position = designators[next_allowed..]
            .iter()
            .position(|d| *d == c)
            .map(|p| p + next_allowed)
            .ok_or_else(|| format!("unexpected '{c}' in duration"))?;
        if digits.is_empty() {
            return Err(format!("missing number before '{c}'"));
        }
        let value = digits
            .parse::<u32>()
            .map_err(|_| format!("number '{digits}' before '{c}' is too large"))?;
        fields.push((c, value));
        digits.clear();
        next_allowed = position + 1;
    }

    if !digits.is_empty() {
        return Err(format!("number '{digits}' has no designator"));
    }
    Ok(fields)
}

/// Synthesizes `<instant>+00:00[/<duration>]` from an instant and a duration.
///
/// Sub-second precision is dropped. A duration with no set fields yields the bare instant.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use threat_matrix::{format_interval, DurationParts};
///
/// let start = Utc.with_ymd_and_hms(2021, 7, 8, 1, 0, 0).unwrap();
/// assert_eq!(
///     format_interval(start, &DurationParts::hours(24)),
///     "2021-07-08T01:00:00+00:00/PT24H"
/// );
/// assert_eq!(
///     format_interval(start, &DurationParts::default()),
///     "2021-07-08T01:00:00+00:00"
/// );
/// ```
pub fn format_interval(start: impl IntoInstant, duration: &DurationParts) -> String {
    let instant = start
        .into_instant()
        .to_rfc3339_opts(SecondsFormat::Secs, false);
    if duration.is_empty() {
        instant
    } else {
        format!("{instant}/{duration}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_hourly_interval() {
        let interval = Interval::parse("2021-05-27T19:00:00+00:00/PT1H").unwrap();
        assert_eq!(interval.start, utc(2021, 5, 27, 19, 0, 0));
        assert_eq!(interval.end, utc(2021, 5, 27, 20, 0, 0));
    }

    #[test]
    fn test_parse_multi_field_duration() {
        let interval = Interval::parse("2021-05-12T14:00:00+00:00/P7DT22H").unwrap();
        assert_eq!(interval.end, utc(2021, 5, 20, 12, 0, 0));

        let interval = Interval::parse("2020-01-01T00:00:00+00:00/P1Y2M3DT4H5M6S").unwrap();
        assert_eq!(interval.end, utc(2021, 3, 4, 4, 5, 6));
    }

    #[test]
    fn test_parse_without_duration_is_a_point() {
        let interval = Interval::parse("2021-05-12T14:00:00+00:00").unwrap();
        assert!(interval.is_point());

        let interval = Interval::parse("2021-05-12T14:00:00+00:00/P").unwrap();
        assert!(interval.is_point(), "a bare 'P' is a zero-length duration");

        let interval = Interval::parse("2021-05-12T14:00:00+00:00/PT0H").unwrap();
        assert!(interval.is_point());
    }

    #[test]
    fn test_parse_keeps_the_instant_offset() {
        let interval = Interval::parse("2021-05-12T08:00:00-06:00/PT1H").unwrap();
        assert_eq!(interval.start, utc(2021, 5, 12, 14, 0, 0));
        assert_eq!(interval.end, utc(2021, 5, 12, 15, 0, 0));
    }

    #[test]
    fn test_month_addition_clamps_to_shorter_month() {
        let interval = Interval::parse("2021-01-31T00:00:00+00:00/P1M").unwrap();
        assert_eq!(interval.end, utc(2021, 2, 28, 0, 0, 0));

        // 31-day month into a 30-day month
        let interval = Interval::parse("2021-03-31T12:00:00+00:00/P1M").unwrap();
        assert_eq!(interval.end, utc(2021, 4, 30, 12, 0, 0));

        let interval = Interval::parse("2020-02-29T00:00:00+00:00/P1Y").unwrap();
        assert_eq!(interval.end, utc(2021, 2, 28, 0, 0, 0));
    }

    #[test]
    fn test_day_and_year_rollover() {
        let interval = Interval::parse("2021-12-31T23:00:00+00:00/PT2H").unwrap();
        assert_eq!(interval.end, utc(2022, 1, 1, 1, 0, 0));

        let interval = Interval::parse("2021-12-31T12:00:00+00:00/P1D").unwrap();
        assert_eq!(interval.end, utc(2022, 1, 1, 12, 0, 0));
    }

    #[test]
    fn test_day_across_daylight_saving_change_is_24_hours() {
        // US DST began 2021-03-14; a fixed offset keeps days exactly 24h long.
        let interval = Interval::parse("2021-03-13T12:00:00-07:00/P1D").unwrap();
        assert_eq!(interval.duration(), Duration::hours(24));
        assert_eq!(interval.end, utc(2021, 3, 14, 19, 0, 0));
    }

    #[test]
    fn test_minutes_and_months_share_a_designator() {
        let interval = Interval::parse("2021-01-01T00:00:00+00:00/P1MT1M").unwrap();
        assert_eq!(interval.end, utc(2021, 2, 1, 0, 1, 0));
    }

    #[test]
    fn test_malformed_intervals() {
        let bad = [
            "",
            "not a date/PT1H",
            "2021-05-12T14:00:00Z/PT1H",
            "2021-05-12T14:00:00+00:00/T1H",
            "2021-05-12T14:00:00+00:00/PT",
            "2021-05-12T14:00:00+00:00/P1H",
            "2021-05-12T14:00:00+00:00/PT1D",
            "2021-05-12T14:00:00+00:00/PTH",
            "2021-05-12T14:00:00+00:00/PT1",
            "2021-05-12T14:00:00+00:00/P1D1Y",
            "2021-05-12T14:00:00+00:00/P99999999999D",
        ];
        for text in bad {
            let result = Interval::parse(text);
            assert!(
                matches!(result, Err(IntervalError::MalformedInterval { .. })),
                "expected '{text}' to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_format_omits_zero_and_missing_fields() {
        let start = utc(2021, 7, 8, 1, 0, 0);
        let parts = DurationParts {
            days: Some(1),
            hours: Some(0),
            minutes: Some(30),
            ..DurationParts::default()
        };
        assert_eq!(
            format_interval(start, &parts),
            "2021-07-08T01:00:00+00:00/P1DT30M"
        );
        assert_eq!(
            format_interval(start, &DurationParts::days(2)),
            "2021-07-08T01:00:00+00:00/P2D"
        );
    }

    #[test]
    fn test_format_drops_sub_seconds() {
        let start = utc(2021, 7, 8, 1, 0, 0) + Duration::milliseconds(250);
        assert_eq!(
            format_interval(start, &DurationParts::hours(1)),
            "2021-07-08T01:00:00+00:00/PT1H"
        );
    }

    #[test]
    fn test_round_trip() {
        let starts = [
            utc(2021, 5, 12, 14, 0, 0),
            utc(2020, 2, 29, 23, 59, 59),
            utc(1999, 12, 31, 0, 0, 0),
            utc(2021, 1, 31, 12, 0, 0),
            utc(2021, 8, 31, 6, 30, 0),
        ];
        let durations = [
            DurationParts {
                months: Some(1),
                ..DurationParts::default()
            },
            DurationParts {
                years: Some(1),
                months: Some(2),
                ..DurationParts::default()
            },
            DurationParts {
                years: Some(2),
                months: Some(13),
                days: Some(1),
                hours: Some(1),
                ..DurationParts::default()
            },
            DurationParts::hours(1),
            DurationParts::hours(24),
            DurationParts::days(3),
            DurationParts {
                days: Some(1),
                hours: Some(6),
                minutes: Some(15),
                seconds: Some(5),
                ..DurationParts::default()
            },
            DurationParts::default(),
        ];
        for start in starts {
            for duration in &durations {
                let text = format_interval(start, duration);
                let parsed = Interval::parse(&text).unwrap();
                let expected_end = duration.add_to(start.fixed_offset()).unwrap();
                assert_eq!(parsed.start, start, "start of {text}");
                assert_eq!(parsed.end, expected_end, "end of {text}");
            }
        }

        let calendar = [
            ("2021-01-31T12:00:00+00:00/P1M", utc(2021, 2, 28, 12, 0, 0)),
            ("2021-08-31T06:30:00+00:00/P1M", utc(2021, 9, 30, 6, 30, 0)),
            ("2020-02-29T23:59:59+00:00/P1Y2M", utc(2021, 4, 28, 23, 59, 59)),
            ("2021-01-31T12:00:00+00:00/P1Y2M", utc(2022, 3, 31, 12, 0, 0)),
        ];
        for (text, end) in calendar {
            assert_eq!(Interval::parse(text).unwrap().end, end, "end of {text}");
        }
    }

    #[test]
    fn test_interval_text_uses_exact_span() {
        let interval = Interval::new(utc(2021, 5, 12, 14, 0, 0), utc(2021, 5, 20, 12, 30, 0)).unwrap();
        assert_eq!(interval.to_text(), "2021-05-12T14:00:00+00:00/PT190H30M");
        assert_eq!(Interval::parse(&interval.to_text()).unwrap(), interval);
    }

    #[test]
    fn test_inverted_interval_is_rejected() {
        let result = Interval::new(utc(2021, 5, 12, 14, 0, 0), utc(2021, 5, 12, 13, 0, 0));
        assert!(matches!(result, Err(IntervalError::Inverted { .. })));
    }
}
