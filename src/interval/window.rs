use crate::interval::codec::{format_interval, DurationParts, Interval};
use crate::interval::error::IntervalError;
use crate::types::into_instant::IntoInstant;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// One uniform reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    /// The `validTime` text of an aggregated point, e.g. `2021-07-08T01:00:00+00:00/PT24H`.
    pub fn interval_text(&self) -> String {
        format_interval(self.start, &DurationParts::from_duration(self.end - self.start))
    }
}

/// Builds contiguous windows of `periodicity_hours` each, starting at `start`.
///
/// A new window is opened as long as its start is before `end`, so the last window may reach
/// past `end`; it is not truncated.
///
/// # Errors
///
/// Returns [`IntervalError::InvalidPeriodicity`] when `periodicity_hours` is zero.
pub fn generate_windows(
    start: impl IntoInstant,
    end: impl IntoInstant,
    periodicity_hours: u32,
) -> Result<Vec<Window>, IntervalError> {
    if periodicity_hours == 0 {
        return Err(IntervalError::InvalidPeriodicity(periodicity_hours));
    }
    let start = start.into_instant();
    let end = end.into_instant();
    let step = Duration::try_hours(periodicity_hours.into())
        .ok_or(IntervalError::InvalidPeriodicity(periodicity_hours))?;

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let next = cursor
            .checked_add_signed(step)
            .ok_or_else(|| IntervalError::OutOfRange(cursor.to_rfc3339()))?;
        windows.push(Window {
            start: cursor,
            end: next,
        });
        cursor = next;
    }
    Ok(windows)
}
