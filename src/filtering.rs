use crate::interval::error::IntervalError;
use crate::interval::window::{generate_windows, Window};
use bon::Builder;
use chrono::{DateTime, Duration, Utc};

/// Window span used when no end is given.
pub const DEFAULT_SPAN_DAYS: i64 = 7;
/// Window width used when no periodicity is given.
pub const DEFAULT_PERIODICITY_HOURS: u32 = 24;

/// What to aggregate: the span, the window width and the elements. Unset fields fall back to
/// "now", seven days after now, daily windows and every element in the dataset.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use threat_matrix::AggregationFilters;
///
/// let filters = AggregationFilters::builder()
///     .start(Utc.with_ymd_and_hms(2021, 7, 8, 1, 0, 0).unwrap())
///     .periodicity_hours(6)
///     .elements(vec!["temperature".to_string()])
///     .build();
/// assert_eq!(filters.periodicity_hours, Some(6));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct AggregationFilters {
    #[builder(into)]
    pub start: Option<DateTime<Utc>>,
    #[builder(into)]
    pub end: Option<DateTime<Utc>>,
    pub periodicity_hours: Option<u32>,
    pub elements: Option<Vec<String>>,
}

/// Filters with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilters {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub periodicity_hours: u32,
    pub elements: Option<Vec<String>>,
}

impl AggregationFilters {
    /// Fills in defaults relative to `now`. Both the default start and the default end are
    /// measured from `now`, so an explicit start alone does not move the end.
    ///
    /// # Errors
    ///
    /// [`IntervalError::OutOfRange`] when the default end does not fit in the supported range.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<ResolvedFilters, IntervalError> {
        let start = self.start.unwrap_or(now);
        let end = match self.end {
            Some(end) => end,
            None => Duration::try_days(DEFAULT_SPAN_DAYS)
                .and_then(|span| now.checked_add_signed(span))
                .ok_or_else(|| IntervalError::OutOfRange(now.to_rfc3339()))?,
        };
        Ok(ResolvedFilters {
            start,
            end,
            periodicity_hours: self.periodicity_hours.unwrap_or(DEFAULT_PERIODICITY_HOURS),
            elements: self.elements.clone(),
        })
    }
}

impl ResolvedFilters {
    pub fn windows(&self) -> Result<Vec<Window>, IntervalError> {
        generate_windows(self.start, self.end, self.periodicity_hours)
    }
}
