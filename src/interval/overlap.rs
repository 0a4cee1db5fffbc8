use crate::interval::codec::Interval;
use crate::interval::window::Window;
use crate::types::sample::Sample;

/// How a sample interval relates to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapRelation {
    /// Starts inside `[window.start, window.end)`.
    StartsWithin,
    /// Ends inside `(window.start, window.end]`.
    EndsWithin,
    /// Lies entirely inside the window.
    ContainedBy,
    /// Covers the whole window.
    Contains,
}

impl Interval {
    /// The first relation that holds between this interval and `window`, if any.
    pub fn overlap_with(&self, window: &Window) -> Option<OverlapRelation> {
        if self.start >= window.start && self.start < window.end {
            Some(OverlapRelation::StartsWithin)
        } else if self.end > window.start && self.end <= window.end {
            Some(OverlapRelation::EndsWithin)
        } else if self.start >= window.start && self.end <= window.end {
            Some(OverlapRelation::ContainedBy)
        } else if self.start <= window.start && self.end >= window.end {
            Some(OverlapRelation::Contains)
        } else {
            None
        }
    }

    pub fn overlaps(&self, window: &Window) -> bool {
        self.overlap_with(window).is_some()
    }
}

/// Samples relating to `window`, in sample order.
///
/// `samples` must be sorted by start; scanning stops at the first sample that starts after the
/// window ends.
pub fn select_overlapping<'a>(window: &Window, samples: &'a [Sample]) -> Vec<&'a Sample> {
    samples
        .iter()
        .take_while(|sample| sample.interval.start <= window.end)
        .filter(|sample| sample.interval.overlaps(window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample::SampleValue;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 5, 12, hour, minute, 0).unwrap()
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> Window {
        Window { start, end }
    }

    fn sample(start: DateTime<Utc>, end: DateTime<Utc>, value: f64) -> Sample {
        Sample::new(
            Interval::new(start, end).unwrap(),
            Some(SampleValue::Number(value)),
        )
    }

    #[test]
    fn test_hour_sample_against_partial_windows() {
        let interval = Interval::new(at(10, 0), at(11, 0)).unwrap();

        assert_eq!(
            interval.overlap_with(&window(at(9, 0), at(10, 30))),
            Some(OverlapRelation::StartsWithin)
        );
        assert_eq!(
            interval.overlap_with(&window(at(10, 15), at(10, 45))),
            Some(OverlapRelation::Contains)
        );
        assert_eq!(interval.overlap_with(&window(at(11, 0), at(12, 0))), None);
    }

    #[test]
    fn test_each_relation() {
        let w = window(at(10, 0), at(12, 0));
        let ends_within = Interval::new(at(9, 0), at(11, 0)).unwrap();
        let contains = Interval::new(at(9, 0), at(13, 0)).unwrap();
        let contained = Interval::new(at(10, 30), at(11, 0)).unwrap();
        let before = Interval::new(at(8, 0), at(10, 0)).unwrap();

        assert_eq!(ends_within.overlap_with(&w), Some(OverlapRelation::EndsWithin));
        assert_eq!(contains.overlap_with(&w), Some(OverlapRelation::Contains));
        // Starting inside is checked first.
        assert_eq!(contained.overlap_with(&w), Some(OverlapRelation::StartsWithin));
        assert_eq!(before.overlap_with(&w), None);
    }

    #[test]
    fn test_point_sample_at_window_end_is_shared() {
        let point = Interval::point(at(12, 0));
        let first = window(at(10, 0), at(12, 0));
        let second = window(at(12, 0), at(14, 0));

        assert_eq!(point.overlap_with(&first), Some(OverlapRelation::EndsWithin));
        assert_eq!(point.overlap_with(&second), Some(OverlapRelation::StartsWithin));
    }

    #[test]
    fn test_point_sample_at_window_start() {
        let point = Interval::point(at(10, 0));
        assert_eq!(
            point.overlap_with(&window(at(10, 0), at(12, 0))),
            Some(OverlapRelation::StartsWithin)
        );
        assert_eq!(point.overlap_with(&window(at(8, 0), at(10, 0))), Some(OverlapRelation::EndsWithin));
    }

    #[test]
    fn test_select_keeps_sample_order() {
        let samples = vec![
            sample(at(6, 0), at(9, 0), 1.0),
            sample(at(9, 0), at(10, 0), 2.0),
            sample(at(10, 0), at(11, 0), 3.0),
            sample(at(11, 0), at(14, 0), 4.0),
            sample(at(14, 0), at(15, 0), 5.0),
        ];
        let selected = select_overlapping(&window(at(9, 30), at(12, 0)), &samples);
        let values: Vec<f64> = selected
            .iter()
            .filter_map(|s| s.value.as_ref().and_then(SampleValue::as_number))
            .collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_select_from_empty() {
        assert!(select_overlapping(&window(at(9, 0), at(10, 0)), &[]).is_empty());
    }
}
