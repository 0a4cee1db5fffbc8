use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use std::time::SystemTime;

/// Anything that names an absolute instant.
///
/// Window spans and filters accept `impl IntoInstant` so callers can hand over whatever
/// datetime flavour their feed produced. Naive datetimes are read as UTC.
pub trait IntoInstant {
    fn into_instant(self) -> DateTime<Utc>;
}

impl IntoInstant for DateTime<Utc> {
    fn into_instant(self) -> DateTime<Utc> {
        self
    }
}

impl IntoInstant for DateTime<FixedOffset> {
    fn into_instant(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl IntoInstant for DateTime<Local> {
    fn into_instant(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl IntoInstant for NaiveDateTime {
    fn into_instant(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self)
    }
}

/// Feed timestamps taken from file metadata or `SystemTime::now()` (a GFE export's modification
/// time, say) can be used as a "now" without a round trip through chrono.
impl IntoInstant for SystemTime {
    fn into_instant(self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_offsets_resolve_to_the_same_instant() {
        let utc = Utc.with_ymd_and_hms(2021, 5, 12, 14, 0, 0).unwrap();
        let mountain = FixedOffset::west_opt(6 * 3600)
            .unwrap()
            .with_ymd_and_hms(2021, 5, 12, 8, 0, 0)
            .unwrap();
        assert_eq!(mountain.into_instant(), utc);
    }

    #[test]
    fn test_naive_is_read_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2021, 5, 12)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert_eq!(
            naive.into_instant(),
            Utc.with_ymd_and_hms(2021, 5, 12, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_system_time_since_epoch() {
        let at = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_620_828_000);
        assert_eq!(
            at.into_instant(),
            Utc.with_ymd_and_hms(2021, 5, 12, 14, 0, 0).unwrap()
        );
    }
}
