use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Malformed interval '{text}': {reason}")]
    MalformedInterval { text: String, reason: String },

    #[error("Interval '{0}' does not fit in the supported date range")]
    OutOfRange(String),

    #[error("Interval end {end} is before its start {start}")]
    Inverted { start: String, end: String },

    #[error("Periodicity must be a positive number of hours, got {0}")]
    InvalidPeriodicity(u32),
}

impl IntervalError {
    pub(crate) fn malformed(text: &str, reason: impl Into<String>) -> Self {
        IntervalError::MalformedInterval {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
