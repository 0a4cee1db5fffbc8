use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("No conversion from '{from}' to '{to}'. Valid targets for '{from}': {valid:?}")]
    UnsupportedConversion {
        from: String,
        to: String,
        valid: Vec<String>,
    },

    #[error("'{unit}' is not a {group} unit. Choose one of {allowed:?}")]
    UnavailableTarget {
        group: &'static str,
        unit: String,
        allowed: &'static [&'static str],
    },
}
