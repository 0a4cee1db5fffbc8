use crate::combine::error::CombineError;
use crate::interval::error::IntervalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Forecast payload has an unexpected layout")]
    Payload(#[from] serde_json::Error),

    #[error("Element '{element}' has an invalid validTime")]
    ValidTime {
        element: String,
        #[source]
        source: IntervalError,
    },

    #[error("Forecast validTimes '{text}' could not be parsed")]
    ValidTimes {
        text: String,
        #[source]
        source: IntervalError,
    },

    #[error("Element '{element}' has an invalid combination")]
    Combination {
        element: String,
        #[source]
        source: CombineError,
    },
}
