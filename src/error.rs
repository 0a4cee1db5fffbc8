use crate::combine::error::CombineError;
use crate::interval::error::IntervalError;
use crate::sources::error::SourceError;
use crate::units::error::ConversionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Element '{0}' is not in the dataset")]
    UnknownElement(String),

    #[error("Failed to combine element '{element}'")]
    ElementCombine {
        element: String,
        #[source]
        source: CombineError,
    },

    #[error("Failed to convert element '{element}'")]
    ElementConversion {
        element: String,
        #[source]
        source: ConversionError,
    },

    #[error("Aggregation task failed")]
    TaskJoin(#[from] tokio::task::JoinError),
}
