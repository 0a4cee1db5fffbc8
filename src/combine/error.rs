use crate::combine::kind::CombinationKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("Unrecognized combination kind '{0}'")]
    UnrecognizedCombinationKind(String),

    #[error("Cannot switch to combination '{0}'; allowed: min, max, range, concat, add")]
    NotReassignable(CombinationKind),

    #[error("Combination '{0}' needs a category decoder but the series has none")]
    MissingDecoder(CombinationKind),
}
