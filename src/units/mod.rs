pub mod conversions;
pub mod error;
pub mod precision;
pub mod targets;
