pub mod codec;
pub mod error;
pub mod overlap;
pub mod window;
