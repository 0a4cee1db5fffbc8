//! Decoders turning provider-specific categorical payloads (hazard codes, weather strings) into
//! [`CategoryRecord`]s for the `hazardConcat` and `weatherConcat` combinations.

pub mod hazard;
pub mod weather;

use crate::types::combined::CategoryRecord;
use std::fmt;

/// Strategy for reading one categorical payload.
///
/// A series picks its decoder once, when it is built. Decoders are shared between threads by
/// the concurrent aggregation path.
pub trait CategoryDecoder: Send + Sync + fmt::Debug {
    /// Decodes a single entry. `None` means the payload was not understood.
    fn decode(&self, payload: &serde_json::Value) -> Option<CategoryRecord>;

    /// Decodes a payload that may hold several entries.
    ///
    /// The default handles one entry per payload. Providers packing several entries into one
    /// value (GFE's `^`-joined codes) override this.
    fn decode_all(&self, payload: &serde_json::Value) -> Vec<CategoryRecord> {
        self.decode(payload).into_iter().collect()
    }
}

/// Adapts a closure into a decoder.
pub struct FnDecoder<F>(pub F);

impl<F> fmt::Debug for FnDecoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnDecoder")
    }
}

impl<F> CategoryDecoder for FnDecoder<F>
where
    F: Fn(&serde_json::Value) -> Option<CategoryRecord> + Send + Sync,
{
    fn decode(&self, payload: &serde_json::Value) -> Option<CategoryRecord> {
        (self.0)(payload)
    }
}

/// Reads records that are already decoded, such as the values of an aggregated series.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder;

impl CategoryDecoder for RecordDecoder {
    fn decode(&self, payload: &serde_json::Value) -> Option<CategoryRecord> {
        serde_json::from_value(payload.clone()).ok()
    }
}
