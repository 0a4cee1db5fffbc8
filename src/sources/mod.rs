//! Adapters turning provider payloads into a [`Dataset`]. Fetching the payloads is left to the
//! caller.

pub mod api;
pub mod element_config;
pub mod error;
pub mod gfe;

use crate::combine::kind::CombinationKind;
use crate::decode::hazard::HazardDecoder;
use crate::decode::weather::WeatherDecoder;
use crate::decode::CategoryDecoder;
use crate::interval::codec::Interval;
use crate::types::series::Dataset;
use crate::types::combined::Reading;
use crate::units::conversions::cardinal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Distance from the nearest city below which only the city is named.
pub const DEFAULT_LOCATION_THRESHOLD_METERS: f64 = 5000.0;

const METERS_PER_MILE: f64 = 1609.344;

/// Elevation of the forecast area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elevation {
    pub unit_code: Option<String>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub average: Option<f64>,
}

/// Where the forecast is for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// GeoJSON geometry of the forecast area, passed through untouched.
    pub geometry: Option<serde_json::Value>,
    pub name: Option<String>,
    pub time_zone: Option<String>,
    pub cwa: Option<String>,
    #[serde(default)]
    pub elevation: Elevation,
}

/// A provider forecast normalized into a dataset.
#[derive(Debug, Clone)]
pub struct SourceForecast {
    pub update_time: Option<String>,
    /// Span the forecast covers.
    pub valid_times: Option<Interval>,
    pub location: Location,
    pub dataset: Dataset,
}

/// Which provider's categorical payloads a series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Provider {
    Api,
    Gfe,
}

/// The decoder a series with `kind` needs, if any.
pub(crate) fn decoder_for(
    kind: CombinationKind,
    provider: Provider,
) -> Option<Arc<dyn CategoryDecoder>> {
    let decoder: Arc<dyn CategoryDecoder> = match (kind, provider) {
        (CombinationKind::HazardConcat, Provider::Api) => Arc::new(HazardDecoder::Api),
        (CombinationKind::HazardConcat, Provider::Gfe) => Arc::new(HazardDecoder::Gfe),
        (CombinationKind::WeatherConcat, Provider::Api) => Arc::new(WeatherDecoder::Api),
        (CombinationKind::WeatherConcat, Provider::Gfe) => Arc::new(WeatherDecoder::Gfe),
        _ => return None,
    };
    Some(decoder)
}

/// Human readable place name such as "7mi ESE of Boise, ID".
///
/// Distance and direction from the city are only included when `meters` exceeds `threshold`.
/// The distance is truncated to whole miles.
///
/// ```
/// use threat_matrix::sources::{location_name, DEFAULT_LOCATION_THRESHOLD_METERS};
///
/// assert_eq!(
///     location_name(12000.0, Some(110.0), "Boise", "ID", DEFAULT_LOCATION_THRESHOLD_METERS),
///     "7mi ESE of Boise, ID"
/// );
/// assert_eq!(location_name(800.0, Some(110.0), "Boise", "ID", 5000.0), "Boise, ID");
/// ```
pub fn location_name(
    meters: f64,
    degrees: Option<f64>,
    city: &str,
    state: &str,
    threshold: f64,
) -> String {
    if meters <= threshold {
        return format!("{city}, {state}");
    }
    let miles = (meters / METERS_PER_MILE) as i64;
    match degrees.map(cardinal) {
        Some(Reading::Label(direction)) => format!("{miles}mi {direction} of {city}, {state}"),
        _ => format!("{miles}mi of {city}, {state}"),
    }
}
