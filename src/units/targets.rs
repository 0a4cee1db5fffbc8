use crate::units::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TEMPERATURE_UNITS: &[&str] = &["degF", "degC", "K"];
pub const WIND_UNITS: &[&str] = &["km_h-1", "kt", "mi_h-1", "m_s-1"];
pub const PRECIPITATION_UNITS: &[&str] = &["mm", "in"];
pub const DISTANCE_UNITS: &[&str] = &["m", "mi", "km", "ft"];
pub const DIRECTION_UNITS: &[&str] = &["degree_(angle)", "cardinal"];

/// Which unit each source unit should be reported in. Units without an entry are left alone.
///
/// ```
/// use threat_matrix::UnitTargets;
///
/// let targets = UnitTargets::default()
///     .convert_temperature("degF")?
///     .convert_wind("mi_h-1")?;
/// assert_eq!(targets.target_for("degC"), Some("degF"));
/// assert_eq!(targets.target_for("m_s-1"), Some("mi_h-1"));
/// assert_eq!(targets.target_for("percent"), None);
/// # Ok::<(), threat_matrix::ConversionError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTargets(BTreeMap<String, String>);

impl UnitTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.0.insert(from.into(), to.into());
        self
    }

    pub fn target_for(&self, unit: &str) -> Option<&str> {
        self.0.get(unit).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reports every temperature unit in `unit`.
    pub fn convert_temperature(self, unit: &str) -> Result<Self, ConversionError> {
        self.convert_group("temperature", TEMPERATURE_UNITS, unit)
    }

    /// Reports every wind speed unit in `unit`.
    pub fn convert_wind(self, unit: &str) -> Result<Self, ConversionError> {
        self.convert_group("wind speed", WIND_UNITS, unit)
    }

    pub fn convert_precipitation(self, unit: &str) -> Result<Self, ConversionError> {
        self.convert_group("precipitation", PRECIPITATION_UNITS, unit)
    }

    pub fn convert_distance(self, unit: &str) -> Result<Self, ConversionError> {
        self.convert_group("distance", DISTANCE_UNITS, unit)
    }

    /// `cardinal` turns wind directions into compass points.
    pub fn convert_direction(self, unit: &str) -> Result<Self, ConversionError> {
        self.convert_group("direction", DIRECTION_UNITS, unit)
    }

    fn convert_group(
        mut self,
        group: &'static str,
        allowed: &'static [&'static str],
        unit: &str,
    ) -> Result<Self, ConversionError> {
        if !allowed.contains(&unit) {
            return Err(ConversionError::UnavailableTarget {
                group,
                unit: unit.to_string(),
                allowed,
            });
        }
        for source in allowed {
            self.0.insert((*source).to_string(), unit.to_string());
        }
        Ok(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UnitTargets {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }
}
