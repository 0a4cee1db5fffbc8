use crate::types::combined::Reading;
use crate::units::error::ConversionError;
use std::collections::BTreeMap;

/// A pure conversion of one numeric leaf.
pub type ConversionFn = fn(f64) -> Reading;

const FEET_PER_METER: f64 = 1.0 / 0.3048;
const FEET_PER_MILE: f64 = 5280.0;
const KELVIN_OFFSET: f64 = 273.15;
const KM_H_PER_KT: f64 = 1.852;
const KM_H_PER_M_S: f64 = 3.6;
const M_S_PER_MI_H: f64 = 0.44704;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

fn number(v: f64) -> Reading {
    Reading::Number(v)
}

fn c_to_f(v: f64) -> f64 {
    v * 1.8 + 32.0
}

fn f_to_c(v: f64) -> f64 {
    (v - 32.0) / 1.8
}

fn m_to_mi(v: f64) -> f64 {
    v * FEET_PER_METER / FEET_PER_MILE
}

fn mi_to_m(v: f64) -> f64 {
    v * FEET_PER_MILE / FEET_PER_METER
}

/// Nearest of the 16 compass points. Angles outside 0..360 wrap around.
pub fn cardinal(degrees: f64) -> Reading {
    if !degrees.is_finite() {
        return Reading::Number(degrees);
    }
    let sector = (degrees / 22.5 + 0.5).floor() as i64;
    Reading::Label(COMPASS_POINTS[sector.rem_euclid(16) as usize].to_string())
}

/// Conversion functions keyed by source unit, then destination unit.
///
/// Unit names follow the WMO unit registry (`degC`, `m_s-1`, `degree_(angle)`), with the
/// American units named after their WMO counterparts (`degF`, `mi_h-1`).
#[derive(Debug, Clone)]
pub struct UnitConversions {
    table: BTreeMap<String, BTreeMap<String, ConversionFn>>,
}

impl Default for UnitConversions {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitConversions {
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Temperature, distance, precipitation, speed and direction conversions.
    pub fn standard() -> Self {
        let table: [(&str, &str, ConversionFn); 52] = [
            // temperature
            ("degC", "degC", number),
            ("degC", "degF", |v| number(c_to_f(v))),
            ("degC", "K", |v| number(v + KELVIN_OFFSET)),
            ("degF", "degF", number),
            ("degF", "degC", |v| number(f_to_c(v))),
            ("degF", "K", |v| number(f_to_c(v) + KELVIN_OFFSET)),
            ("K", "K", number),
            ("K", "degC", |v| number(v - KELVIN_OFFSET)),
            ("K", "degF", |v| number(c_to_f(v - KELVIN_OFFSET))),
            // distance
            ("m", "m", number),
            ("m", "ft", |v| number(v * FEET_PER_METER)),
            ("m", "mi", |v| number(m_to_mi(v))),
            ("m", "km", |v| number(v / 1000.0)),
            ("ft", "ft", number),
            ("ft", "m", |v| number(v / FEET_PER_METER)),
            ("ft", "mi", |v| number(v / FEET_PER_MILE)),
            ("ft", "km", |v| number(v / FEET_PER_METER / 1000.0)),
            ("mi", "mi", number),
            ("mi", "m", |v| number(mi_to_m(v))),
            ("mi", "ft", |v| number(v * FEET_PER_MILE)),
            ("mi", "km", |v| number(mi_to_m(v) / 1000.0)),
            ("km", "km", number),
            ("km", "m", |v| number(v * 1000.0)),
            ("km", "ft", |v| number(v * 1000.0 * FEET_PER_METER)),
            ("km", "mi", |v| number(m_to_mi(v * 1000.0))),
            // precipitation
            ("mm", "mm", number),
            ("mm", "cm", |v| number(v / 10.0)),
            ("mm", "in", |v| number(v / 25.4)),
            ("cm", "cm", number),
            ("cm", "mm", |v| number(v * 10.0)),
            ("cm", "in", |v| number(v / 2.54)),
            ("in", "in", number),
            ("in", "mm", |v| number(v * 25.4)),
            ("in", "cm", |v| number(v * 2.54)),
            // speed
            ("km_h-1", "km_h-1", number),
            ("km_h-1", "kt", |v| number(v / KM_H_PER_KT)),
            ("km_h-1", "mi_h-1", |v| number(m_to_mi(v * 1000.0))),
            ("km_h-1", "m_s-1", |v| number(v / KM_H_PER_M_S)),
            ("m_s-1", "m_s-1", number),
            ("m_s-1", "kt", |v| number(v * KM_H_PER_M_S / KM_H_PER_KT)),
            ("m_s-1", "mi_h-1", |v| number(v / M_S_PER_MI_H)),
            ("m_s-1", "km_h-1", |v| number(v * KM_H_PER_M_S)),
            ("kt", "kt", number),
            ("kt", "m_s-1", |v| number(v * KM_H_PER_KT / KM_H_PER_M_S)),
            ("kt", "mi_h-1", |v| number(m_to_mi(v * KM_H_PER_KT * 1000.0))),
            ("kt", "km_h-1", |v| number(v * KM_H_PER_KT)),
            ("mi_h-1", "mi_h-1", number),
            ("mi_h-1", "m_s-1", |v| number(mi_to_m(v) / 1000.0 / KM_H_PER_M_S)),
            ("mi_h-1", "kt", |v| number(mi_to_m(v) / 1000.0 / KM_H_PER_KT)),
            ("mi_h-1", "km_h-1", |v| number(mi_to_m(v) / 1000.0)),
            // direction
            ("degree_(angle)", "degree_(angle)", number),
            ("degree_(angle)", "cardinal", cardinal),
        ];

        table
            .into_iter()
            .fold(Self::empty(), |conversions, (from, to, f)| {
                conversions.with_conversion(from, to, f)
            })
    }

    /// Registers (or replaces) the conversion from `from` to `to`.
    pub fn with_conversion(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        f: ConversionFn,
    ) -> Self {
        self.table
            .entry(from.into())
            .or_default()
            .insert(to.into(), f);
        self
    }

    /// Units `from` can be converted to.
    pub fn destinations(&self, from: &str) -> Vec<String> {
        self.table
            .get(from)
            .map(|targets| targets.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// [`ConversionError::UnsupportedConversion`] listing every registered destination of
    /// `from` when `to` is not one of them.
    pub fn lookup(&self, from: &str, to: &str) -> Result<ConversionFn, ConversionError> {
        self.table
            .get(from)
            .and_then(|targets| targets.get(to))
            .copied()
            .ok_or_else(|| ConversionError::UnsupportedConversion {
                from: from.to_string(),
                to: to.to_string(),
                valid: self.destinations(from),
            })
    }

    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<Reading, ConversionError> {
        Ok(self.lookup(from, to)?(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(reading: Reading, expected: f64) {
        let value = reading.as_number().expect("numeric reading");
        assert!(
            (value - expected).abs() < 1e-6,
            "expected {expected}, got {value}"
        );
    }

    #[test]
    fn test_temperature() {
        let conversions = UnitConversions::standard();
        assert_eq!(conversions.convert(30.0, "degC", "degF").unwrap(), Reading::Number(86.0));
        approx(conversions.convert(212.0, "degF", "degC").unwrap(), 100.0);
        approx(conversions.convert(0.0, "degC", "K").unwrap(), 273.15);
        approx(conversions.convert(273.15, "K", "degF").unwrap(), 32.0);
    }

    #[test]
    fn test_distance_and_speed() {
        let conversions = UnitConversions::standard();
        approx(conversions.convert(1609.344, "m", "mi").unwrap(), 1.0);
        approx(conversions.convert(1.0, "mi", "ft").unwrap(), 5280.0);
        approx(conversions.convert(1.0, "km", "m").unwrap(), 1000.0);
        approx(conversions.convert(10.0, "m_s-1", "km_h-1").unwrap(), 36.0);
        approx(conversions.convert(1.852, "km_h-1", "kt").unwrap(), 1.0);
        approx(conversions.convert(1.0, "mi_h-1", "m_s-1").unwrap(), 0.44704);
        approx(conversions.convert(25.4, "mm", "in").unwrap(), 1.0);
    }

    #[test]
    fn test_every_pair_inverts() {
        let conversions = UnitConversions::standard();
        for from in ["degC", "degF", "K", "m", "ft", "mi", "km", "mm", "cm", "in", "km_h-1", "m_s-1", "kt", "mi_h-1"] {
            for to in conversions.destinations(from) {
                let there = conversions.convert(12.5, from, &to).unwrap();
                let back = conversions
                    .convert(there.as_number().unwrap(), &to, from)
                    .unwrap();
                approx(back, 12.5);
            }
        }
    }

    #[test]
    fn test_cardinal() {
        let conversions = UnitConversions::standard();
        let label = |deg: f64| conversions.convert(deg, "degree_(angle)", "cardinal").unwrap();
        assert_eq!(label(0.0), Reading::Label("N".to_string()));
        assert_eq!(label(11.0), Reading::Label("N".to_string()));
        assert_eq!(label(11.25), Reading::Label("NNE".to_string()));
        assert_eq!(label(225.0), Reading::Label("SW".to_string()));
        assert_eq!(label(350.0), Reading::Label("N".to_string()));
        assert_eq!(label(-90.0), Reading::Label("W".to_string()));
    }

    #[test]
    fn test_unsupported_conversion_lists_destinations() {
        let conversions = UnitConversions::standard();
        match conversions.lookup("degC", "mm") {
            Err(ConversionError::UnsupportedConversion { from, to, valid }) => {
                assert_eq!(from, "degC");
                assert_eq!(to, "mm");
                assert_eq!(valid, vec!["K", "degC", "degF"]);
            }
            other => panic!("expected UnsupportedConversion, got {other:?}"),
        }
        assert!(matches!(
            conversions.lookup("furlong", "m"),
            Err(ConversionError::UnsupportedConversion { valid, .. }) if valid.is_empty()
        ));
    }

    #[test]
    fn test_custom_table() {
        let conversions = UnitConversions::empty().with_conversion("percent", "fraction", |v| {
            Reading::Number(v / 100.0)
        });
        assert_eq!(
            conversions.convert(45.0, "percent", "fraction").unwrap(),
            Reading::Number(0.45)
        );
        assert!(conversions.lookup("degC", "degF").is_err());
    }
}
