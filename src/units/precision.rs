use crate::types::combined::{CombinedValue, Reading};

/// Rounds half away from zero to `precision` decimals.
///
/// Values that cannot be scaled without overflowing are returned unchanged.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let Ok(exponent) = i32::try_from(precision) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !value.is_finite() || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Rounds every numeric leaf of `value`. `None` precision means no rounding.
pub fn round_value(value: &CombinedValue, precision: Option<u32>) -> CombinedValue {
    match precision {
        Some(precision) => value.map_numbers(|n| Reading::Number(round_to(n, precision))),
        None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::combined::RangeValue;
    use crate::types::sample::SampleValue;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(86.0, 0), 86.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(49.9, 0), 50.0);
        assert_eq!(round_to(3.14159, 2), 3.14);
    }

    #[test]
    fn test_non_finite_passes_through() {
        assert!(round_to(f64::NAN, 1).is_nan());
        assert_eq!(round_to(f64::INFINITY, 1), f64::INFINITY);
        assert_eq!(round_to(f64::MAX, 2), f64::MAX);
    }

    #[test]
    fn test_round_value_shapes() {
        let range = CombinedValue::Range(RangeValue {
            min: Reading::Number(1.04),
            max: Reading::Number(5.06),
            average: Reading::Label("n/a".to_string()),
        });
        assert_eq!(
            round_value(&range, Some(1)),
            CombinedValue::Range(RangeValue {
                min: Reading::Number(1.0),
                max: Reading::Number(5.1),
                average: Reading::Label("n/a".to_string()),
            })
        );

        let distinct = CombinedValue::Distinct(vec![SampleValue::Number(2.345), SampleValue::Number(7.0)]);
        assert_eq!(
            round_value(&distinct, Some(0)),
            CombinedValue::Distinct(vec![SampleValue::Number(2.0), SampleValue::Number(7.0)])
        );

        let scalar = CombinedValue::Scalar(Reading::Number(12.345));
        assert_eq!(round_value(&scalar, None), scalar);
    }
}
