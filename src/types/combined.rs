use crate::types::sample::SampleValue;
use serde::{Deserialize, Serialize};

/// A converted leaf value. Most conversions produce numbers; degree to cardinal produces a
/// compass point label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Label(String),
}

impl Reading {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Reading::Number(n) => Some(*n),
            Reading::Label(_) => None,
        }
    }

    fn map(&self, f: &impl Fn(f64) -> Reading) -> Reading {
        match self {
            Reading::Number(n) => f(*n),
            Reading::Label(label) => Reading::Label(label.clone()),
        }
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Number(value)
    }
}

/// Result of the `range` combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    pub min: Reading,
    pub max: Reading,
    pub average: Reading,
}

/// A decoded hazard or weather entry.
///
/// Two records with the same `category` describe the same thing; the reducer keeps the one
/// with the higher `priority`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "type")]
    pub category: String,
    pub text: String,
    pub priority: i32,
}

impl CategoryRecord {
    pub fn new(category: impl Into<String>, text: impl Into<String>, priority: i32) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            priority,
        }
    }
}

/// The value of one aggregated window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CombinedValue {
    Scalar(Reading),
    Range(RangeValue),
    Categories(Vec<CategoryRecord>),
    Distinct(Vec<SampleValue>),
}

impl CombinedValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CombinedValue::Scalar(reading) => reading.as_number(),
            _ => None,
        }
    }

    /// Applies `f` to every numeric leaf and leaves the rest alone.
    pub fn map_numbers(&self, f: impl Fn(f64) -> Reading) -> CombinedValue {
        match self {
            CombinedValue::Scalar(reading) => CombinedValue::Scalar(reading.map(&f)),
            CombinedValue::Range(range) => CombinedValue::Range(RangeValue {
                min: range.min.map(&f),
                max: range.max.map(&f),
                average: range.average.map(&f),
            }),
            CombinedValue::Distinct(values) => {
                CombinedValue::Distinct(values.iter().map(|v| v.map_numbers(&f)).collect())
            }
            CombinedValue::Categories(records) => CombinedValue::Categories(records.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shapes() {
        let range = CombinedValue::Range(RangeValue {
            min: Reading::Number(1.0),
            max: Reading::Number(5.0),
            average: Reading::Number(3.0),
        });
        assert_eq!(
            serde_json::to_value(&range).unwrap(),
            json!({"min": 1.0, "max": 5.0, "average": 3.0})
        );

        let records = CombinedValue::Categories(vec![CategoryRecord::new(
            "Heat Advisory",
            "Heat Advisory",
            1,
        )]);
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([{"type": "Heat Advisory", "text": "Heat Advisory", "priority": 1}])
        );

        let label = CombinedValue::Scalar(Reading::Label("NNE".to_string()));
        assert_eq!(serde_json::to_value(&label).unwrap(), json!("NNE"));
    }

    #[test]
    fn test_map_numbers_per_shape() {
        let half = |n: f64| Reading::Number(n / 2.0);

        let range = CombinedValue::Range(RangeValue {
            min: Reading::Number(2.0),
            max: Reading::Number(6.0),
            average: Reading::Number(4.0),
        });
        assert_eq!(
            range.map_numbers(half),
            CombinedValue::Range(RangeValue {
                min: Reading::Number(1.0),
                max: Reading::Number(3.0),
                average: Reading::Number(2.0),
            })
        );

        let distinct = CombinedValue::Distinct(vec![
            SampleValue::Number(8.0),
            SampleValue::Payload(json!("calm")),
        ]);
        assert_eq!(
            distinct.map_numbers(half),
            CombinedValue::Distinct(vec![
                SampleValue::Number(4.0),
                SampleValue::Payload(json!("calm")),
            ])
        );

        let categories = CombinedValue::Categories(vec![CategoryRecord::new("Rain", "Chance Rain", 2)]);
        assert_eq!(categories.map_numbers(half), categories);
    }

    #[test]
    fn test_label_results_in_distinct_lists() {
        let distinct = CombinedValue::Distinct(vec![SampleValue::Number(90.0)]);
        let mapped = distinct.map_numbers(|_| Reading::Label("E".to_string()));
        assert_eq!(
            mapped,
            CombinedValue::Distinct(vec![SampleValue::Payload(json!("E"))])
        );
    }
}
