use crate::combine::kind::CombinationKind;
use crate::decode::{CategoryDecoder, RecordDecoder};
use crate::interval::codec::Interval;
use crate::interval::error::IntervalError;
use crate::types::combined::{CombinedValue, Reading};
use crate::types::sample::{Sample, SampleValue};
use crate::types::series::{Dataset, Series};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// The combined value of one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPoint {
    #[serde(rename = "validTime")]
    pub valid_time: String,
    pub value: Option<CombinedValue>,
}

/// An aggregated element: the input metadata with samples replaced by one point per window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    /// The reported unit, i.e. the conversion target when one applied.
    #[serde(rename = "uom")]
    pub unit: Option<String>,
    pub combination: CombinationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub precision: Option<u32>,
    pub values: Vec<AggregatedPoint>,
}

impl AggregatedSeries {
    /// Turns the points back into samples so the output can be aggregated again.
    ///
    /// Scalars and distinct lists map back to numbers and lists. Category records become
    /// payloads read by [`RecordDecoder`]. Range triples become opaque payloads, and the series
    /// switches to `concat` since they no longer fold numerically.
    pub fn to_series(&self) -> Result<Series, IntervalError> {
        let mut combination = self.combination;
        let mut samples = Vec::with_capacity(self.values.len());
        for point in &self.values {
            let interval = Interval::parse(&point.valid_time)?;
            let value = point.value.as_ref().map(|value| match value {
                CombinedValue::Scalar(Reading::Number(n)) => SampleValue::Number(*n),
                CombinedValue::Scalar(Reading::Label(label)) => {
                    SampleValue::Payload(serde_json::Value::String(label.clone()))
                }
                CombinedValue::Range(range) => {
                    combination = CombinationKind::Concat;
                    SampleValue::Payload(serde_json::to_value(range).unwrap_or_default())
                }
                CombinedValue::Distinct(values) => {
                    SampleValue::List(values.iter().cloned().map(Some).collect())
                }
                CombinedValue::Categories(records) => SampleValue::List(
                    records
                        .iter()
                        .map(|record| {
                            Some(SampleValue::Payload(
                                serde_json::to_value(record).unwrap_or_default(),
                            ))
                        })
                        .collect(),
                ),
            });
            samples.push(Sample::new(interval, value));
        }

        let decoder = self
            .combination
            .is_categorical()
            .then(|| Arc::new(RecordDecoder) as Arc<dyn CategoryDecoder>);
        Ok(Series::builder()
            .maybe_unit(self.unit.clone())
            .combination(combination)
            .maybe_precision(self.precision)
            .maybe_name(self.name.clone())
            .maybe_decoder(decoder)
            .samples(samples)
            .build())
    }
}

/// Aggregation output keyed by element name, in the order the elements were requested.
/// Serializes as a plain JSON object with keys in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedDataset {
    elements: Vec<(String, AggregatedSeries)>,
}

impl AggregatedDataset {
    /// Appends an element, replacing an earlier one with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, series: AggregatedSeries) {
        let key = key.into();
        match self.elements.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = series,
            None => self.elements.push((key, series)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AggregatedSeries> {
        self.elements
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, series)| series)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregatedSeries)> {
        self.elements.iter().map(|(key, series)| (key.as_str(), series))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.elements.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Rebuilds an input [`Dataset`] from this output. See [`AggregatedSeries::to_series`].
    pub fn to_dataset(&self) -> Result<Dataset, IntervalError> {
        self.elements
            .iter()
            .map(|(key, series)| Ok((key.clone(), series.to_series()?)))
            .collect::<Result<Vec<_>, IntervalError>>()
            .map(|elements| elements.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, AggregatedSeries)> for AggregatedDataset {
    fn from_iter<I: IntoIterator<Item = (K, AggregatedSeries)>>(iter: I) -> Self {
        let mut dataset = Self::default();
        for (key, series) in iter {
            dataset.insert(key, series);
        }
        dataset
    }
}

impl Serialize for AggregatedDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.elements.iter().map(|(key, series)| (key, series)))
    }
}
