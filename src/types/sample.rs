use crate::interval::codec::Interval;
use crate::interval::error::IntervalError;
use crate::types::combined::Reading;
use serde::{Deserialize, Serialize};

/// A raw forecast value.
///
/// Numbers are the common case. Edit-area grids report lists (which may hold `null`), and the
/// categorical elements carry provider payloads only a decoder understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Number(f64),
    List(Vec<Option<SampleValue>>),
    Payload(serde_json::Value),
}

impl SampleValue {
    /// Numeric view of the value. Numeric strings are accepted, everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SampleValue::Number(n) => Some(*n),
            SampleValue::Payload(serde_json::Value::Number(n)) => n.as_f64(),
            SampleValue::Payload(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Pushes the leaves of this value onto `out`, descending into lists and skipping nulls.
    pub fn flatten_into<'a>(&'a self, out: &mut Vec<&'a SampleValue>) {
        match self {
            SampleValue::List(items) => {
                for item in items.iter().flatten() {
                    item.flatten_into(out);
                }
            }
            SampleValue::Payload(serde_json::Value::Null) => {}
            leaf => out.push(leaf),
        }
    }

    /// Applies `f` to every numeric leaf, keeping the shape. A textual result becomes a string
    /// payload.
    pub fn map_numbers(&self, f: &impl Fn(f64) -> Reading) -> SampleValue {
        match self {
            SampleValue::Number(n) => match f(*n) {
                Reading::Number(v) => SampleValue::Number(v),
                Reading::Label(label) => SampleValue::Payload(serde_json::Value::String(label)),
            },
            SampleValue::List(items) => SampleValue::List(
                items
                    .iter()
                    .map(|item| item.as_ref().map(|v| v.map_numbers(f)))
                    .collect(),
            ),
            SampleValue::Payload(payload) => SampleValue::Payload(payload.clone()),
        }
    }

    /// The value as JSON, for decoders.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SampleValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SampleValue::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| {
                        item.as_ref()
                            .map(SampleValue::to_json)
                            .unwrap_or(serde_json::Value::Null)
                    })
                    .collect(),
            ),
            SampleValue::Payload(payload) => payload.clone(),
        }
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        SampleValue::Number(value)
    }
}

impl From<serde_json::Value> for SampleValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => SampleValue::Number(f),
                None => SampleValue::Payload(serde_json::Value::Number(n)),
            },
            serde_json::Value::Array(items) => SampleValue::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::Null => None,
                        other => Some(SampleValue::from(other)),
                    })
                    .collect(),
            ),
            other => SampleValue::Payload(other),
        }
    }
}

/// One timestamped value of a series. `None` means the provider had no data for the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub interval: Interval,
    pub value: Option<SampleValue>,
}

impl Sample {
    pub fn new(interval: Interval, value: Option<SampleValue>) -> Self {
        Self { interval, value }
    }
}

/// A sample as providers ship it, with the interval still in text form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    #[serde(rename = "validTime")]
    pub valid_time: String,
    #[serde(default)]
    pub value: Option<SampleValue>,
}

impl TryFrom<RawSample> for Sample {
    type Error = IntervalError;

    fn try_from(raw: RawSample) -> Result<Self, Self::Error> {
        Ok(Sample {
            interval: Interval::parse(&raw.valid_time)?,
            value: raw.value,
        })
    }
}
