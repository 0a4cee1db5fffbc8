use crate::combine::error::CombineError;
use crate::combine::kind::CombinationKind;
use crate::decode::CategoryDecoder;
use crate::types::combined::{CategoryRecord, CombinedValue, RangeValue, Reading};
use crate::types::sample::{Sample, SampleValue};
use log::warn;

/// Folds the values of `samples` into one value according to `kind`.
///
/// Null values are dropped and lists are flattened before folding. Returns `Ok(None)` when
/// nothing usable is left.
///
/// # Errors
///
/// Returns [`CombineError::MissingDecoder`] for a categorical kind without a decoder.
pub fn combine(
    kind: CombinationKind,
    samples: &[&Sample],
    decoder: Option<&dyn CategoryDecoder>,
) -> Result<Option<CombinedValue>, CombineError> {
    let mut values = Vec::new();
    for sample in samples {
        if let Some(value) = &sample.value {
            value.flatten_into(&mut values);
        }
    }
    if values.is_empty() {
        return Ok(None);
    }

    let combined = match kind {
        CombinationKind::Min => fold_numbers(kind, &values, f64::min).map(scalar),
        CombinationKind::Max => fold_numbers(kind, &values, f64::max).map(scalar),
        CombinationKind::Add => fold_numbers(kind, &values, |a, b| a + b).map(scalar),
        CombinationKind::Range => {
            let mut accumulator: Option<RangeAccumulator> = None;
            for n in numbers(kind, &values) {
                match accumulator.as_mut() {
                    Some(acc) => acc.push(n),
                    None => accumulator = Some(RangeAccumulator::seed(n)),
                }
            }
            accumulator.map(|acc| CombinedValue::Range(acc.finish()))
        }
        CombinationKind::Concat => {
            let mut distinct: Vec<SampleValue> = Vec::new();
            for value in values {
                if !distinct.contains(value) {
                    distinct.push(value.clone());
                }
            }
            Some(CombinedValue::Distinct(distinct))
        }
        CombinationKind::HazardConcat | CombinationKind::WeatherConcat => {
            let decoder = decoder.ok_or(CombineError::MissingDecoder(kind))?;
            let mut records = Vec::new();
            for value in values {
                let payload = value.to_json();
                let decoded = decoder.decode_all(&payload);
                if decoded.is_empty() {
                    warn!("Skipping {kind} value the decoder could not read: {payload}");
                }
                for record in decoded {
                    merge_record(&mut records, record);
                }
            }
            (!records.is_empty()).then_some(CombinedValue::Categories(records))
        }
    };
    Ok(combined)
}

fn scalar(n: f64) -> CombinedValue {
    CombinedValue::Scalar(Reading::Number(n))
}

fn numbers<'a>(
    kind: CombinationKind,
    values: &'a [&'a SampleValue],
) -> impl Iterator<Item = f64> + 'a {
    values.iter().filter_map(move |value| {
        let number = value.as_number();
        if number.is_none() {
            warn!("Skipping non-numeric value {value:?} in {kind} combination");
        }
        number
    })
}

fn fold_numbers(
    kind: CombinationKind,
    values: &[&SampleValue],
    f: impl Fn(f64, f64) -> f64,
) -> Option<f64> {
    numbers(kind, values).reduce(f)
}

/// Running state of the `range` combination. Only min, max and average leave it.
struct RangeAccumulator {
    min: f64,
    max: f64,
    total: f64,
    count: u32,
}

impl RangeAccumulator {
    fn seed(first: f64) -> Self {
        Self {
            min: first,
            max: first,
            total: first,
            count: 1,
        }
    }

    fn push(&mut self, n: f64) {
        self.min = self.min.min(n);
        self.max = self.max.max(n);
        self.total += n;
        self.count += 1;
    }

    fn finish(self) -> RangeValue {
        RangeValue {
            min: Reading::Number(self.min),
            max: Reading::Number(self.max),
            average: Reading::Number(self.total / f64::from(self.count)),
        }
    }
}

/// Adds `record`, replacing an entry of the same category unless that entry outranks it.
fn merge_record(records: &mut Vec<CategoryRecord>, record: CategoryRecord) {
    match records.iter_mut().find(|r| r.category == record.category) {
        Some(existing) if existing.priority <= record.priority => *existing = record,
        Some(_) => {}
        None => records.push(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::FnDecoder;
    use crate::interval::codec::Interval;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn samples(values: Vec<Option<SampleValue>>) -> Vec<Sample> {
        let start = Utc.with_ymd_and_hms(2021, 5, 12, 0, 0, 0).unwrap();
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let s = start + Duration::hours(i as i64);
                Sample::new(Interval::new(s, s + Duration::hours(1)).unwrap(), value)
            })
            .collect()
    }

    fn numeric(values: &[f64]) -> Vec<Sample> {
        samples(values.iter().map(|v| Some(SampleValue::Number(*v))).collect())
    }

    fn run(kind: CombinationKind, samples: &[Sample]) -> Option<CombinedValue> {
        let refs: Vec<&Sample> = samples.iter().collect();
        combine(kind, &refs, None).unwrap()
    }

    /// Decodes `{"type", "priority"}` objects, using the type as text.
    fn test_decoder() -> FnDecoder<impl Fn(&serde_json::Value) -> Option<CategoryRecord>> {
        FnDecoder(|payload: &serde_json::Value| {
            let category = payload.get("type")?.as_str()?;
            let priority = payload.get("priority")?.as_i64()?;
            Some(CategoryRecord::new(
                category,
                payload
                    .get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or(category),
                priority as i32,
            ))
        })
    }

    #[test]
    fn test_numeric_reductions() {
        let data = numeric(&[9.4, 12.2, 13.9, 14.4]);
        assert_eq!(run(CombinationKind::Max, &data).and_then(|v| v.as_number()), Some(14.4));
        assert_eq!(run(CombinationKind::Min, &data).and_then(|v| v.as_number()), Some(9.4));
        let sum = run(CombinationKind::Add, &data)
            .and_then(|v| v.as_number())
            .unwrap();
        assert!((sum - 49.9).abs() < 1e-9, "sum was {sum}");
    }

    #[test]
    fn test_add_of_whole_numbers() {
        let data = numeric(&[10.0, 12.0, 14.0, 14.0]);
        assert_eq!(run(CombinationKind::Add, &data).and_then(|v| v.as_number()), Some(50.0));
    }

    #[test]
    fn test_range_reports_min_max_average_only() {
        let value = run(CombinationKind::Range, &numeric(&[1.0, 5.0, 3.0])).unwrap();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"min": 1.0, "max": 5.0, "average": 3.0})
        );
    }

    #[test]
    fn test_range_is_seeded_with_first_non_null_value() {
        let data = samples(vec![
            None,
            Some(SampleValue::Number(-4.0)),
            Some(SampleValue::Number(-2.0)),
        ]);
        let value = run(CombinationKind::Range, &data).unwrap();
        assert_eq!(
            value,
            CombinedValue::Range(RangeValue {
                min: Reading::Number(-4.0),
                max: Reading::Number(-2.0),
                average: Reading::Number(-3.0),
            }),
            "a zero seed would have leaked into max"
        );
    }

    #[test]
    fn test_nulls_and_nested_lists() {
        let data = samples(vec![
            Some(SampleValue::List(vec![
                Some(SampleValue::Number(3.0)),
                None,
                Some(SampleValue::Number(7.0)),
            ])),
            None,
            Some(SampleValue::Number(5.0)),
        ]);
        assert_eq!(run(CombinationKind::Max, &data).and_then(|v| v.as_number()), Some(7.0));
        assert_eq!(run(CombinationKind::Add, &data).and_then(|v| v.as_number()), Some(15.0));
    }

    #[test]
    fn test_empty_and_all_null_selection_is_null() {
        for kind in CombinationKind::ALL {
            let refs: Vec<&Sample> = Vec::new();
            assert_eq!(combine(kind, &refs, Some(&test_decoder())).unwrap(), None);

            let data = samples(vec![None, None]);
            let refs: Vec<&Sample> = data.iter().collect();
            assert_eq!(combine(kind, &refs, Some(&test_decoder())).unwrap(), None, "{kind}");
        }
    }

    #[test]
    fn test_non_numeric_values_are_skipped() {
        let data = samples(vec![
            Some(SampleValue::Payload(json!("n/a"))),
            Some(SampleValue::Number(2.0)),
            Some(SampleValue::Payload(json!("4"))),
        ]);
        assert_eq!(run(CombinationKind::Max, &data).and_then(|v| v.as_number()), Some(4.0));

        let only_text = samples(vec![Some(SampleValue::Payload(json!("n/a")))]);
        assert_eq!(run(CombinationKind::Min, &only_text), None);
    }

    #[test]
    fn test_concat_keeps_first_occurrence_order() {
        let data = numeric(&[3.0, 1.0, 3.0, 2.0, 1.0]);
        assert_eq!(
            run(CombinationKind::Concat, &data),
            Some(CombinedValue::Distinct(vec![
                SampleValue::Number(3.0),
                SampleValue::Number(1.0),
                SampleValue::Number(2.0),
            ]))
        );

        let payloads = samples(vec![
            Some(SampleValue::Payload(json!({"a": 1}))),
            Some(SampleValue::Payload(json!({"a": 1}))),
        ]);
        assert_eq!(
            run(CombinationKind::Concat, &payloads),
            Some(CombinedValue::Distinct(vec![SampleValue::Payload(json!({"a": 1}))]))
        );
    }

    #[test]
    fn test_categorical_priority_merge() {
        let data = samples(vec![
            Some(SampleValue::Payload(json!({"type": "Rain", "text": "Likely Rain", "priority": 4}))),
            Some(SampleValue::Payload(json!({"type": "Snow", "priority": 1}))),
            Some(SampleValue::Payload(json!({"type": "Rain", "text": "Chance Rain", "priority": 2}))),
        ]);
        let refs: Vec<&Sample> = data.iter().collect();
        let value = combine(CombinationKind::WeatherConcat, &refs, Some(&test_decoder())).unwrap();
        assert_eq!(
            value,
            Some(CombinedValue::Categories(vec![
                CategoryRecord::new("Rain", "Likely Rain", 4),
                CategoryRecord::new("Snow", "Snow", 1),
            ]))
        );
    }

    #[test]
    fn test_categorical_tie_favours_later_sample() {
        let data = samples(vec![
            Some(SampleValue::Payload(json!({"type": "Fog", "text": "Patchy Fog", "priority": 2}))),
            Some(SampleValue::Payload(json!({"type": "Fog", "text": "Areas Fog", "priority": 2}))),
        ]);
        let refs: Vec<&Sample> = data.iter().collect();
        let value = combine(CombinationKind::WeatherConcat, &refs, Some(&test_decoder())).unwrap();
        assert_eq!(
            value,
            Some(CombinedValue::Categories(vec![CategoryRecord::new(
                "Fog",
                "Areas Fog",
                2
            )]))
        );
    }

    #[test]
    fn test_undecodable_payloads_are_skipped() {
        let data = samples(vec![
            Some(SampleValue::Payload(json!("garbage"))),
            Some(SampleValue::Payload(json!({"type": "Fog", "priority": 1}))),
        ]);
        let refs: Vec<&Sample> = data.iter().collect();
        let value = combine(CombinationKind::HazardConcat, &refs, Some(&test_decoder())).unwrap();
        assert_eq!(
            value,
            Some(CombinedValue::Categories(vec![CategoryRecord::new("Fog", "Fog", 1)]))
        );

        let garbage = samples(vec![Some(SampleValue::Payload(json!("garbage")))]);
        let refs: Vec<&Sample> = garbage.iter().collect();
        assert_eq!(
            combine(CombinationKind::HazardConcat, &refs, Some(&test_decoder())).unwrap(),
            None
        );
    }

    #[test]
    fn test_categorical_without_decoder_fails() {
        let data = samples(vec![Some(SampleValue::Payload(json!("HW.W")))]);
        let refs: Vec<&Sample> = data.iter().collect();
        assert_eq!(
            combine(CombinationKind::HazardConcat, &refs, None),
            Err(CombineError::MissingDecoder(CombinationKind::HazardConcat))
        );
    }
}
