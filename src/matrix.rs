use crate::combine::reducer::combine;
use crate::error::MatrixError;
use crate::filtering::{AggregationFilters, ResolvedFilters};
use crate::interval::overlap::select_overlapping;
use crate::interval::window::Window;
use crate::types::aggregated::{AggregatedDataset, AggregatedPoint, AggregatedSeries};
use crate::types::into_instant::IntoInstant;
use crate::types::series::{Dataset, Series};
use crate::units::conversions::{ConversionFn, UnitConversions};
use crate::units::precision::round_value;
use crate::units::targets::UnitTargets;
use bon::bon;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;

/// The aggregation entry point.
///
/// Holds the conversion table and the caller's unit targets; both are read-only once built, so
/// one instance can serve any number of aggregations, on any number of threads.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use threat_matrix::{
///     CombinationKind, Dataset, Interval, Sample, SampleValue, Series, ThreatMatrix, UnitTargets,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temperature = Series::builder()
///     .unit("degC")
///     .combination(CombinationKind::Max)
///     .precision(0)
///     .samples(vec![
///         Sample::new(Interval::parse("2021-07-08T01:00:00+00:00/PT6H")?, Some(SampleValue::Number(24.0))),
///         Sample::new(Interval::parse("2021-07-08T07:00:00+00:00/PT6H")?, Some(SampleValue::Number(30.0))),
///     ])
///     .build();
/// let dataset = Dataset::new().with_series("temperature", temperature);
///
/// let matrix = ThreatMatrix::builder()
///     .unit_targets(UnitTargets::new().convert_temperature("degF")?)
///     .build();
/// let output = matrix
///     .aggregate_with()
///     .dataset(&dataset)
///     .start(Utc.with_ymd_and_hms(2021, 7, 8, 1, 0, 0).unwrap())
///     .end(Utc.with_ymd_and_hms(2021, 7, 9, 1, 0, 0).unwrap())
///     .call()?;
///
/// let series = output.get("temperature").unwrap();
/// assert_eq!(series.unit.as_deref(), Some("degF"));
/// assert_eq!(series.values[0].valid_time, "2021-07-08T01:00:00+00:00/PT24H");
/// assert_eq!(series.values[0].value.as_ref().and_then(|v| v.as_number()), Some(86.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ThreatMatrix {
    conversions: Arc<UnitConversions>,
    unit_targets: UnitTargets,
}

impl Default for ThreatMatrix {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl ThreatMatrix {
    /// Creates an aggregator.
    ///
    /// * `.conversions(Arc<UnitConversions>)`: optional, defaults to
    ///   [`UnitConversions::standard`].
    /// * `.unit_targets(UnitTargets)`: optional, defaults to reporting every unit as-is.
    #[builder]
    pub fn new(
        conversions: Option<Arc<UnitConversions>>,
        #[builder(default)] unit_targets: UnitTargets,
    ) -> Self {
        Self {
            conversions: conversions.unwrap_or_default(),
            unit_targets,
        }
    }

    /// [`ThreatMatrix::aggregate`] with the filters given as builder arguments.
    ///
    /// * `.dataset(&Dataset)`: **Required.**
    /// * `.start(..)` / `.end(..)`: optional span, defaults to now and now + 7 days.
    /// * `.periodicity_hours(u32)`: optional window width, defaults to 24.
    /// * `.elements(Vec<String>)`: optional, defaults to every element of the dataset.
    #[builder]
    pub fn aggregate_with(
        &self,
        dataset: &Dataset,
        #[builder(into)] start: Option<DateTime<Utc>>,
        #[builder(into)] end: Option<DateTime<Utc>>,
        periodicity_hours: Option<u32>,
        elements: Option<Vec<String>>,
    ) -> Result<AggregatedDataset, MatrixError> {
        let filters = AggregationFilters {
            start,
            end,
            periodicity_hours,
            elements,
        };
        self.aggregate(dataset, &filters)
    }
}

impl ThreatMatrix {
    pub fn conversions(&self) -> &UnitConversions {
        &self.conversions
    }

    pub fn unit_targets(&self) -> &UnitTargets {
        &self.unit_targets
    }

    /// Re-samples `dataset` into uniform windows.
    ///
    /// For every requested element and window: select overlapping samples, fold them with the
    /// series' combination, convert to the target unit and round to the series precision. The
    /// dataset is not modified.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::Interval`] for a zero periodicity.
    /// * [`MatrixError::UnknownElement`] for a requested element missing from the dataset.
    /// * [`MatrixError::ElementConversion`] when a unit target has no conversion.
    /// * [`MatrixError::ElementCombine`] for a categorical series without a decoder.
    pub fn aggregate(
        &self,
        dataset: &Dataset,
        filters: &AggregationFilters,
    ) -> Result<AggregatedDataset, MatrixError> {
        self.aggregate_at(dataset, filters, Utc::now())
    }

    /// [`ThreatMatrix::aggregate`] with an explicit "now" for the default start.
    pub fn aggregate_at(
        &self,
        dataset: &Dataset,
        filters: &AggregationFilters,
        now: impl IntoInstant,
    ) -> Result<AggregatedDataset, MatrixError> {
        let resolved = filters.resolve(now.into_instant())?;
        let windows = resolved.windows()?;
        let keys = requested_keys(dataset, &resolved)?;
        info!(
            "Aggregating {} elements into {} windows of {}h starting {}",
            keys.len(),
            windows.len(),
            resolved.periodicity_hours,
            resolved.start
        );

        let mut output = AggregatedDataset::default();
        for key in keys {
            let series = dataset
                .get(&key)
                .ok_or_else(|| MatrixError::UnknownElement(key.clone()))?;
            let aggregated = self.aggregate_series(&key, series, &windows)?;
            output.insert(key, aggregated);
        }
        Ok(output)
    }

    /// Aggregates every requested element on its own blocking task.
    ///
    /// Elements share nothing mutable, so each runs independently; the result is identical to
    /// [`ThreatMatrix::aggregate`].
    pub async fn aggregate_concurrent(
        &self,
        dataset: Arc<Dataset>,
        filters: &AggregationFilters,
    ) -> Result<AggregatedDataset, MatrixError> {
        let resolved = filters.resolve(Utc::now())?;
        let windows = Arc::new(resolved.windows()?);
        let keys = requested_keys(&dataset, &resolved)?;
        info!(
            "Aggregating {} elements concurrently into {} windows",
            keys.len(),
            windows.len()
        );

        let handles: Vec<_> = keys
            .into_iter()
            .map(|key| {
                let matrix = self.clone();
                let dataset = Arc::clone(&dataset);
                let windows = Arc::clone(&windows);
                tokio::task::spawn_blocking(move || {
                    let series = dataset
                        .get(&key)
                        .ok_or_else(|| MatrixError::UnknownElement(key.clone()))?;
                    let aggregated = matrix.aggregate_series(&key, series, &windows)?;
                    Ok::<_, MatrixError>((key, aggregated))
                })
            })
            .collect();

        let mut output = AggregatedDataset::default();
        for handle in handles {
            let (key, aggregated) = handle.await??;
            output.insert(key, aggregated);
        }
        Ok(output)
    }

    fn aggregate_series(
        &self,
        key: &str,
        series: &Series,
        windows: &[Window],
    ) -> Result<AggregatedSeries, MatrixError> {
        let (unit, conversion) = self.conversion_for(key, series)?;
        debug!(
            "Aggregating '{key}' ({} samples, {}, {:?} -> {:?})",
            series.samples().len(),
            series.combination(),
            series.unit(),
            unit
        );

        let mut values = Vec::with_capacity(windows.len());
        for window in windows {
            let selected = select_overlapping(window, series.samples());
            let combined = combine(series.combination(), &selected, series.decoder()).map_err(
                |source| MatrixError::ElementCombine {
                    element: key.to_string(),
                    source,
                },
            )?;
            let value = combined.map(|value| {
                let converted = match conversion {
                    Some(convert) => value.map_numbers(convert),
                    None => value,
                };
                round_value(&converted, series.precision())
            });
            values.push(AggregatedPoint {
                valid_time: window.interval_text(),
                value,
            });
        }

        Ok(AggregatedSeries {
            unit,
            combination: series.combination(),
            name: series.name().map(str::to_string),
            precision: series.precision(),
            values,
        })
    }

    /// The unit the series is reported in and the conversion to get there, if any.
    fn conversion_for(
        &self,
        key: &str,
        series: &Series,
    ) -> Result<(Option<String>, Option<ConversionFn>), MatrixError> {
        let Some(unit) = series.unit() else {
            return Ok((None, None));
        };
        match self.unit_targets.target_for(unit) {
            Some(target) if target != unit => {
                let conversion = self.conversions.lookup(unit, target).map_err(|source| {
                    MatrixError::ElementConversion {
                        element: key.to_string(),
                        source,
                    }
                })?;
                Ok((Some(target.to_string()), Some(conversion)))
            }
            _ => Ok((Some(unit.to_string()), None)),
        }
    }
}

fn requested_keys(dataset: &Dataset, filters: &ResolvedFilters) -> Result<Vec<String>, MatrixError> {
    match &filters.elements {
        Some(elements) => {
            if let Some(missing) = elements.iter().find(|key| dataset.get(key).is_none()) {
                return Err(MatrixError::UnknownElement(missing.clone()));
            }
            let mut keys: Vec<String> = Vec::with_capacity(elements.len());
            for key in elements {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            Ok(keys)
        }
        None => Ok(dataset.element_keys()),
    }
}
