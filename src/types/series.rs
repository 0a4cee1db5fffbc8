use crate::combine::error::CombineError;
use crate::combine::kind::CombinationKind;
use crate::decode::CategoryDecoder;
use crate::error::MatrixError;
use crate::interval::codec::Interval;
use crate::types::sample::Sample;
use bon::bon;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One forecast element: its samples plus the metadata telling the aggregator how to fold,
/// convert and round them.
///
/// Samples are kept sorted by start. The combination kind can only be changed through
/// [`Series::change_combination`]; everything else is fixed at construction.
#[derive(Debug, Clone)]
pub struct Series {
    unit: Option<String>,
    combination: CombinationKind,
    precision: Option<u32>,
    name: Option<String>,
    decoder: Option<Arc<dyn CategoryDecoder>>,
    samples: Vec<Sample>,
}

#[bon]
impl Series {
    /// # Examples
    ///
    /// ```
    /// use threat_matrix::{CombinationKind, Interval, Sample, SampleValue, Series};
    ///
    /// let series = Series::builder()
    ///     .unit("degC")
    ///     .combination(CombinationKind::Max)
    ///     .precision(0)
    ///     .name("Temperature")
    ///     .samples(vec![Sample::new(
    ///         Interval::parse("2021-05-12T14:00:00+00:00/PT1H").unwrap(),
    ///         Some(SampleValue::Number(21.5)),
    ///     )])
    ///     .build();
    /// assert_eq!(series.unit(), Some("degC"));
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] unit: Option<String>,
        combination: CombinationKind,
        precision: Option<u32>,
        #[builder(into)] name: Option<String>,
        decoder: Option<Arc<dyn CategoryDecoder>>,
        #[builder(default)] samples: Vec<Sample>,
    ) -> Self {
        let mut samples = samples;
        samples.sort_by_key(|sample| sample.interval.start);
        Self {
            unit,
            combination,
            precision,
            name,
            decoder,
            samples,
        }
    }
}

impl Series {
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn combination(&self) -> CombinationKind {
        self.combination
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn decoder(&self) -> Option<&dyn CategoryDecoder> {
        self.decoder.as_deref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Switches to another numeric or plain-list combination.
    ///
    /// # Errors
    ///
    /// [`CombineError::NotReassignable`] for `hazardConcat` and `weatherConcat`.
    pub fn change_combination(&mut self, kind: CombinationKind) -> Result<(), CombineError> {
        if !kind.is_reassignable() {
            return Err(CombineError::NotReassignable(kind));
        }
        self.combination = kind;
        Ok(())
    }

    /// Span from the first sample start to the latest sample end.
    pub fn valid_interval(&self) -> Option<Interval> {
        let start = self.samples.first()?.interval.start;
        let end = self.samples.iter().map(|s| s.interval.end).max()?;
        Some(Interval { start, end })
    }
}

/// Forecast elements keyed by element name (`temperature`, `windSpeed`, ...).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    elements: BTreeMap<String, Series>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, series: Series) -> Option<Series> {
        self.elements.insert(key.into(), series)
    }

    pub fn with_series(mut self, key: impl Into<String>, series: Series) -> Self {
        self.insert(key, series);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.elements.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Series> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every element key, in key order. This is what gets aggregated when no element list is
    /// requested.
    pub fn element_keys(&self) -> Vec<String> {
        self.elements.keys().cloned().collect()
    }

    /// # Errors
    ///
    /// [`MatrixError::UnknownElement`] if `key` is absent, [`CombineError::NotReassignable`]
    /// (wrapped) for categorical kinds.
    pub fn change_combination(
        &mut self,
        key: &str,
        kind: CombinationKind,
    ) -> Result<(), MatrixError> {
        let series = self
            .elements
            .get_mut(key)
            .ok_or_else(|| MatrixError::UnknownElement(key.to_string()))?;
        series.change_combination(kind)?;
        Ok(())
    }

    /// Earliest sample start to latest sample end across all elements.
    pub fn valid_interval(&self) -> Option<Interval> {
        self.elements
            .values()
            .filter_map(Series::valid_interval)
            .reduce(|a, b| Interval {
                start: a.start.min(b.start),
                end: a.end.max(b.end),
            })
    }
}

impl<K: Into<String>> FromIterator<(K, Series)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, Series)>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = (&'a String, &'a Series);
    type IntoIter = btree_map::Iter<'a, String, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
