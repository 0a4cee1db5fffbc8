//! Aggregates gridded forecast time series into fixed windows for a threat matrix display.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use threat_matrix::{
//!     AggregationFilters, CombinationKind, Dataset, Interval, Sample, SampleValue, Series,
//!     ThreatMatrix,
//! };
//!
//! let series = Series::builder()
//!     .unit("degC")
//!     .combination(CombinationKind::Max)
//!     .precision(0)
//!     .samples(vec![
//!         Sample::new(Interval::parse("2021-05-12T14:00:00+00:00/PT1H")?, Some(SampleValue::from(9.4))),
//!         Sample::new(Interval::parse("2021-05-12T15:00:00+00:00/PT1H")?, Some(SampleValue::from(12.2))),
//!     ])
//!     .build();
//! let dataset = Dataset::new().with_series("temperature", series);
//!
//! let filters = AggregationFilters::builder()
//!     .start(Utc.with_ymd_and_hms(2021, 5, 12, 12, 0, 0).unwrap())
//!     .end(Utc.with_ymd_and_hms(2021, 5, 13, 0, 0, 0).unwrap())
//!     .periodicity_hours(12)
//!     .build();
//! let matrix = ThreatMatrix::default().aggregate(&dataset, &filters)?;
//! let temperature = matrix.get("temperature").unwrap();
//! assert_eq!(temperature.values[0].valid_time, "2021-05-12T12:00:00+00:00/PT12H");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod combine;
pub mod decode;
mod error;
mod filtering;
mod interval;
mod matrix;
pub mod sources;
mod types;
mod units;

pub use error::MatrixError;
pub use filtering::*;
pub use matrix::ThreatMatrix;

pub use combine::error::CombineError;
pub use combine::kind::CombinationKind;
pub use combine::reducer::combine;

pub use decode::hazard::HazardDecoder;
pub use decode::weather::WeatherDecoder;
pub use decode::{CategoryDecoder, FnDecoder, RecordDecoder};

pub use interval::codec::{format_interval, DurationParts, Interval};
pub use interval::error::IntervalError;
pub use interval::overlap::{select_overlapping, OverlapRelation};
pub use interval::window::{generate_windows, Window};

pub use types::aggregated::{AggregatedDataset, AggregatedPoint, AggregatedSeries};
pub use types::combined::{CategoryRecord, CombinedValue, RangeValue, Reading};
pub use types::into_instant::IntoInstant;
pub use types::sample::{RawSample, Sample, SampleValue};
pub use types::series::{Dataset, Series};

pub use units::conversions::{cardinal, ConversionFn, UnitConversions};
pub use units::error::ConversionError;
pub use units::precision::{round_to, round_value};
pub use units::targets::*;

pub use sources::error::SourceError;
pub use sources::{Elevation, Location, SourceForecast};
