//! The weather.gov grid API (`/gridpoints/{wfo}/{x},{y}` plus the `/points/{lat},{lon}`
//! metadata).

use crate::interval::codec::Interval;
use crate::sources::element_config::ELEMENT_CONFIG;
use crate::sources::error::SourceError;
use crate::sources::{
    decoder_for, location_name, Elevation, Location, Provider, SourceForecast,
    DEFAULT_LOCATION_THRESHOLD_METERS,
};
use crate::types::sample::{RawSample, Sample};
use crate::types::series::{Dataset, Series};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(default)]
    geometry: Option<serde_json::Value>,
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperties {
    #[serde(default)]
    update_time: Option<String>,
    #[serde(default)]
    valid_times: Option<String>,
    #[serde(default)]
    elevation: Option<Measurement>,
    #[serde(flatten)]
    elements: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Measurement {
    #[serde(default)]
    unit_code: Option<String>,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(default)]
    uom: Option<String>,
    values: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct PointMetadata {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    #[serde(default)]
    cwa: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    relative_location: Option<RelativeLocation>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocation {
    properties: RelativeLocationProperties,
}

#[derive(Debug, Deserialize)]
struct RelativeLocationProperties {
    city: String,
    state: String,
    #[serde(default)]
    distance: Option<Measurement>,
    #[serde(default)]
    bearing: Option<Measurement>,
}

/// `wmoUnit:degC` becomes `degC`.
fn strip_unit_prefix(uom: &str) -> &str {
    uom.split_once(':').map_or(uom, |(_, unit)| unit)
}

/// Builds a forecast from a gridpoints payload and, if available, the matching point metadata.
///
/// Only configured elements that carry a `values` array are kept; each takes its combination,
/// name and precision from the element configuration.
///
/// # Errors
///
/// [`SourceError::Payload`] if either payload does not have the API layout,
/// [`SourceError::ValidTime`] for an element sample with an unparsable `validTime`.
pub fn dataset_from_raw_forecast(
    raw_forecast: &serde_json::Value,
    point_metadata: Option<&serde_json::Value>,
) -> Result<SourceForecast, SourceError> {
    let raw = RawForecast::deserialize(raw_forecast)?;
    let point = point_metadata.map(PointMetadata::deserialize).transpose()?;

    let mut dataset = Dataset::new();
    for config in ELEMENT_CONFIG {
        let Some(payload) = raw.properties.elements.get(config.key) else {
            continue;
        };
        if payload.get("values").is_none() {
            debug!("Skipping API element '{}' without values", config.key);
            continue;
        }
        let element = RawElement::deserialize(payload)?;
        let samples = element
            .values
            .into_iter()
            .map(Sample::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SourceError::ValidTime {
                element: config.key.to_string(),
                source,
            })?;

        let series = Series::builder()
            .maybe_unit(element.uom.as_deref().map(strip_unit_prefix))
            .combination(config.combination)
            .maybe_precision(config.precision)
            .name(config.name)
            .maybe_decoder(decoder_for(config.combination, Provider::Api))
            .samples(samples)
            .build();
        dataset.insert(config.key, series);
    }

    let valid_times = raw
        .properties
        .valid_times
        .as_deref()
        .map(|text| {
            Interval::parse(text).map_err(|source| SourceError::ValidTimes {
                text: text.to_string(),
                source,
            })
        })
        .transpose()?;

    let elevation = raw.properties.elevation.map(|elevation| Elevation {
        unit_code: elevation.unit_code.as_deref().map(|u| strip_unit_prefix(u).to_string()),
        average: elevation.value,
        ..Elevation::default()
    });
    let properties = point.map(|point| point.properties);
    let name = properties
        .as_ref()
        .and_then(|p| p.relative_location.as_ref())
        .map(|relative| {
            let place = &relative.properties;
            location_name(
                place.distance.as_ref().and_then(|d| d.value).unwrap_or(0.0),
                place.bearing.as_ref().and_then(|b| b.value),
                &place.city,
                &place.state,
                DEFAULT_LOCATION_THRESHOLD_METERS,
            )
        });

    info!("Loaded {} elements from the grid API", dataset.len());
    Ok(SourceForecast {
        update_time: raw.properties.update_time,
        valid_times,
        location: Location {
            geometry: raw.geometry,
            name,
            time_zone: properties.as_ref().and_then(|p| p.time_zone.clone()),
            cwa: properties.as_ref().and_then(|p| p.cwa.clone()),
            elevation: elevation.unwrap_or_default(),
        },
        dataset,
    })
}
