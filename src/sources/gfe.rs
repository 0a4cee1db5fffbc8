//! Forecasts exported from GFE (the AWIPS Graphical Forecast Editor). Grids are keyed by GFE grid
//! name (`T`, `Wx`, `QPF`, ...) and use GFE unit spellings.

use crate::combine::kind::CombinationKind;
use crate::sources::element_config::config_for_gfe_grid;
use crate::sources::error::SourceError;
use crate::sources::{decoder_for, Location, Provider, SourceForecast};
use crate::types::sample::{RawSample, Sample};
use crate::types::series::{Dataset, Series};
use log::{info, warn};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GfeForecast {
    #[serde(default)]
    update_time: Option<String>,
    #[serde(default)]
    location: Location,
    #[serde(default)]
    weather_elements: BTreeMap<String, GfeGrid>,
}

#[derive(Debug, Deserialize)]
struct GfeGrid {
    #[serde(default)]
    uom: Option<String>,
    #[serde(default)]
    combination: Option<String>,
    #[serde(default)]
    name: Option<String>,
    /// Outer `None` when the key is absent, inner `None` for an explicit null.
    #[serde(default, deserialize_with = "present")]
    precision: Option<Option<u32>>,
    #[serde(default)]
    values: Vec<RawSample>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Some)
}

impl GfeGrid {
    /// A grid without a known configuration must describe itself completely.
    fn is_self_describing(&self) -> bool {
        self.uom.is_some()
            && self.combination.is_some()
            && self.name.is_some()
            && self.precision.is_some()
    }
}

/// GFE unit spellings to the WMO ones the API uses. Unknown units pass through; counts have
/// no unit.
fn map_gfe_unit(unit: &str) -> Option<String> {
    let unit = unit.to_ascii_lowercase();
    let mapped = match unit.as_str() {
        "f" => "degF",
        "ft" => "ft",
        "count" => return None,
        "in" => "in",
        "%" => "percent",
        "kts" => "kt",
        "nmi*hrs^-1*ft" => "ft_nmi_h-1",
        "sm" => "mi",
        "degree" => "degree_(angle)",
        _ => return Some(unit),
    };
    Some(mapped.to_string())
}

fn parse_combination(element: &str, text: &str) -> Result<CombinationKind, SourceError> {
    text.parse().map_err(|source| SourceError::Combination {
        element: element.to_string(),
        source,
    })
}

/// Builds a forecast from a GFE export.
///
/// A grid named in the element configuration takes that element's key and settings, with any
/// `combination`, `name` or `precision` on the grid itself taking precedence. Other grids are kept
/// under their own name only when they carry `uom`, `combination`, `name` and `precision`;
/// everything else is skipped with a warning. GFE exports have no forecast span, so `valid_times`
/// is the span of the samples.
///
/// # Errors
///
/// [`SourceError::Payload`] if the export does not have the GFE layout,
/// [`SourceError::Combination`] for an unrecognized combination on a grid and
/// [`SourceError::ValidTime`] for a sample with an unparsable `validTime`.
pub fn dataset_from_gfe_forecast(
    gfe_forecast: &serde_json::Value,
) -> Result<SourceForecast, SourceError> {
    let forecast = GfeForecast::deserialize(gfe_forecast)?;

    let mut dataset = Dataset::new();
    for (grid_key, grid) in forecast.weather_elements {
        let (key, combination, name, precision) = match config_for_gfe_grid(&grid_key) {
            Some(config) => {
                let combination = match &grid.combination {
                    Some(text) => parse_combination(config.key, text)?,
                    None => config.combination,
                };
                (
                    config.key.to_string(),
                    combination,
                    grid.name.clone().unwrap_or_else(|| config.name.to_string()),
                    grid.precision.unwrap_or(config.precision),
                )
            }
            None if grid.is_self_describing() => {
                let combination =
                    parse_combination(&grid_key, grid.combination.as_deref().unwrap_or_default())?;
                (
                    grid_key.clone(),
                    combination,
                    grid.name.clone().unwrap_or_default(),
                    grid.precision.flatten(),
                )
            }
            None => {
                warn!(
                    "Weather grid {grid_key} not processed, its configuration is missing or incomplete"
                );
                continue;
            }
        };

        let samples = grid
            .values
            .into_iter()
            .map(Sample::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SourceError::ValidTime {
                element: key.clone(),
                source,
            })?;
        let series = Series::builder()
            .maybe_unit(grid.uom.as_deref().and_then(map_gfe_unit))
            .combination(combination)
            .maybe_precision(precision)
            .name(name)
            .maybe_decoder(decoder_for(combination, Provider::Gfe))
            .samples(samples)
            .build();
        dataset.insert(key, series);
    }

    info!("Loaded {} elements from the GFE export", dataset.len());
    Ok(SourceForecast {
        update_time: forecast.update_time,
        valid_times: dataset.valid_interval(),
        location: forecast.location,
        dataset,
    })
}
