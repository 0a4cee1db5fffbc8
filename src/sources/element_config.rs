//! Built-in configuration for the forecast elements both providers publish.

use crate::combine::kind::CombinationKind;
use crate::combine::kind::CombinationKind::*;
use serde::Serialize;

/// How one forecast element is named, combined and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementConfig {
    /// Element key as used by the grid API (`temperature`, `windSpeed`, ...).
    pub key: &'static str,
    /// Name of the matching GFE grid, if GFE produces one.
    pub gfe_grid: Option<&'static str>,
    pub combination: CombinationKind,
    pub name: &'static str,
    pub precision: Option<u32>,
}

impl ElementConfig {
    const fn new(
        key: &'static str,
        gfe_grid: Option<&'static str>,
        combination: CombinationKind,
        name: &'static str,
        precision: Option<u32>,
    ) -> Self {
        Self {
            key,
            gfe_grid,
            combination,
            name,
            precision,
        }
    }
}

/// Every configured element, in lookup order. GFE grids are matched against this list top to
/// bottom and the first hit wins.
pub static ELEMENT_CONFIG: &[ElementConfig] = &[
    ElementConfig::new("temperature", Some("T"), Max, "Temperature", Some(0)),
    ElementConfig::new("skyCover", Some("Sky"), Max, "Sky Cover", Some(0)),
    ElementConfig::new("dewpoint", Some("Td"), Min, "Dew Point", Some(0)),
    ElementConfig::new("maxTemperature", Some("MaxT"), Max, "Maximum Temperature", Some(0)),
    ElementConfig::new("minTemperature", Some("MinT"), Min, "Minimum Temperature", Some(0)),
    ElementConfig::new("relativeHumidity", Some("RH"), Min, "Relative Humidity", Some(0)),
    ElementConfig::new("maxRelativeHumidity", Some("MaxRH"), Max, "Maximum Relative Humidity", Some(0)),
    ElementConfig::new("minRelativeHumidity", Some("MinRH"), Min, "Minimum Relative Humidity", Some(0)),
    ElementConfig::new("apparentTemperature", Some("ApparentT"), Max, "Apparent Temperature", Some(0)),
    ElementConfig::new("heatIndex", Some("HeatIndex"), Max, "Heat Index", Some(0)),
    ElementConfig::new("windChill", Some("WindChill"), Min, "Wind Chill", Some(0)),
    ElementConfig::new("windDirection", Some("WindDirection"), Range, "Wind Direction", Some(0)),
    ElementConfig::new("windSpeed", Some("WindSpeed"), Max, "Wind Speed", Some(0)),
    ElementConfig::new("windGust", Some("WindGust"), Max, "Wind Gust Speed", Some(0)),
    ElementConfig::new("weather", Some("Wx"), WeatherConcat, "Weather Conditions", None),
    ElementConfig::new("hazards", Some("Hazards"), HazardConcat, "NWS Hazardous Weather Products", None),
    ElementConfig::new("probabilityOfPrecipitation", Some("PoP"), Max, "Probability of Precipitation", Some(0)),
    ElementConfig::new("quantitativePrecipitation", Some("QPF"), Add, "Liquid Precipitation Amount", Some(2)),
    ElementConfig::new("iceAccumulation", Some("IceAccum"), Add, "Ice Accumulation", Some(2)),
    ElementConfig::new("snowfallAmount", Some("SnowAmt"), Add, "Snow Accumulation", Some(1)),
    ElementConfig::new("snowLevel", Some("SnowLevel"), Min, "Snow Level", Some(0)),
    ElementConfig::new("ceilingHeight", Some("CigHgt"), Min, "Ceiling Height", Some(0)),
    ElementConfig::new("visibility", Some("Vsby"), Min, "Visibility", Some(0)),
    ElementConfig::new("probabilityOfThunder", Some("PotThunder"), Max, "Probability of Thunder", Some(0)),
    ElementConfig::new("potentialOf15mphWinds", None, Max, "Probability of > 15mph Wind Speeds", Some(0)),
    ElementConfig::new("potentialOf25mphWinds", None, Max, "Probability of > 25mph Wind Speeds", Some(0)),
    ElementConfig::new("potentialOf35mphWinds", None, Max, "Probability of > 35mph Wind Speeds", Some(0)),
    ElementConfig::new("potentialOf45mphWinds", None, Max, "Probability of > 45mph Wind Speeds", Some(0)),
    ElementConfig::new("potentialOf20mphWindGusts", None, Max, "Probability of > 20mph Wind Gusts", Some(0)),
    ElementConfig::new("potentialOf30mphWindGusts", None, Max, "Probability of > 30mph Wind Gusts", Some(0)),
    ElementConfig::new("potentialOf40mphWindGusts", None, Max, "Probability of > 40mph Wind Gusts", Some(0)),
    ElementConfig::new("potentialOf50mphWindGusts", None, Max, "Probability of > 50mph Wind Gusts", Some(0)),
    ElementConfig::new("potentialOf60mphWindGusts", None, Max, "Probability of > 60mph Wind Gusts", Some(0)),
    ElementConfig::new("stability", Some("Stability"), Max, "Stability", Some(0)),
    ElementConfig::new("redFlagThreatIndex", None, Max, "Red Flag Threat Index", Some(0)),
    ElementConfig::new("dispersionIndex", None, Max, "", Some(0)),
    ElementConfig::new("transportWindSpeed", Some("TransWindSpeed"), Min, "Transport Wind Speed", Some(0)),
    ElementConfig::new("transportWindDirection", Some("TransWindDirection"), Range, "Transport Wind Direction", Some(0)),
    ElementConfig::new("mixingHeight", Some("MixHgt"), Min, "Mixing Height", Some(0)),
    ElementConfig::new("hainesIndex", Some("Haines"), Max, "Haines Index", Some(0)),
    ElementConfig::new("lightningActivityLevel", Some("LAL"), Max, "Lightning Activity Level", Some(0)),
    ElementConfig::new("twentyFootWindSpeed", Some("Wind20ftSpeed"), Max, "Twenty Foot Wind Speed", Some(0)),
    ElementConfig::new("twentyFootWindDirection", Some("Wind20ftDirection"), Range, "Twenty Foot Wind Direction", Some(0)),
    ElementConfig::new("grasslandFireDangerIndex", None, Max, "Grassland Fire Danger Index", Some(0)),
    ElementConfig::new("davisStabilityIndex", None, Max, "Davis Stability Index", Some(0)),
    ElementConfig::new("atmosphericDispersionIndex", None, Min, "Atmospheric Dispersion Index", Some(0)),
    ElementConfig::new("lowVisibilityOccurrenceRiskIndex", None, Max, "Low Visibility Occurrence Risk Index (LVORI)", Some(0)),
    ElementConfig::new("pressure", None, Min, "Pressure", Some(0)),
    ElementConfig::new("probabilityOfTropicalStormWinds", None, Max, "Probability of Tropical Storm Strength Winds", Some(0)),
    ElementConfig::new("probabilityOfHurricaneWinds", None, Max, "Probability of Hurricane Strength Winds", Some(0)),
    ElementConfig::new("waveHeight", Some("WaveHeight"), Max, "Wave Height", Some(1)),
    ElementConfig::new("wavePeriod", Some("Period"), Max, "Primary Wave Period", Some(1)),
    ElementConfig::new("primarySwellHeight", Some("Swell"), Range, "Primary Swell Height", Some(1)),
    ElementConfig::new("primarySwellDirection", Some("Swell"), Range, "Primary Swell Direction", Some(0)),
    ElementConfig::new("secondarySwellHeight", Some("Swell2"), Range, "Secondary Swell Height", Some(1)),
    ElementConfig::new("secondarySwellDirection", Some("Swell2"), Range, "Secondary Swell Direction", Some(0)),
    ElementConfig::new("wavePeriod2", Some("T"), Max, "Secondary Wave Period", Some(1)),
    ElementConfig::new("windWaveHeight", Some("Period2"), Max, "Wind Wave Height", Some(1)),
];

/// The configuration for an API element key.
pub fn config_for_key(key: &str) -> Option<&'static ElementConfig> {
    ELEMENT_CONFIG.iter().find(|config| config.key == key)
}

/// The first configuration naming `grid` as its GFE grid.
pub fn config_for_gfe_grid(grid: &str) -> Option<&'static ElementConfig> {
    ELEMENT_CONFIG
        .iter()
        .find(|config| config.gfe_grid == Some(grid))
}
