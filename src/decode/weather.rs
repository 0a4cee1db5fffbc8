//! Decodes coverage/intensity/weather triples into readable phrases such as
//! "Chance of Heavy Rain", so grid API objects and GFE weather strings produce the same text.

use crate::decode::CategoryDecoder;
use crate::types::combined::CategoryRecord;
use log::warn;

/// Coverage (how likely or how widespread) and its priority when the same weather appears in
/// one window more than once.
fn coverage(flavour: WeatherDecoder, code: &str) -> Option<(i32, &'static str)> {
    let entry = match (flavour, code) {
        (_, "patchy") => (0, "Patchy"),
        (_, "areas") => (1, "Areas of"),
        (_, "wide" | "widespread") => (3, "Widespread"),
        (WeatherDecoder::Gfe, "iso") | (WeatherDecoder::Api, "isolated") => (0, "Isolated"),
        (WeatherDecoder::Gfe, "sct") | (WeatherDecoder::Api, "scattered") => (1, "Scattered"),
        (WeatherDecoder::Gfe, "num") | (WeatherDecoder::Api, "numerous") => (2, "Numerous"),
        (WeatherDecoder::Gfe, "schc") | (WeatherDecoder::Api, "slight_chance") => {
            (0, "Slight Chance of")
        }
        (WeatherDecoder::Gfe, "chc") | (WeatherDecoder::Api, "chance") => (1, "Chance of"),
        (WeatherDecoder::Gfe, "lkly") | (WeatherDecoder::Api, "likely") => (2, "Likely"),
        (WeatherDecoder::Gfe, "def") | (WeatherDecoder::Api, "definite") => (3, ""),
        (WeatherDecoder::Gfe, "ocnl") | (WeatherDecoder::Api, "occasional") => (0, "Occasional"),
        (WeatherDecoder::Gfe, "frq") | (WeatherDecoder::Api, "frequent") => (1, "Frequent"),
        (WeatherDecoder::Gfe, "brf") | (WeatherDecoder::Api, "brief") => (2, "Brief"),
        (WeatherDecoder::Gfe, "pds") | (WeatherDecoder::Api, "periods") => (3, "Periods of"),
        (WeatherDecoder::Gfe, "inter") | (WeatherDecoder::Api, "intermittent") => {
            (4, "Intermittent")
        }
        _ => return None,
    };
    Some(entry)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intensity {
    VeryLight,
    Light,
    Moderate,
    Heavy,
}

impl Intensity {
    fn from_code(flavour: WeatherDecoder, code: &str) -> Option<Self> {
        match (flavour, code) {
            (WeatherDecoder::Gfe, "--") | (WeatherDecoder::Api, "very_light") => {
                Some(Intensity::VeryLight)
            }
            (WeatherDecoder::Gfe, "-") | (WeatherDecoder::Api, "light") => Some(Intensity::Light),
            (WeatherDecoder::Gfe, "m") | (WeatherDecoder::Api, "moderate") => {
                Some(Intensity::Moderate)
            }
            (WeatherDecoder::Gfe, "+") | (WeatherDecoder::Api, "heavy") => Some(Intensity::Heavy),
            _ => None,
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Intensity::VeryLight => "Very Light",
            Intensity::Light => "Light",
            Intensity::Moderate => "Moderate",
            Intensity::Heavy => "Heavy",
        }
    }
}

/// Weather name, plus an intensity-specific phrase replacing "<intensity> <name>" if any.
fn weather(flavour: WeatherDecoder, code: &str) -> Option<(&'static str, Option<(Intensity, &'static str)>)> {
    let gfe = flavour == WeatherDecoder::Gfe;
    let entry = match code {
        "t" if gfe => ("Thunderstorms", Some((Intensity::Heavy, "Severe Thunderstorms"))),
        "thunderstorms" if !gfe => ("Thunderstorms", Some((Intensity::Heavy, "Severe Thunderstorms"))),
        "s" if gfe => ("Snow", Some((Intensity::VeryLight, "Snow Flurries"))),
        "snow" if !gfe => ("Snow", Some((Intensity::VeryLight, "Snow Flurries"))),
        "sw" if gfe => ("Snow Showers", Some((Intensity::VeryLight, "Snow Flurries"))),
        "snow_showers" if !gfe => ("Snow Showers", Some((Intensity::VeryLight, "Snow Flurries"))),
        _ => {
            let name = if gfe {
                match code {
                    "wp" => "Waterspouts",
                    "r" => "Rain",
                    "rw" => "Rain Showers",
                    "l" => "Drizzle",
                    "zr" => "Freezing Rain",
                    "zl" => "Freezing Drizzle",
                    "ip" => "Sleet",
                    "if" => "Ice Fog",
                    "ic" => "Ice Crystals",
                    "f" => "Fog",
                    "zf" => "Freezing Fog",
                    "h" => "Haze",
                    "bs" => "Blowing Snow",
                    "bn" => "Blowing Sand",
                    "k" => "Smoke",
                    "bd" => "Blowing Dust",
                    "fr" => "Frost",
                    "zy" => "Freezing Spray",
                    "va" => "Volcanic Ash",
                    _ => return None,
                }
            } else {
                match code {
                    "waterspouts" => "Waterspouts",
                    "rain" => "Rain",
                    "rain_showers" => "Rain Showers",
                    "drizzle" => "Drizzle",
                    "freezing_rain" => "Freezing Rain",
                    "freezing_drizzle" => "Freezing Drizzle",
                    "ice_pellets" => "Sleet",
                    "ice_fog" => "Ice Fog",
                    "ice_crystals" => "Ice Crystals",
                    "fog" => "Fog",
                    "freezing_fog" => "Freezing Fog",
                    "haze" => "Haze",
                    "blowing_snow" => "Blowing Snow",
                    "blowing_sand" => "Blowing Sand",
                    "smoke" => "Smoke",
                    "blowing_dust" => "Blowing Dust",
                    "frost" => "Frost",
                    "freezing_spray" => "Freezing Spray",
                    "volcanic_ash" => "Volcanic Ash",
                    _ => return None,
                }
            };
            (name, None)
        }
    };
    Some(entry)
}

/// Weather payload flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherDecoder {
    /// Grid API objects: `{"coverage": "chance", "weather": "rain", "intensity": "light"}`.
    Api,
    /// GFE weather keys: `"Chc:R:-:<NoVis>:"`, several joined with `^`.
    Gfe,
}

impl WeatherDecoder {
    /// Builds the record for one coverage/weather/intensity triple. Codes are case-insensitive;
    /// an unknown weather code yields `None`, unknown coverage or intensity codes are ignored.
    pub fn parse(
        &self,
        coverage_code: Option<&str>,
        weather_code: &str,
        intensity_code: Option<&str>,
    ) -> Option<CategoryRecord> {
        let weather_code = weather_code.to_ascii_lowercase();
        let Some((name, alternate)) = weather(*self, &weather_code) else {
            warn!("Weather '{weather_code}' is not a recognized weather type");
            return None;
        };

        let intensity = intensity_code
            .map(str::to_ascii_lowercase)
            .and_then(|code| Intensity::from_code(*self, &code));
        let category = match (intensity, alternate) {
            (Some(intensity), Some((alt_intensity, phrase))) if intensity == alt_intensity => {
                phrase.to_string()
            }
            (Some(intensity), _) => format!("{} {name}", intensity.text()),
            (None, _) => name.to_string(),
        };

        let coverage = coverage_code
            .map(str::to_ascii_lowercase)
            .and_then(|code| coverage(*self, &code));
        let (priority, text) = match coverage {
            Some((priority, coverage_text)) => {
                (priority, format!("{coverage_text} {category}").trim().to_string())
            }
            None => (0, category.clone()),
        };
        Some(CategoryRecord::new(category, text, priority))
    }

    fn decode_gfe_part(&self, part: &str) -> Option<CategoryRecord> {
        let mut fields = part.split(':').map(|field| {
            let field = field.trim();
            let lower = field.to_ascii_lowercase();
            let is_null = field.is_empty() || (lower.starts_with("<no") && lower.ends_with('>'));
            (!is_null).then_some(field)
        });
        let coverage = fields.next().flatten();
        let weather = fields.next().flatten()?;
        let intensity = fields.next().flatten();
        self.parse(coverage, weather, intensity)
    }
}

impl CategoryDecoder for WeatherDecoder {
    fn decode(&self, payload: &serde_json::Value) -> Option<CategoryRecord> {
        self.decode_all(payload).into_iter().next()
    }

    fn decode_all(&self, payload: &serde_json::Value) -> Vec<CategoryRecord> {
        match self {
            WeatherDecoder::Api => {
                let field = |key: &str| payload.get(key).and_then(|v| v.as_str());
                field("weather")
                    .and_then(|weather| self.parse(field("coverage"), weather, field("intensity")))
                    .into_iter()
                    .collect()
            }
            WeatherDecoder::Gfe => payload
                .as_str()
                .map(|key| {
                    key.split('^')
                        .filter_map(|part| self.decode_gfe_part(part))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
