//! Decodes NWS valid-time event codes (VTEC phenomenon + significance) into hazard names such
//! as "High Wind Warning", identically for the grid API and for GFE.

use crate::decode::CategoryDecoder;
use crate::types::combined::CategoryRecord;
use log::warn;

/// The significance half of a hazard code.
///
/// Variants are ordered by rank, so a warning outranks a watch of the same hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Significance {
    /// Code `S`.
    Statement = 0,
    /// Code `Y`.
    Advisory = 1,
    /// Code `A`.
    Watch = 2,
    /// Code `W`.
    Warning = 3,
}

impl Significance {
    /// Case-insensitive lookup of a one-letter significance code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "s" => Some(Significance::Statement),
            "y" => Some(Significance::Advisory),
            "a" => Some(Significance::Watch),
            "w" => Some(Significance::Warning),
            _ => None,
        }
    }

    pub fn word(&self) -> &'static str {
        match self {
            Significance::Statement => "Statement",
            Significance::Advisory => "Advisory",
            Significance::Watch => "Watch",
            Significance::Warning => "Warning",
        }
    }

    pub fn rank(&self) -> i32 {
        *self as i32
    }
}

/// How a phenomenon is named.
enum Naming {
    /// Name followed by the significance word, with per-significance name overrides.
    Regular {
        name: &'static str,
        overrides: &'static [(Significance, &'static str)],
    },
    /// Products whose full title already implies the significance.
    Fixed(&'static [(Significance, &'static str)]),
}

fn naming(phenomenon: &str) -> Option<Naming> {
    use Significance::*;
    let regular = |name| Naming::Regular {
        name,
        overrides: &[],
    };
    let naming = match phenomenon {
        "af" => regular("Ashfall"),
        "as" => regular("Air Stagnation"),
        "av" => regular("Avalanche"),
        "bh" => regular("Beach Hazard"),
        "bs" => regular("Blowing Snow"),
        "bw" => regular("Brisk Wind"),
        "bz" => regular("Blizzard"),
        "cf" => regular("Coastal Flood"),
        "ds" => regular("Dust Storm"),
        "du" => regular("Blowing Dust"),
        "ec" => regular("Extreme Cold"),
        "eh" => regular("Excessive Heat"),
        "ew" => regular("Extreme Wind"),
        "fa" => regular("Flood"),
        "ff" => regular("Flash Flood"),
        "fg" => regular("Dense Fog"),
        "fl" => regular("Flood"),
        "fr" => regular("Frost"),
        "fw" => Naming::Regular {
            name: "Fire Weather",
            overrides: &[(Warning, "Red Flag")],
        },
        "fz" => regular("Freeze"),
        "gl" => regular("Gale"),
        "hf" => regular("Hurricane Force Wind"),
        "hi" => regular("Hurricane Wind"),
        "hs" => regular("Heavy Snow"),
        "ht" => regular("Heat"),
        "hu" => Naming::Regular {
            name: "Hurricane",
            overrides: &[(Statement, "Hurricane Local")],
        },
        "hw" => regular("High Wind"),
        "hz" => regular("Hard Freeze"),
        "ip" => regular("Sleet"),
        "is" => regular("Ice Storm"),
        "lb" => regular("Lake Effect Snow and Blowing Snow"),
        "le" => regular("Lake Effect Snow"),
        "lo" => regular("Low Water"),
        "ls" => regular("Lakeshore Flood"),
        "lw" => regular("Lake Wind"),
        "ma" => Naming::Regular {
            name: "Marine Weather",
            overrides: &[(Statement, "Special Marine")],
        },
        "mf" => regular("Dense Fog"),
        "mh" => regular("Ashfall"),
        "ms" => regular("Dense Smoke"),
        "rb" => Naming::Fixed(&[(Advisory, "Small Craft Advisory for Rough Bar")]),
        "rp" => regular("Rip Current"),
        "sb" => regular("Snow and Blowing Snow"),
        "sc" => regular("Small Craft"),
        "se" => regular("Hazardous Seas"),
        "si" => Naming::Fixed(&[(Advisory, "Small Craft Advisory For Winds")]),
        "sm" => regular("Dense Smoke"),
        "sn" => regular("Snow Advisory"),
        "sq" => regular("Snow Squall"),
        "sr" => regular("Storm"),
        "ss" => regular("Storm Surge"),
        "su" => regular("High Surf"),
        "sv" => regular("Severe Thunderstorm"),
        "sw" => Naming::Fixed(&[(Advisory, "Small Craft Advisory For Hazardous Seas")]),
        "ti" => regular("Tropical Storm Wind"),
        "to" => regular("Tornado"),
        "tr" => Naming::Regular {
            name: "Tropical Storm",
            overrides: &[(Statement, "Tropical Storm Local")],
        },
        "ts" => regular("Tsunami"),
        "ty" => Naming::Regular {
            name: "Typhoon",
            overrides: &[(Statement, "Typhoon Local")],
        },
        "up" => Naming::Regular {
            name: "Heavy Freezing Spray",
            overrides: &[(Advisory, "Freezing Spray")],
        },
        "wc" => regular("Wind Chill"),
        "wi" => regular("Wind"),
        "ws" => regular("Winter Storm"),
        "ww" => regular("Winter Weather"),
        "zf" => regular("Freezing Fog"),
        "zr" => regular("Freezing Rain"),
        _ => return None,
    };
    Some(naming)
}

/// Full product name of a phenomenon/significance pair, e.g. `("HW", "W")` is
/// "High Wind Warning". Codes are case-insensitive.
pub fn hazard_text(phenomenon: &str, significance: &str) -> Option<String> {
    let phenomenon = phenomenon.to_ascii_lowercase();
    let Some(significance) = Significance::from_code(significance) else {
        warn!("Hazard {phenomenon} has unrecognized significance '{significance}'");
        return None;
    };
    let Some(naming) = naming(&phenomenon) else {
        warn!("Hazard '{phenomenon}' is not a recognized phenomenon");
        return None;
    };
    let lookup = |table: &[(Significance, &'static str)]| {
        table
            .iter()
            .find(|(sig, _)| *sig == significance)
            .map(|(_, text)| *text)
    };

    match naming {
        Naming::Regular { name, overrides } => {
            let name = lookup(overrides).unwrap_or(name);
            Some(format!("{name} {}", significance.word()))
        }
        Naming::Fixed(table) => lookup(table).map(str::to_string),
    }
}

/// A decoded hazard record; the product name doubles as the record category.
pub fn hazard_record(phenomenon: &str, significance: &str) -> Option<CategoryRecord> {
    let text = hazard_text(phenomenon, significance)?;
    let rank = Significance::from_code(significance)?.rank();
    Some(CategoryRecord::new(text.clone(), text, rank))
}

/// Hazard payload flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardDecoder {
    /// Grid API objects: `{"phenomenon": "HW", "significance": "W", "event_number": null}`.
    Api,
    /// GFE hazard keys: `"HW.W"`, several joined with `^`.
    Gfe,
}

impl CategoryDecoder for HazardDecoder {
    fn decode(&self, payload: &serde_json::Value) -> Option<CategoryRecord> {
        self.decode_all(payload).into_iter().next()
    }

    fn decode_all(&self, payload: &serde_json::Value) -> Vec<CategoryRecord> {
        match self {
            HazardDecoder::Api => {
                let phenomenon = payload.get("phenomenon").and_then(|v| v.as_str());
                let significance = payload.get("significance").and_then(|v| v.as_str());
                match (phenomenon, significance) {
                    (Some(phenomenon), Some(significance)) => {
                        hazard_record(phenomenon, significance).into_iter().collect()
                    }
                    _ => Vec::new(),
                }
            }
            HazardDecoder::Gfe => payload
                .as_str()
                .map(|key| {
                    key.split('^')
                        .filter_map(|code| {
                            let (phenomenon, significance) = code.trim().split_once('.')?;
                            hazard_record(phenomenon, significance)
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
