use serde::{Deserialize, Serialize};
use std::fmt;

/// The six pollutants the index understands.
///
/// Declaration order is significant: it is the iteration order of every
/// per-pollutant map and therefore the tie-break order when two pollutants
/// share the highest AQI.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Canonical field name, also the JSON key.
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Concentration unit expected in the dataset.
    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "μg/m³",
        }
    }

    /// Accepted header spellings, compared after lowercasing and trimming.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Pollutant::Pm25 => &[
                "pm25", "pm2.5", "pm2_5", "pm_25", "pm 2.5", "pm2.5 (μg/m³)", "aqi", "air_quality",
                "air quality",
            ],
            Pollutant::Pm10 => &["pm10", "pm_10", "pm 10", "pm10 (μg/m³)"],
            Pollutant::O3 => &["o3", "ozone"],
            Pollutant::No2 => &["no2", "nitrogen_dioxide", "nitrogen dioxide"],
            Pollutant::So2 => &["so2", "sulfur_dioxide", "sulphur_dioxide", "sulfur dioxide"],
            Pollutant::Co => &["co", "carbon_monoxide", "carbon monoxide"],
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
