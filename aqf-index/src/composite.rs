//! Composite AQI: per-pollutant sub-indices and the dominant pollutant.

use crate::breakpoints::{self, Breakpoint};
use aqf_data::Pollutant;
use serde::Serialize;
use std::collections::BTreeMap;

/// Upper end of the index scale; concentrations beyond every table clamp here.
pub const AQI_CEILING: u16 = 500;

/// Interpolate a concentration against a breakpoint table.
///
/// The first segment whose upper bound is not below the concentration is
/// used. A concentration that falls in the rounding gap between two
/// segments (e.g. PM2.5 12.05) is lifted to that segment's lower bound, and
/// a negative one is treated as zero, which keeps the result monotonic.
pub fn interpolate(table: &[Breakpoint], concentration: f64) -> u16 {
    let concentration = concentration.max(0.0);
    let segment = match table.iter().find(|s| concentration <= s.conc_high) {
        Some(s) => s,
        None => return AQI_CEILING,
    };
    let c = concentration.max(segment.conc_low);
    let aqi = f64::from(segment.aqi_high - segment.aqi_low)
        / (segment.conc_high - segment.conc_low)
        * (c - segment.conc_low)
        + f64::from(segment.aqi_low);
    (aqi.round() as u16).min(AQI_CEILING)
}

/// AQI of one pollutant, or `None` when the concentration is not a number.
pub fn sub_index(pollutant: Pollutant, concentration: f64) -> Option<u16> {
    if !concentration.is_finite() {
        return None;
    }
    Some(interpolate(breakpoints::table(pollutant), concentration))
}

/// Pollutant → AQI for every pollutant that has a concentration.
///
/// Serializes as a JSON object keyed by pollutant key, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AqiBreakdown(BTreeMap<Pollutant, u16>);

impl AqiBreakdown {
    pub fn get(&self, pollutant: Pollutant) -> Option<u16> {
        self.0.get(&pollutant).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, u16)> + '_ {
        self.0.iter().map(|(p, aqi)| (*p, *aqi))
    }

    /// Highest sub-index. Ties go to the pollutant declared first.
    pub fn dominant(&self) -> Option<(Pollutant, u16)> {
        self.iter().fold(None, |best, (pollutant, aqi)| match best {
            Some((_, best_aqi)) if best_aqi >= aqi => best,
            _ => Some((pollutant, aqi)),
        })
    }
}

/// Compute the breakdown for the latest concentrations.
///
/// Pollutants not listed are absent from the result, never zero.
pub fn aqi_breakdown(latest: &[(Pollutant, f64)]) -> AqiBreakdown {
    let mut map = BTreeMap::new();
    for (pollutant, concentration) in latest {
        match sub_index(*pollutant, *concentration) {
            Some(aqi) => {
                map.insert(*pollutant, aqi);
            }
            None => log::warn!("Skipping non-finite {} concentration", pollutant),
        }
    }
    AqiBreakdown(map)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimaryPollutant {
    pub pollutant: Pollutant,
    pub aqi_value: f64,
}

/// The dominant pollutant, or `pm25` paired with `fallback_aqi` when the
/// breakdown is empty.
pub fn primary_pollutant(breakdown: &AqiBreakdown, fallback_aqi: f64) -> PrimaryPollutant {
    match breakdown.dominant() {
        Some((pollutant, aqi)) => PrimaryPollutant {
            pollutant,
            aqi_value: f64::from(aqi),
        },
        None => PrimaryPollutant {
            pollutant: Pollutant::Pm25,
            aqi_value: fallback_aqi,
        },
    }
}
