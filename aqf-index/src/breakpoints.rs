//! EPA breakpoint tables.
//!
//! Each pollutant maps to an ordered list of segments. Adding a pollutant is
//! a matter of adding a table here and an arm in [`table`].
//!
//! Units: PM2.5/PM10/O3/NO2/SO2 in μg/m³ as reported by the sensor, CO in mg/m³.

use aqf_data::Pollutant;

/// One piecewise-linear segment: concentrations in `[conc_low, conc_high]`
/// map linearly onto `[aqi_low, aqi_high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub conc_low: f64,
    pub conc_high: f64,
    pub aqi_low: u16,
    pub aqi_high: u16,
}

const fn bp(conc_low: f64, conc_high: f64, aqi_low: u16, aqi_high: u16) -> Breakpoint {
    Breakpoint {
        conc_low,
        conc_high,
        aqi_low,
        aqi_high,
    }
}

pub const PM25: [Breakpoint; 6] = [
    bp(0.0, 12.0, 0, 50),       // Good
    bp(12.1, 35.4, 51, 100),    // Moderate
    bp(35.5, 55.4, 101, 150),   // Unhealthy for Sensitive Groups
    bp(55.5, 150.4, 151, 200),  // Unhealthy
    bp(150.5, 250.4, 201, 300), // Very Unhealthy
    bp(250.5, 500.4, 301, 500), // Hazardous
];

pub const PM10: [Breakpoint; 6] = [
    bp(0.0, 54.0, 0, 50),
    bp(55.0, 154.0, 51, 100),
    bp(155.0, 254.0, 101, 150),
    bp(255.0, 354.0, 151, 200),
    bp(355.0, 424.0, 201, 300),
    bp(425.0, 604.0, 301, 500),
];

pub const O3: [Breakpoint; 5] = [
    bp(0.0, 54.0, 0, 50),
    bp(55.0, 70.0, 51, 100),
    bp(71.0, 85.0, 101, 150),
    bp(86.0, 105.0, 151, 200),
    bp(106.0, 200.0, 201, 300),
];

pub const NO2: [Breakpoint; 5] = [
    bp(0.0, 53.0, 0, 50),
    bp(54.0, 100.0, 51, 100),
    bp(101.0, 360.0, 101, 150),
    bp(361.0, 649.0, 151, 200),
    bp(650.0, 1249.0, 201, 300),
];

pub const SO2: [Breakpoint; 5] = [
    bp(0.0, 35.0, 0, 50),
    bp(36.0, 75.0, 51, 100),
    bp(76.0, 185.0, 101, 150),
    bp(186.0, 304.0, 151, 200),
    bp(305.0, 604.0, 201, 300),
];

pub const CO: [Breakpoint; 5] = [
    bp(0.0, 4.4, 0, 50),
    bp(4.5, 9.4, 51, 100),
    bp(9.5, 12.4, 101, 150),
    bp(12.5, 15.4, 151, 200),
    bp(15.5, 30.4, 201, 300),
];

/// Breakpoint table for a pollutant.
pub fn table(pollutant: Pollutant) -> &'static [Breakpoint] {
    match pollutant {
        Pollutant::Pm25 => &PM25,
        Pollutant::Pm10 => &PM10,
        Pollutant::O3 => &O3,
        Pollutant::No2 => &NO2,
        Pollutant::So2 => &SO2,
        Pollutant::Co => &CO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_ordered_and_contiguous_in_aqi() {
        for pollutant in Pollutant::ALL {
            let segments = table(pollutant);
            assert_eq!(segments[0].conc_low, 0.0);
            assert_eq!(segments[0].aqi_low, 0);
            for s in segments {
                assert!(s.conc_low < s.conc_high, "{pollutant}: {s:?}");
                assert!(s.aqi_low < s.aqi_high, "{pollutant}: {s:?}");
            }
            for pair in segments.windows(2) {
                assert!(pair[0].conc_high < pair[1].conc_low, "{pollutant}");
                assert_eq!(pair[0].aqi_high + 1, pair[1].aqi_low, "{pollutant}");
            }
        }
    }

    #[test]
    fn test_segment_counts() {
        assert_eq!(table(Pollutant::Pm25).len(), 6);
        assert_eq!(table(Pollutant::Pm10).len(), 6);
        for gas in [Pollutant::O3, Pollutant::No2, Pollutant::So2, Pollutant::Co] {
            assert_eq!(table(gas).len(), 5);
        }
    }
}
