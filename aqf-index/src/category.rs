use serde::Serialize;

/// EPA AQI category. Brackets are upper-inclusive: 50 is still Good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    /// Category of an AQI value. NaN is treated as 0, matching the
    /// response-wide substitution of non-finite numbers.
    pub fn from_aqi(aqi: f64) -> AqiCategory {
        let aqi = if aqi.is_nan() { 0.0 } else { aqi };
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            AqiCategory::Unhealthy
        } else if aqi <= 300.0 {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Display color as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "#00e400",
            AqiCategory::Moderate => "#ffff00",
            AqiCategory::UnhealthyForSensitiveGroups => "#ff7e00",
            AqiCategory::Unhealthy => "#ff0000",
            AqiCategory::VeryUnhealthy => "#8f3f97",
            AqiCategory::Hazardous => "#7e0023",
        }
    }

    /// Strength of the white haze blended over a reference photo.
    pub fn haze_intensity(&self) -> u8 {
        match self {
            AqiCategory::Good => 0,
            AqiCategory::Moderate => 30,
            AqiCategory::UnhealthyForSensitiveGroups => 60,
            AqiCategory::Unhealthy => 100,
            AqiCategory::VeryUnhealthy => 150,
            AqiCategory::Hazardous => 200,
        }
    }
}

/// `(category label, color)` for an AQI value.
pub fn classify(aqi: f64) -> (&'static str, &'static str) {
    let category = AqiCategory::from_aqi(aqi);
    (category.label(), category.color())
}

/// Haze overlay intensity for an AQI value, consumed by image rendering.
pub fn haze_intensity(aqi: f64) -> u8 {
    AqiCategory::from_aqi(aqi).haze_intensity()
}
