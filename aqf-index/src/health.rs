//! Health guidance keyed by AQI category.

use crate::category::AqiCategory;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthRecommendation {
    pub general: &'static str,
    pub sensitive: &'static str,
    pub activities: &'static str,
    pub precautions: &'static str,
    pub risk_level: RiskLevel,
}

/// One bundle per category, in category order.
const RECOMMENDATIONS: [HealthRecommendation; 6] = [
    HealthRecommendation {
        general: "Air quality is satisfactory and poses little or no risk.",
        sensitive: "No special precautions are needed for sensitive groups.",
        activities: "Ideal conditions for outdoor activities and exercise.",
        precautions: "No precautions necessary.",
        risk_level: RiskLevel::Low,
    },
    HealthRecommendation {
        general: "Air quality is acceptable for most people.",
        sensitive: "Unusually sensitive people should consider limiting prolonged outdoor exertion.",
        activities: "Outdoor activities are fine for most people.",
        precautions: "Sensitive individuals should watch for symptoms such as coughing or shortness of breath.",
        risk_level: RiskLevel::Low,
    },
    HealthRecommendation {
        general: "Members of the general public are less likely to be affected.",
        sensitive: "Children, older adults and people with heart or lung disease should reduce prolonged or heavy outdoor exertion.",
        activities: "Take more breaks during outdoor activities and prefer lighter exercise.",
        precautions: "Keep quick-relief medicine at hand if you have asthma. Consider a mask outdoors.",
        risk_level: RiskLevel::Moderate,
    },
    HealthRecommendation {
        general: "Everyone may begin to experience health effects.",
        sensitive: "Sensitive groups should avoid prolonged or heavy outdoor exertion.",
        activities: "Reschedule strenuous outdoor activities or move them indoors.",
        precautions: "Wear an N95 mask outdoors, keep windows closed and run an air purifier indoors.",
        risk_level: RiskLevel::Moderate,
    },
    HealthRecommendation {
        general: "Health alert: the risk of health effects is increased for everyone.",
        sensitive: "Sensitive groups should avoid all outdoor physical activity.",
        activities: "Everyone should avoid prolonged or heavy outdoor exertion.",
        precautions: "Stay indoors with filtered air, wear an N95 mask if going out and seek medical advice if symptoms appear.",
        risk_level: RiskLevel::High,
    },
    HealthRecommendation {
        general: "Health warning of emergency conditions: everyone is likely to be affected.",
        sensitive: "Sensitive groups should remain indoors and keep activity levels low.",
        activities: "Everyone should avoid all outdoor physical activity.",
        precautions: "Stay indoors, seal windows and doors, use air purifiers and follow public health advisories.",
        risk_level: RiskLevel::Emergency,
    },
];

impl AqiCategory {
    pub fn health_recommendation(&self) -> HealthRecommendation {
        RECOMMENDATIONS[*self as usize]
    }
}

/// Health guidance for an AQI value.
pub fn health_recommendations(aqi: f64) -> HealthRecommendation {
    AqiCategory::from_aqi(aqi).health_recommendation()
}
