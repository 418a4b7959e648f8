use crate::config::Thresholds;
use crate::domain::{suggestion_id, LatestReadings, SensorCategory, Severity, Suggestion};

// Fixed rule-table bounds. Ranges are inclusive; < and > are strict.
// The two low bounds that varied across source revisions live in
// `Thresholds` instead.
pub const PH_ACIDIC_BELOW: f64 = 6.0;
pub const PH_ALKALINE_ABOVE: f64 = 8.0;
pub const PH_OPTIMAL_MIN: f64 = 6.5;
pub const PH_OPTIMAL_MAX: f64 = 7.5;

pub const TEMP_HEAT_STRESS_ABOVE_C: f64 = 35.0;
pub const TEMP_IDEAL_MIN_C: f64 = 20.0;
pub const TEMP_IDEAL_MAX_C: f64 = 28.0;

pub const MOISTURE_WATERLOGGED_ABOVE_PCT: f64 = 80.0;
pub const MOISTURE_IDEAL_MIN_PCT: f64 = 50.0;
pub const MOISTURE_IDEAL_MAX_PCT: f64 = 70.0;

pub const EC_LOW_BELOW_MS_CM: f64 = 0.5;
pub const EC_SALT_STRESS_ABOVE_MS_CM: f64 = 2.5;
pub const EC_OPTIMAL_MIN_MS_CM: f64 = 1.2;
pub const EC_OPTIMAL_MAX_MS_CM: f64 = 2.0;

/// Outcome of matching one reading against its category's rule table
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    /// Stable band name used in suggestion ids (e.g. "too_acidic")
    pub band: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub description: String,
    pub recommended_action: Option<&'static str>,
}

/// Match a value against the rule table for its category.
///
/// Each table is ordered and the first matching band wins; a reading never
/// produces more than one hit. Values falling between bands, and unknown
/// categories, produce no hit at all.
pub fn evaluate(category: SensorCategory, value: f64, thresholds: &Thresholds) -> Option<RuleHit> {
    match category {
        SensorCategory::Ph => evaluate_ph(value),
        SensorCategory::Temperature => evaluate_temperature(value, thresholds),
        SensorCategory::Moisture => evaluate_moisture(value, thresholds),
        SensorCategory::Conductivity => evaluate_conductivity(value),
        SensorCategory::Unknown => None,
    }
}

fn evaluate_ph(value: f64) -> Option<RuleHit> {
    if value < PH_ACIDIC_BELOW {
        Some(RuleHit {
            band: "too_acidic",
            severity: Severity::Critical,
            title: "Soil Too Acidic",
            description: format!(
                "Soil pH is {:.1}, below the healthy minimum of {:.1}. Acidic soil locks nutrients away from roots.",
                value, PH_ACIDIC_BELOW
            ),
            recommended_action: Some("Apply agricultural lime to raise soil pH."),
        })
    } else if value > PH_ALKALINE_ABOVE {
        Some(RuleHit {
            band: "too_alkaline",
            severity: Severity::Warning,
            title: "Soil Too Alkaline",
            description: format!(
                "Soil pH is {:.1}, above the healthy maximum of {:.1}. Alkaline soil reduces iron and phosphorus uptake.",
                value, PH_ALKALINE_ABOVE
            ),
            recommended_action: Some("Work in elemental sulfur or organic matter to lower soil pH."),
        })
    } else if (PH_OPTIMAL_MIN..=PH_OPTIMAL_MAX).contains(&value) {
        Some(RuleHit {
            band: "optimal",
            severity: Severity::Success,
            title: "Soil pH Optimal",
            description: format!("Soil pH is {:.1}, right in the optimal range for most crops.", value),
            recommended_action: None,
        })
    } else {
        None
    }
}

fn evaluate_temperature(value: f64, thresholds: &Thresholds) -> Option<RuleHit> {
    if value < thresholds.temp_low_c {
        Some(RuleHit {
            band: "cold_stress",
            severity: Severity::Warning,
            title: "Low Temperature",
            description: format!(
                "Temperature is {:.1} °C, below the {:.1} °C growth threshold. Expect slowed growth.",
                value, thresholds.temp_low_c
            ),
            recommended_action: Some("Protect crops with row covers during cold spells."),
        })
    } else if value > TEMP_HEAT_STRESS_ABOVE_C {
        Some(RuleHit {
            band: "heat_stress",
            severity: Severity::Critical,
            title: "Heat Stress",
            description: format!(
                "Temperature is {:.1} °C, above the {:.1} °C heat-stress limit.",
                value, TEMP_HEAT_STRESS_ABOVE_C
            ),
            recommended_action: Some(
                "Increase irrigation frequency and provide shade during peak hours.",
            ),
        })
    } else if (TEMP_IDEAL_MIN_C..=TEMP_IDEAL_MAX_C).contains(&value) {
        Some(RuleHit {
            band: "ideal",
            severity: Severity::Success,
            title: "Temperature Ideal",
            description: format!(
                "Temperature is {:.1} °C, within the ideal growing range.",
                value
            ),
            recommended_action: None,
        })
    } else {
        None
    }
}

fn evaluate_moisture(value: f64, thresholds: &Thresholds) -> Option<RuleHit> {
    if value < thresholds.moisture_low_pct {
        Some(RuleHit {
            band: "too_dry",
            severity: Severity::Critical,
            title: "Soil Too Dry",
            description: format!(
                "Soil moisture is {:.0}%, below the {:.0}% minimum. Crops are at risk of drought stress.",
                value, thresholds.moisture_low_pct
            ),
            recommended_action: Some("Irrigate immediately."),
        })
    } else if value > MOISTURE_WATERLOGGED_ABOVE_PCT {
        Some(RuleHit {
            band: "waterlogged",
            severity: Severity::Warning,
            title: "Soil Waterlogged",
            description: format!(
                "Soil moisture is {:.0}%, above the {:.0}% maximum. Saturated soil invites root rot.",
                value, MOISTURE_WATERLOGGED_ABOVE_PCT
            ),
            recommended_action: Some("Hold off irrigation and check field drainage."),
        })
    } else if (MOISTURE_IDEAL_MIN_PCT..=MOISTURE_IDEAL_MAX_PCT).contains(&value) {
        Some(RuleHit {
            band: "ideal",
            severity: Severity::Success,
            title: "Soil Moisture Ideal",
            description: format!("Soil moisture is {:.0}%, within the ideal range.", value),
            recommended_action: None,
        })
    } else {
        None
    }
}

fn evaluate_conductivity(value: f64) -> Option<RuleHit> {
    if value < EC_LOW_BELOW_MS_CM {
        Some(RuleHit {
            band: "low_nutrients",
            severity: Severity::Warning,
            title: "Low Nutrient Levels",
            description: format!(
                "Conductivity is {:.2} mS/cm, below the {:.1} mS/cm minimum. Nutrient levels look depleted.",
                value, EC_LOW_BELOW_MS_CM
            ),
            recommended_action: Some("Apply a balanced fertilizer."),
        })
    } else if value > EC_SALT_STRESS_ABOVE_MS_CM {
        Some(RuleHit {
            band: "salt_stress",
            severity: Severity::Critical,
            title: "Salt Stress",
            description: format!(
                "Conductivity is {:.2} mS/cm, above the {:.1} mS/cm salt-stress limit.",
                value, EC_SALT_STRESS_ABOVE_MS_CM
            ),
            recommended_action: Some("Leach the root zone with fresh water and pause fertilizing."),
        })
    } else if (EC_OPTIMAL_MIN_MS_CM..=EC_OPTIMAL_MAX_MS_CM).contains(&value) {
        Some(RuleHit {
            band: "optimal",
            severity: Severity::Success,
            title: "Nutrient Levels Optimal",
            description: format!(
                "Conductivity is {:.2} mS/cm, within the optimal range.",
                value
            ),
            recommended_action: None,
        })
    } else {
        None
    }
}

/// Apply the per-category rule tables to every latest reading, producing
/// zero or one rule-based suggestion per sensor.
///
/// Iterates the latest-readings map in sensor-id order, so ids and output
/// order are deterministic for identical inputs.
pub fn classify(latest: &LatestReadings, thresholds: &Thresholds) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    for reading in latest.values() {
        let category = SensorCategory::from_sensor_type(&reading.sensor.sensor_type);
        let Some(hit) = evaluate(category, reading.value, thresholds) else {
            continue;
        };
        let index = suggestions.len();
        suggestions.push(Suggestion {
            id: suggestion_id("rule", &[&reading.sensor.sensor_type, hit.band], index),
            severity: hit.severity,
            title: hit.title.to_string(),
            description: hit.description,
            farm_name: reading.sensor.farm.name.clone(),
            sensor_type: reading.sensor.sensor_type.clone(),
            value: reading.value,
            unit: reading.sensor.unit.clone(),
            observed_at: reading.observed_at,
            recommended_action: hit.recommended_action.map(str::to_string),
            is_contextual: false,
        });
    }
    suggestions
}
