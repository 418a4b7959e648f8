use tracing::debug;

use crate::domain::{LatestReadings, SensorCategory, SensorReading};

// Physical ranges the sensor hardware can actually report. Values outside
// these are treated as malformed and skipped, never propagated as errors.
pub const PH_MIN: f64 = 0.0;
pub const PH_MAX: f64 = 14.0;
pub const TEMP_MIN_C: f64 = -40.0;
pub const TEMP_MAX_C: f64 = 85.0;
pub const MOISTURE_MIN_PCT: f64 = 0.0;
pub const MOISTURE_MAX_PCT: f64 = 100.0;
pub const EC_MIN_MS_CM: f64 = 0.0;
pub const EC_MAX_MS_CM: f64 = 20.0;

/// Collapse a raw, time-unordered batch of readings into the single latest
/// observation per sensor.
///
/// Keeps the reading with the greatest `observed_at` per `sensor_id`. When
/// two readings carry the exact same timestamp, the one encountered later in
/// the input wins, an implementation-defined tie-break rather than a real
/// ordering guarantee. Malformed readings are skipped so one bad row never
/// blanks the whole dashboard.
pub fn reduce_to_latest(readings: Vec<SensorReading>) -> LatestReadings {
    let mut latest = LatestReadings::new();
    for reading in readings {
        if !is_plausible(&reading) {
            debug!(
                sensor_id = %reading.sensor_id,
                value = reading.value,
                "skipping implausible reading"
            );
            continue;
        }
        match latest.get(&reading.sensor_id) {
            Some(current) if current.observed_at > reading.observed_at => {}
            _ => {
                latest.insert(reading.sensor_id.clone(), reading);
            }
        }
    }
    latest
}

/// Whether a reading's value is physically possible for its sensor category.
/// Unknown categories only require a finite value.
pub fn is_plausible(reading: &SensorReading) -> bool {
    if !reading.value.is_finite() {
        return false;
    }
    let value = reading.value;
    match SensorCategory::from_sensor_type(&reading.sensor.sensor_type) {
        SensorCategory::Ph => (PH_MIN..=PH_MAX).contains(&value),
        SensorCategory::Temperature => (TEMP_MIN_C..=TEMP_MAX_C).contains(&value),
        SensorCategory::Moisture => (MOISTURE_MIN_PCT..=MOISTURE_MAX_PCT).contains(&value),
        SensorCategory::Conductivity => (EC_MIN_MS_CM..=EC_MAX_MS_CM).contains(&value),
        SensorCategory::Unknown => true,
    }
}
