use std::collections::BTreeMap;

use crate::domain::{Farm, FarmContext, LatestReadings, SensorCategory, SensorSnapshot};

/// Build one context per farm from the latest-readings map.
///
/// Contexts come back in the same order as the input farm list. Per farm,
/// each recognized category keeps the value with the newest `observed_at`;
/// unknown sensor types are left out entirely. Farms without readings still
/// get a context (with no sensor values) so the advice generator can speak
/// to notes and location alone.
pub fn build_farm_contexts(farms: &[Farm], latest: &LatestReadings) -> Vec<FarmContext> {
    farms
        .iter()
        .map(|farm| {
            let mut sensor_values: BTreeMap<SensorCategory, SensorSnapshot> = BTreeMap::new();
            for reading in latest.values() {
                if reading.sensor.farm_id != farm.farm_id {
                    continue;
                }
                let category = SensorCategory::from_sensor_type(&reading.sensor.sensor_type);
                if category == SensorCategory::Unknown {
                    continue;
                }
                match sensor_values.get(&category) {
                    Some(existing) if existing.observed_at >= reading.observed_at => {}
                    _ => {
                        sensor_values.insert(
                            category,
                            SensorSnapshot {
                                sensor_type: reading.sensor.sensor_type.clone(),
                                value: reading.value,
                                unit: reading.sensor.unit.clone(),
                                observed_at: reading.observed_at,
                            },
                        );
                    }
                }
            }
            FarmContext {
                farm_id: farm.farm_id.clone(),
                name: farm.name.clone(),
                location: farm.location.clone(),
                notes: farm.notes.clone(),
                sensor_values,
            }
        })
        .collect()
}

/// Render the textual context handed to external advice generators.
/// Deterministic for a given context: categories print in fixed order.
pub fn render_prompt(context: &FarmContext) -> String {
    let mut prompt = format!(
        "Farm \"{}\" located at {}.",
        context.name, context.location
    );
    if let Some(notes) = &context.notes {
        prompt.push_str(&format!(" Notes from the farmer: {}.", notes.trim()));
    }
    if context.sensor_values.is_empty() {
        prompt.push_str(" No recent sensor readings are available.");
    } else {
        prompt.push_str(" Latest sensor readings:");
        for (category, snapshot) in &context.sensor_values {
            prompt.push_str(&format!(
                " {} {} {} (observed {});",
                category.display_name(),
                snapshot.value,
                snapshot.unit,
                snapshot.observed_at.to_rfc3339()
            ));
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SensorMeta, SensorReading};
    use chrono::{DateTime, Utc};

    fn farm(farm_id: &str, name: &str, notes: Option<&str>) -> Farm {
        Farm {
            farm_id: farm_id.to_string(),
            name: name.to_string(),
            location: "Salinas Valley, CA".to_string(),
            notes: notes.map(str::to_string),
        }
    }

    fn reading(sensor_id: &str, sensor_type: &str, value: f64, epoch: i64, farm: &Farm) -> SensorReading {
        SensorReading {
            sensor_id: sensor_id.to_string(),
            value,
            observed_at: DateTime::<Utc>::from_timestamp(epoch, 0).unwrap(),
            sensor: SensorMeta {
                name: format!("{} sensor", sensor_type),
                sensor_type: sensor_type.to_string(),
                unit: "unit".to_string(),
                farm_id: farm.farm_id.clone(),
                farm: farm.clone(),
            },
        }
    }

    #[test]
    fn test_contexts_follow_farm_order() {
        let farms = vec![farm("f2", "South Field", None), farm("f1", "North Field", None)];
        let contexts = build_farm_contexts(&farms, &LatestReadings::new());

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].farm_id, "f2");
        assert_eq!(contexts[1].farm_id, "f1");
    }

    #[test]
    fn test_context_keeps_newest_value_per_category() {
        let f = farm("f1", "North Field", None);
        let mut latest = LatestReadings::new();
        for r in [
            reading("s1", "soil ph", 6.1, 100, &f),
            reading("s2", "backup ph", 6.9, 200, &f),
            reading("s3", "moisture", 44.0, 100, &f),
        ] {
            latest.insert(r.sensor_id.clone(), r);
        }

        let contexts = build_farm_contexts(&[f], &latest);
        let values = &contexts[0].sensor_values;

        assert_eq!(values.len(), 2);
        assert_eq!(values[&SensorCategory::Ph].value, 6.9);
        assert_eq!(values[&SensorCategory::Moisture].value, 44.0);
    }

    #[test]
    fn test_context_excludes_other_farms_and_unknown_types() {
        let mine = farm("f1", "North Field", None);
        let other = farm("f2", "South Field", None);
        let mut latest = LatestReadings::new();
        for r in [
            reading("s1", "ph", 6.1, 100, &mine),
            reading("s2", "ph", 7.2, 100, &other),
            reading("s3", "rainfall", 3.0, 100, &mine),
        ] {
            latest.insert(r.sensor_id.clone(), r);
        }

        let contexts = build_farm_contexts(&[mine], &latest);
        let values = &contexts[0].sensor_values;

        assert_eq!(values.len(), 1);
        assert_eq!(values[&SensorCategory::Ph].value, 6.1);
    }

    #[test]
    fn test_prompt_embeds_notes_and_values() {
        let f = farm("f1", "North Field", Some("planted tomatoes last week"));
        let mut latest = LatestReadings::new();
        let r = reading("s1", "ph", 6.1, 1_700_000_000, &f);
        latest.insert(r.sensor_id.clone(), r);

        let contexts = build_farm_contexts(&[f], &latest);
        let prompt = render_prompt(&contexts[0]);

        assert!(prompt.contains("North Field"));
        assert!(prompt.contains("Salinas Valley"));
        assert!(prompt.contains("planted tomatoes last week"));
        assert!(prompt.contains("pH 6.1"));
    }

    #[test]
    fn test_prompt_without_readings_mentions_absence() {
        let contexts = build_farm_contexts(&[farm("f1", "North Field", None)], &LatestReadings::new());
        let prompt = render_prompt(&contexts[0]);

        assert!(prompt.contains("No recent sensor readings"));
    }

    #[test]
    fn test_prompt_deterministic() {
        let f = farm("f1", "North Field", Some("dry summer"));
        let mut latest = LatestReadings::new();
        for r in [
            reading("s1", "moisture", 33.0, 100, &f),
            reading("s2", "ph", 6.4, 100, &f),
            reading("s3", "temperature", 25.0, 100, &f),
        ] {
            latest.insert(r.sensor_id.clone(), r);
        }

        let a = render_prompt(&build_farm_contexts(&[f.clone()], &latest)[0]);
        let b = render_prompt(&build_farm_contexts(&[f], &latest)[0]);
        assert_eq!(a, b);
    }
}
