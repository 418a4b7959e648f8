use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Farm, SensorReading};
use crate::error::StoreError;

/// How many rows the hosted store returns per readings query, counted
/// across all sensors. The interleaving across sensors is arbitrary, which
/// is exactly why the reducer exists.
pub const READINGS_WINDOW: usize = 50;

/// Abstraction over the hosted data store (farms, sensors, readings).
/// The advisory engine only ever reads through this trait; persistence
/// lives entirely on the other side of it.
#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Farms the user is a member of
    async fn fetch_user_farms(&self, user_id: &str) -> Result<Vec<Farm>, StoreError>;

    /// Recent readings across the given farms, joined with sensor and farm
    /// metadata. Limited to a recent window; multiple readings per sensor
    /// in arbitrary order are expected.
    async fn fetch_latest_readings(
        &self,
        farm_ids: &[String],
    ) -> Result<Vec<SensorReading>, StoreError>;
}

/// In-memory store for tests, demos, and offline development.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFarmStore {
    farms_by_user: HashMap<String, Vec<Farm>>,
    readings: Vec<SensorReading>,
    window: Option<usize>,
}

impl InMemoryFarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the farms a user can see
    pub fn with_user_farms(mut self, user_id: &str, farms: Vec<Farm>) -> Self {
        self.farms_by_user.insert(user_id.to_string(), farms);
        self
    }

    /// Append readings in ingest order
    pub fn with_readings(mut self, readings: Vec<SensorReading>) -> Self {
        self.readings.extend(readings);
        self
    }

    /// Override the readings window (defaults to `READINGS_WINDOW`)
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }
}

#[async_trait]
impl FarmStore for InMemoryFarmStore {
    async fn fetch_user_farms(&self, user_id: &str) -> Result<Vec<Farm>, StoreError> {
        Ok(self.farms_by_user.get(user_id).cloned().unwrap_or_default())
    }

    async fn fetch_latest_readings(
        &self,
        farm_ids: &[String],
    ) -> Result<Vec<SensorReading>, StoreError> {
        // Mimic the hosted query: newest rows first across all sensors,
        // truncated to the window
        let mut rows: Vec<SensorReading> = self
            .readings
            .iter()
            .filter(|r| farm_ids.contains(&r.sensor.farm_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        rows.truncate(self.window.unwrap_or(READINGS_WINDOW));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SensorMeta;
    use chrono::{DateTime, Utc};

    fn farm(farm_id: &str) -> Farm {
        Farm {
            farm_id: farm_id.to_string(),
            name: format!("Farm {}", farm_id),
            location: "here".to_string(),
            notes: None,
        }
    }

    fn reading(sensor_id: &str, farm_id: &str, epoch: i64) -> SensorReading {
        SensorReading {
            sensor_id: sensor_id.to_string(),
            value: 6.5,
            observed_at: DateTime::<Utc>::from_timestamp(epoch, 0).unwrap(),
            sensor: SensorMeta {
                name: "ph probe".to_string(),
                sensor_type: "ph".to_string(),
                unit: "pH".to_string(),
                farm_id: farm_id.to_string(),
                farm: farm(farm_id),
            },
        }
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_farms() {
        let store = InMemoryFarmStore::new();
        let farms = store.fetch_user_farms("nobody").await.unwrap();
        assert!(farms.is_empty());
    }

    #[tokio::test]
    async fn test_readings_filtered_by_farm() {
        let store = InMemoryFarmStore::new().with_readings(vec![
            reading("s1", "f1", 100),
            reading("s2", "f2", 100),
        ]);

        let rows = store
            .fetch_latest_readings(&["f1".to_string()])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sensor_id, "s1");
    }

    #[tokio::test]
    async fn test_readings_window_truncates_oldest() {
        let readings = (0..10).map(|i| reading(&format!("s{}", i), "f1", i)).collect();
        let store = InMemoryFarmStore::new()
            .with_readings(readings)
            .with_window(3);

        let rows = store
            .fetch_latest_readings(&["f1".to_string()])
            .await
            .unwrap();

        assert_eq!(rows.len(), 3);
        // Newest rows survive
        assert!(rows.iter().all(|r| r.observed_at.timestamp() >= 7));
    }
}
