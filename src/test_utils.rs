//! Test utilities for unit, integration, and property-based tests.
//!
//! Provides proptest generators for domain types, fixture builders, and
//! deliberately misbehaving store/generator implementations for
//! failure-path tests.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::augment::{AdviceDraft, AdviceGenerator, NotesAdviceGenerator};
use crate::domain::{Farm, FarmContext, SensorMeta, SensorReading};
use crate::error::{AdviceError, StoreError};
use crate::store::FarmStore;

pub mod generators {
    use proptest::prelude::*;

    /// Generate a sensor id like "sensor-17"
    pub fn sensor_id() -> impl Strategy<Value = String> {
        (0u32..40).prop_map(|n| format!("sensor-{}", n))
    }

    /// Generate an epoch-second timestamp between 2020 and 2030
    pub fn epoch_seconds() -> impl Strategy<Value = i64> {
        1_577_836_800i64..1_924_991_999i64
    }

    /// Generate a recognized free-text sensor type
    pub fn sensor_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("ph".to_string()),
            Just("Soil pH Probe".to_string()),
            Just("temperature".to_string()),
            Just("Air Temperature".to_string()),
            Just("soil moisture".to_string()),
            Just("EC meter".to_string()),
            Just("conductivity".to_string()),
        ]
    }

    /// Generate a plausible value for any recognized sensor type.
    /// Stays within the physical ranges the reducer accepts.
    pub fn plausible_value() -> impl Strategy<Value = f64> {
        0.0f64..14.0
    }
}

pub mod fixtures {
    use super::*;

    pub fn farm(farm_id: &str, name: &str, location: &str, notes: Option<&str>) -> Farm {
        Farm {
            farm_id: farm_id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            notes: notes.map(str::to_string),
        }
    }

    pub fn reading(
        sensor_id: &str,
        sensor_type: &str,
        unit: &str,
        value: f64,
        epoch_seconds: i64,
        farm: &Farm,
    ) -> SensorReading {
        SensorReading {
            sensor_id: sensor_id.to_string(),
            value,
            observed_at: DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
                .expect("valid test timestamp"),
            sensor: SensorMeta {
                name: format!("{} sensor", sensor_type),
                sensor_type: sensor_type.to_string(),
                unit: unit.to_string(),
                farm_id: farm.farm_id.clone(),
                farm: farm.clone(),
            },
        }
    }
}

/// Store that always fails, for outage-path tests
#[derive(Debug, Clone, Default)]
pub struct FailingFarmStore;

#[async_trait]
impl FarmStore for FailingFarmStore {
    async fn fetch_user_farms(&self, _user_id: &str) -> Result<Vec<Farm>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn fetch_latest_readings(
        &self,
        _farm_ids: &[String],
    ) -> Result<Vec<SensorReading>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

/// Generator that fails for a chosen set of farms and behaves like
/// `NotesAdviceGenerator` for the rest. Exercises per-farm failure
/// isolation.
#[derive(Debug, Clone, Default)]
pub struct SelectiveFailingGenerator {
    inner: NotesAdviceGenerator,
    fail_farm_ids: HashSet<String>,
}

impl SelectiveFailingGenerator {
    pub fn failing_for(farm_ids: &[&str]) -> Self {
        Self {
            inner: NotesAdviceGenerator::default(),
            fail_farm_ids: farm_ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl AdviceGenerator for SelectiveFailingGenerator {
    async fn generate(
        &self,
        context: &FarmContext,
        prompt: &str,
    ) -> Result<Vec<AdviceDraft>, AdviceError> {
        if self.fail_farm_ids.contains(&context.farm_id) {
            return Err(anyhow::anyhow!("advice generator unavailable for {}", context.farm_id).into());
        }
        self.inner.generate(context, prompt).await
    }
}
