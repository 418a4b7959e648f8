use chrono::{Duration, Utc};
use tracing::info;

use farm_advisory::{
    AdvisoryEngine, Farm, InMemoryFarmStore, NotesAdviceGenerator, SensorMeta, SensorReading,
};

/// Seeds an in-memory store with a couple of farms and runs one advisory
/// refresh, printing the report as JSON.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let north = Farm {
        farm_id: "farm-north".to_string(),
        name: "North Field".to_string(),
        location: "Fresno, CA".to_string(),
        notes: Some("Sandy loam, drip irrigation installed in spring.".to_string()),
    };
    let south = Farm {
        farm_id: "farm-south".to_string(),
        name: "South Orchard".to_string(),
        location: "Visalia, CA".to_string(),
        notes: None,
    };

    let now = Utc::now();
    let readings = vec![
        sensor_reading("ph-1", "Soil pH Probe", "pH", 5.4, now - Duration::minutes(10), &north),
        sensor_reading("ph-1", "Soil pH Probe", "pH", 5.6, now - Duration::hours(3), &north),
        sensor_reading("moist-1", "Soil Moisture", "%", 14.0, now - Duration::minutes(5), &north),
        sensor_reading("temp-1", "Air Temperature", "°C", 24.0, now - Duration::minutes(2), &south),
        sensor_reading("ec-1", "EC Meter", "mS/cm", 1.6, now - Duration::minutes(7), &south),
    ];

    let store = InMemoryFarmStore::new()
        .with_user_farms("demo-user", vec![north, south])
        .with_readings(readings);

    let engine = AdvisoryEngine::from_env(store, NotesAdviceGenerator::default())?;
    let report = engine
        .refresh("demo-user")
        .await
        .expect("single refresh is never superseded");

    info!(
        suggestions = report.suggestions.len(),
        critical = report.summary.critical,
        "demo refresh finished"
    );
    println!("{}", report.to_json_pretty()?);
    Ok(())
}

fn sensor_reading(
    sensor_id: &str,
    sensor_type: &str,
    unit: &str,
    value: f64,
    observed_at: chrono::DateTime<Utc>,
    farm: &Farm,
) -> SensorReading {
    SensorReading {
        sensor_id: sensor_id.to_string(),
        value,
        observed_at,
        sensor: SensorMeta {
            name: format!("{} ({})", sensor_type, farm.name),
            sensor_type: sensor_type.to_string(),
            unit: unit.to_string(),
            farm_id: farm.farm_id.clone(),
            farm: farm.clone(),
        },
    }
}
