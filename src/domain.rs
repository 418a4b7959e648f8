use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Core Domain Models
// ============================================================================

/// Farm record as returned by the hosted data store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farm {
    pub farm_id: String,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Sensor metadata joined onto each reading by the data store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorMeta {
    pub name: String,
    /// Free-text sensor type as stored upstream (e.g. "Soil pH Probe")
    pub sensor_type: String,
    pub unit: String,
    pub farm_id: String,
    pub farm: Farm,
}

/// One timestamped numeric observation from a sensor.
/// Immutable once received; input-only to the advisory engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    pub sensor_id: String,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
    pub sensor: SensorMeta,
}

/// Latest observation per sensor, keyed by sensor id.
/// BTreeMap so iteration order (and therefore suggestion order) is
/// deterministic across runs.
pub type LatestReadings = std::collections::BTreeMap<String, SensorReading>;

// ============================================================================
// Sensor Categories
// ============================================================================

/// Closed set of sensor categories the rule tables know about.
///
/// Upstream sensor types are free text; they are resolved to a category once
/// and dispatched by pattern match from then on. `Ord` is derived so contexts
/// keyed by category iterate deterministically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SensorCategory {
    Ph,
    Temperature,
    Moisture,
    Conductivity,
    Unknown,
}

impl SensorCategory {
    /// Resolve a free-text sensor type to a category.
    ///
    /// Case-insensitive substring match, first match wins: `ph`,
    /// `temperature`, `moisture`, then `conductivity`/`ec`. Anything else is
    /// `Unknown` and produces no suggestions.
    pub fn from_sensor_type(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("ph") {
            SensorCategory::Ph
        } else if lowered.contains("temperature") {
            SensorCategory::Temperature
        } else if lowered.contains("moisture") {
            SensorCategory::Moisture
        } else if lowered.contains("conductivity") || lowered.contains("ec") {
            SensorCategory::Conductivity
        } else {
            SensorCategory::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorCategory::Ph => "ph",
            SensorCategory::Temperature => "temperature",
            SensorCategory::Moisture => "moisture",
            SensorCategory::Conductivity => "conductivity",
            SensorCategory::Unknown => "unknown",
        }
    }

    /// Human-facing label used in prompts and descriptions
    pub fn display_name(&self) -> &'static str {
        match self {
            SensorCategory::Ph => "pH",
            SensorCategory::Temperature => "Temperature",
            SensorCategory::Moisture => "Soil moisture",
            SensorCategory::Conductivity => "Conductivity (EC)",
            SensorCategory::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Ordered advisory severity used for sorting and visual emphasis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Success,
}

impl Severity {
    /// Sort rank: critical(0) < warning(1) < info(2) < success(3)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Success => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        }
    }
}

// ============================================================================
// Suggestions
// ============================================================================

/// A single advisory shown to the user.
///
/// Pure output value: never mutated after creation and never persisted by
/// the engine. The id is deterministic given the same inputs so re-rendering
/// the same batch is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub farm_name: String,
    pub sensor_type: String,
    pub value: f64,
    pub unit: String,
    pub observed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,
    pub is_contextual: bool,
}

/// Derive a collision-free, deterministic suggestion id from its identifying
/// components. SHA-256 over the joined parts, hex-truncated.
pub fn suggestion_id(kind: &str, parts: &[&str], index: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b"#");
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(b"#");
    }
    hasher.update(index.to_string().as_bytes());
    format!("sg-{}", &hex::encode(hasher.finalize())[..16])
}

// ============================================================================
// Farm Context
// ============================================================================

/// Latest value for one sensor category on a farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorSnapshot {
    /// Free-text sensor type the value came from
    pub sensor_type: String,
    pub value: f64,
    pub unit: String,
    pub observed_at: DateTime<Utc>,
}

/// Per-farm context handed to the advice generator.
/// Rebuilt on every pipeline run; not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmContext {
    pub farm_id: String,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Latest known value per recognized category, deterministic order
    pub sensor_values: std::collections::BTreeMap<SensorCategory, SensorSnapshot>,
}

// ============================================================================
// Report Models
// ============================================================================

/// Counts by severity, displayed verbatim by the host
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeveritySummary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub success: usize,
}

/// Stable machine-readable notice codes surfaced alongside a report
pub mod notice_codes {
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const ADVICE_FAILED: &str = "ADVICE_FAILED";
}

/// Non-fatal, user-visible notice attached to a report.
/// The worst outcome of any failure is a partial report plus one of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    /// Stable machine-readable code (e.g. "STORE_UNAVAILABLE")
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
}

impl Notice {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            farm_name: None,
        }
    }

    pub fn store_unavailable(detail: &crate::error::StoreError) -> Self {
        Self::new(
            notice_codes::STORE_UNAVAILABLE,
            format!("Could not load farm data: {}. Pull to refresh to try again.", detail),
        )
    }

    pub fn advice_failed(farm_name: &str) -> Self {
        Self {
            code: notice_codes::ADVICE_FAILED.to_string(),
            message: format!(
                "Contextual recommendations for \"{}\" are temporarily unavailable.",
                farm_name
            ),
            farm_name: Some(farm_name.to_string()),
        }
    }
}

/// Assembled output of one pipeline run, consumed by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryReport {
    /// Generation counter value captured when the run started
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
    pub suggestions: Vec<Suggestion>,
    pub summary: SeveritySummary,
    pub notices: Vec<Notice>,
}

impl AdvisoryReport {
    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
