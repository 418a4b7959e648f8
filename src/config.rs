use crate::error::ConfigError;

/// Default low-temperature bound (°C) below which growth slows.
/// Source revisions used bounds between 10 and 15; 10 is canonical here and
/// the bound stays env-configurable.
pub const DEFAULT_TEMP_LOW_C: f64 = 10.0;

/// Default low-moisture bound (%) below which irrigation is critical.
/// Source revisions used 20 and 30; 20 is canonical here.
pub const DEFAULT_MOISTURE_LOW_PCT: f64 = 20.0;

const TEMP_LOW_VAR: &str = "ADVISORY_TEMP_LOW_C";
const MOISTURE_LOW_VAR: &str = "ADVISORY_MOISTURE_LOW_PCT";

/// Configurable threshold bounds for the classifier.
///
/// Only the two bounds that varied across source revisions are configurable;
/// every other band constant lives in the classifier's rule tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Temperatures below this (°C) trigger a slow-growth warning
    pub temp_low_c: f64,
    /// Moisture below this (%) triggers a critical irrigation suggestion
    pub moisture_low_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_low_c: DEFAULT_TEMP_LOW_C,
            moisture_low_pct: DEFAULT_MOISTURE_LOW_PCT,
        }
    }
}

impl Thresholds {
    /// Load thresholds from environment variables, falling back to the
    /// canonical defaults for anything unset.
    ///
    /// Recognized variables: `ADVISORY_TEMP_LOW_C`, `ADVISORY_MOISTURE_LOW_PCT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let temp_low_c = read_override(TEMP_LOW_VAR)?.unwrap_or(DEFAULT_TEMP_LOW_C);
        let moisture_low_pct = read_override(MOISTURE_LOW_VAR)?.unwrap_or(DEFAULT_MOISTURE_LOW_PCT);

        let thresholds = Self {
            temp_low_c,
            moisture_low_pct,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Reject overrides that would overlap the fixed success bands.
    /// The low-temperature bound must stay below the 20 °C ideal-band start,
    /// the low-moisture bound below the 50 % ideal-band start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.temp_low_c.is_finite() || self.temp_low_c >= 20.0 {
            return Err(ConfigError::OutOfRange {
                var: TEMP_LOW_VAR.to_string(),
                value: self.temp_low_c.to_string(),
            });
        }
        if !self.moisture_low_pct.is_finite()
            || self.moisture_low_pct <= 0.0
            || self.moisture_low_pct >= 50.0
        {
            return Err(ConfigError::OutOfRange {
                var: MOISTURE_LOW_VAR.to_string(),
                value: self.moisture_low_pct.to_string(),
            });
        }
        Ok(())
    }
}

fn read_override(var: &str) -> Result<Option<f64>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
