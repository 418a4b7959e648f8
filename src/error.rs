use thiserror::Error;

/// Errors surfaced by data store implementations.
///
/// Nothing here is fatal to the pipeline: a fetch failure degrades the run
/// to an empty suggestion set for the affected scope plus a user-visible
/// `Notice`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data store unreachable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("no farms found for user: {0}")]
    NoFarms(String),
}

/// Errors surfaced by advice generator implementations.
/// Isolated per farm during augmentation; never cancel the overall pipeline.
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice generator failed: {0}")]
    Generator(#[from] anyhow::Error),

    #[error("malformed farm context: {0}")]
    MalformedContext(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("value for {var} out of range: {value}")]
    OutOfRange { var: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "data store unreachable: connection refused");
    }

    #[test]
    fn test_advice_error_from_anyhow() {
        let err: AdviceError = anyhow::anyhow!("model timed out").into();
        assert!(err.to_string().contains("model timed out"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            var: "ADVISORY_TEMP_LOW_C".to_string(),
            value: "cold".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for ADVISORY_TEMP_LOW_C: cold");
    }
}
