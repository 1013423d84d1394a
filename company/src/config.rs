//! Runtime configuration for the company

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CompanyError, CompanyResult};

/// Tunables for the pricing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    /// Give up on a catalog entry after this long (None waits forever)
    #[serde(with = "optional_millis")]
    pub readiness_timeout: Option<Duration>,

    /// How often a waiting pricing worker reports an incomplete catalog entry
    #[serde(with = "millis")]
    pub stall_warning_interval: Duration,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            readiness_timeout: None,
            stall_warning_interval: Duration::from_secs(5),
        }
    }
}

impl CompanyConfig {
    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = Some(timeout);
        self
    }

    pub fn with_readiness_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    pub fn with_stall_warning_interval(mut self, interval: Duration) -> Self {
        self.stall_warning_interval = interval;
        self
    }

    /// Parse from a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> CompanyResult<Self> {
        let config: CompanyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CompanyResult<()> {
        if self.stall_warning_interval.is_zero() {
            return Err(CompanyError::config("stall_warning_interval must be non-zero"));
        }
        if self.readiness_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CompanyError::config("readiness_timeout must be non-zero"));
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
