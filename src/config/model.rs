use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::{format::DEFAULT_CURRENCY_PREFIX, period::PeriodKind};

use super::ConfigError;

pub const DEFAULT_TREND_DAYS: u32 = 7;
pub const DEFAULT_MODEL_COOLDOWN_SECS: u64 = 60;
pub const MAX_MODEL_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// User preferences persisted as `config/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub currency_prefix: String,
    pub default_period: PeriodKind,
    pub trend_days: u32,
    /// Extraction models in fallback order.
    pub models: Vec<String>,
    pub model_cooldown_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_prefix: DEFAULT_CURRENCY_PREFIX.into(),
            default_period: PeriodKind::default(),
            trend_days: DEFAULT_TREND_DAYS,
            models: vec!["gemini-2.0-flash".into(), "gemini-1.5-flash".into()],
            model_cooldown_secs: DEFAULT_MODEL_COOLDOWN_SECS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trend_days == 0 {
            return Err(ConfigError::Invalid("trendDays must be at least 1".into()));
        }
        if self.models.iter().all(|model| model.trim().is_empty()) {
            return Err(ConfigError::Invalid("models must name at least one model".into()));
        }
        if self.model_cooldown_secs > MAX_MODEL_COOLDOWN_SECS {
            return Err(ConfigError::Invalid(format!(
                "modelCooldownSecs must be at most {MAX_MODEL_COOLDOWN_SECS}"
            )));
        }
        Ok(())
    }

    /// Cooldown applied to a failing extraction model, capped at [`MAX_MODEL_COOLDOWN_SECS`].
    pub fn model_cooldown(&self) -> Duration {
        let secs = self.model_cooldown_secs.min(MAX_MODEL_COOLDOWN_SECS);
        Duration::seconds(i64::try_from(secs).unwrap_or_default())
    }
}
