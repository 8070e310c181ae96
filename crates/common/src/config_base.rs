use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Базовая конфигурация для тайм-аутов исходящих вызовов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfigBase {
    /// Тайм-аут вызова генеративной модели
    pub ai_request_timeout_ms: u64,
    /// Тайм-аут одной проверки здоровья
    pub health_probe_timeout_ms: u64,
}

impl Default for TimeoutConfigBase {
    fn default() -> Self {
        Self {
            ai_request_timeout_ms: 10_000,
            health_probe_timeout_ms: 5_000,
        }
    }
}

impl TimeoutConfigBase {
    pub fn ai_request_timeout(&self) -> Duration {
        Duration::from_millis(self.ai_request_timeout_ms)
    }

    pub fn health_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.health_probe_timeout_ms)
    }
}

/// Read an optional environment variable, treating blank values as unset.
pub fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, falling back to `default` when unset.
///
/// A value that is present but does not parse is an error rather than a silent
/// fallback.
pub fn env_parse<T>(key: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
