//! Process configuration read from the environment (and `.env` when present).

use common::{env_parse, env_string, ConfigError, ConfigResult, TimeoutConfigBase};
use llm::providers::google_provider::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use llm::GenerationSettings;
use std::fmt;
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    /// `None` disables AI features without stopping the server
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation: GenerationSettings,
    pub timeouts: TimeoutConfigBase,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            data_file: PathBuf::from("dummyData.json"),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            generation: GenerationSettings::default(),
            timeouts: TimeoutConfigBase::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> ConfigResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let temperature = env_parse("AI_TEMPERATURE", defaults.generation.temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::OutOfRange {
                key: "AI_TEMPERATURE".to_string(),
                value: temperature.to_string(),
                expected: "0.0..=2.0".to_string(),
            });
        }

        let max_output_tokens =
            env_parse("AI_MAX_OUTPUT_TOKENS", defaults.generation.max_output_tokens)?;
        if max_output_tokens == 0 {
            return Err(ConfigError::OutOfRange {
                key: "AI_MAX_OUTPUT_TOKENS".to_string(),
                value: "0".to_string(),
                expected: "> 0".to_string(),
            });
        }

        let ai_timeout_secs = positive_secs("AI_TIMEOUT_SECS", 10)?;
        let probe_timeout_secs = positive_secs("HEALTH_PROBE_TIMEOUT_SECS", 5)?;

        Ok(Self {
            host: env_string("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port)?,
            data_file: env_string("SALES_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            gemini_api_key: env_string(API_KEY_VAR),
            gemini_model: env_string("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: env_string("GEMINI_API_BASE_URL").unwrap_or(defaults.gemini_base_url),
            generation: GenerationSettings {
                temperature,
                max_output_tokens,
            },
            timeouts: TimeoutConfigBase {
                ai_request_timeout_ms: ai_timeout_secs.saturating_mul(1000),
                health_probe_timeout_ms: probe_timeout_secs.saturating_mul(1000),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ai_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

/// Timeout in whole seconds, must be non-zero
fn positive_secs(key: &str, default: u64) -> ConfigResult<u64> {
    let secs: u64 = env_parse(key, default)?;
    if secs == 0 {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: "0".to_string(),
            expected: "> 0".to_string(),
        });
    }
    Ok(secs)
}

// keeps the credential out of logs
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_file", &self.data_file)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("generation", &self.generation)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
