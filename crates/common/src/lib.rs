pub mod config_base;
pub mod errors;
pub mod structured_logging;

pub use config_base::{env_parse, env_string, TimeoutConfigBase};
pub use errors::{ConfigError, ConfigResult};
pub use structured_logging::{
    init_structured_logging,
    ExecutionContext,
    JsonFormatter,
    LoggingConfig,
    OperationTimer,
    StructuredLogEntry,
    TimingMetrics,
};
