//! Sales dashboard backend: configuration, dataset store, health probes and
//! the HTTP routes tying them to the domain and AI relay crates.

pub mod bootstrap;
pub mod config;
pub mod datastore;
pub mod health_checks;
pub mod routes;
pub mod system_metrics;

pub use bootstrap::{build_state, Dependencies};
pub use config::ServerConfig;
pub use datastore::JsonFileDatasetRepository;
pub use health_checks::{
    ComponentHealth, ComponentStatus, HealthCheck, HealthCheckSystem, HealthReport, HealthStatus,
};
pub use routes::{router, AppState};
pub use system_metrics::{SystemMetricsSource, SysinfoMetrics};
