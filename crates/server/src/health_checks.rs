use crate::system_metrics::{CpuMetrics, MemoryMetrics, SystemMetricsSource};
use async_trait::async_trait;
use chrono::Utc;
use common::OperationTimer;
use domain::DatasetRepository;
use llm::LlmProvider;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info, warn};

pub const API_VERSION: &str = "1.0.0";

/// Порог загрузки CPU/памяти, выше которого система считается перегруженной
pub const RESOURCE_WARNING_PERCENT: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
    Warning,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    /// Reserved; no probe outcome escalates this far
    Unhealthy,
}

impl HealthStatus {
    pub fn http_status_code(self) -> u16 {
        match self {
            HealthStatus::Healthy => 200,
            HealthStatus::Degraded | HealthStatus::Unhealthy => 503,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Результат проверки одного компонента
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn with_status(status: ComponentStatus) -> Self {
        Self {
            status,
            kind: None,
            response_time: None,
            memory: None,
            cpu: None,
            message: None,
            error: None,
        }
    }

    pub fn up() -> Self {
        Self::with_status(ComponentStatus::Up)
    }

    pub fn down(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::with_status(ComponentStatus::Down)
        }
    }

    pub fn disabled(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::with_status(ComponentStatus::Disabled)
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn response_time(mut self, elapsed_ms: f64) -> Self {
        self.response_time = Some((elapsed_ms * 100.0).round() / 100.0);
        self
    }

    /// `down` и `warning` понижают общий статус, `disabled` - нет
    pub fn degrades_overall(&self) -> bool {
        matches!(self.status, ComponentStatus::Down | ComponentStatus::Warning)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Unix seconds
    pub timestamp: f64,
    pub version: String,
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthReport {
    pub fn http_status_code(&self) -> u16 {
        self.status.http_status_code()
    }
}

/// Trait для реализации проверок здоровья
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Имя компонента в отчёте
    fn name(&self) -> &'static str;

    /// Выполнить проверку. Ошибки зависимостей выражаются статусом, не паникой.
    async fn check(&self) -> ComponentHealth;

    /// Результат, если проверка не уложилась в таймаут
    fn on_timeout(&self, limit: Duration, elapsed_ms: f64) -> ComponentHealth {
        ComponentHealth::down(format!("Check timed out after {}ms", limit.as_millis()))
            .response_time(elapsed_ms)
    }
}

/// Система мониторинга здоровья приложения
pub struct HealthCheckSystem {
    checks: Vec<Box<dyn HealthCheck>>,
    probe_timeout: Duration,
    version: String,
}

impl HealthCheckSystem {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            checks: Vec::new(),
            probe_timeout,
            version: API_VERSION.to_string(),
        }
    }

    /// Добавить новую проверку
    pub fn add_check(&mut self, check: Box<dyn HealthCheck>) {
        self.checks.push(check);
    }

    pub fn with_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.add_check(Box::new(check));
        self
    }

    /// Запустить все проверки последовательно, каждая под своим таймаутом
    pub async fn run_all_checks(&self) -> Vec<(&'static str, ComponentHealth)> {
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let mut timer = OperationTimer::new(format!("health_check_{}", check.name()));
            let start = Instant::now();

            let result = match timeout(self.probe_timeout, check.check()).await {
                Ok(result) => result,
                Err(_) => check.on_timeout(
                    self.probe_timeout,
                    start.elapsed().as_secs_f64() * 1000.0,
                ),
            };

            match result.status {
                ComponentStatus::Up | ComponentStatus::Disabled => {
                    info!(component = check.name(), status = ?result.status, "Health check passed")
                }
                ComponentStatus::Warning => {
                    warn!(component = check.name(), "Health check reported warning")
                }
                ComponentStatus::Down => error!(
                    component = check.name(),
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "Health check failed"
                ),
            }

            timer.add_field("status", result.status);
            timer.finish();
            results.push((check.name(), result));
        }

        results
    }

    /// Общий статус: `healthy`, пока ни одна проверка его не понизила
    pub fn overall_status<'a>(results: impl IntoIterator<Item = &'a ComponentHealth>) -> HealthStatus {
        if results.into_iter().any(ComponentHealth::degrades_overall) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    pub async fn report(&self) -> HealthReport {
        let components: BTreeMap<String, ComponentHealth> = self
            .run_all_checks()
            .await
            .into_iter()
            .map(|(name, health)| (name.to_string(), health))
            .collect();

        HealthReport {
            status: Self::overall_status(components.values()),
            timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
            version: self.version.clone(),
            components,
        }
    }
}

// === Конкретные реализации проверок ===

/// Проверка доступности файла с данными
pub struct DatastoreHealthCheck {
    repository: Arc<dyn DatasetRepository>,
}

impl DatastoreHealthCheck {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl HealthCheck for DatastoreHealthCheck {
    fn name(&self) -> &'static str {
        "datastore"
    }

    async fn check(&self) -> ComponentHealth {
        let start = Instant::now();
        let result = self.repository.load().await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let health = match result {
            Ok(_) => ComponentHealth::up(),
            Err(e) => ComponentHealth::down(e.to_string()),
        };
        health.kind(self.repository.kind()).response_time(elapsed_ms)
    }
}

/// Проверка доступности Gemini API (лёгкий countTokens вместо генерации)
pub struct GeminiHealthCheck {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl GeminiHealthCheck {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl HealthCheck for GeminiHealthCheck {
    fn name(&self) -> &'static str {
        "gemini_api"
    }

    async fn check(&self) -> ComponentHealth {
        let Some(provider) = &self.provider else {
            return ComponentHealth::disabled("API key not configured");
        };

        let start = Instant::now();
        let result = provider.count_tokens("ping").await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(_) => ComponentHealth::up(),
            Err(e) => ComponentHealth::down(e.to_string()),
        }
        .response_time(elapsed_ms)
    }
}

/// Проверка загрузки CPU и памяти хоста
pub struct SystemHealthCheck {
    source: Arc<dyn SystemMetricsSource>,
    max_usage_percent: f64,
}

impl SystemHealthCheck {
    pub fn new(source: Arc<dyn SystemMetricsSource>) -> Self {
        Self {
            source,
            max_usage_percent: RESOURCE_WARNING_PERCENT,
        }
    }
}

#[async_trait]
impl HealthCheck for SystemHealthCheck {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn check(&self) -> ComponentHealth {
        let source = Arc::clone(&self.source);
        let sample = tokio::task::spawn_blocking(move || source.sample())
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));

        match sample {
            Ok(snapshot) => {
                let overloaded = snapshot.memory.percent > self.max_usage_percent
                    || snapshot.cpu.usage > self.max_usage_percent;
                let status = if overloaded {
                    ComponentStatus::Warning
                } else {
                    ComponentStatus::Up
                };
                ComponentHealth {
                    memory: Some(snapshot.memory),
                    cpu: Some(snapshot.cpu),
                    ..ComponentHealth::with_status(status)
                }
            }
            Err(e) => {
                warn!(error = %e, "System metrics unavailable");
                metrics_unavailable(e)
            }
        }
    }

    fn on_timeout(&self, limit: Duration, _elapsed_ms: f64) -> ComponentHealth {
        warn!(timeout_ms = limit.as_millis() as u64, "System metrics read timed out");
        metrics_unavailable(format!("Metrics read timed out after {}ms", limit.as_millis()))
    }
}

/// Сбой чтения метрик не понижает общий статус
fn metrics_unavailable(error: String) -> ComponentHealth {
    ComponentHealth {
        memory: Some(MemoryMetrics::default()),
        cpu: Some(CpuMetrics::default()),
        error: Some(error),
        ..ComponentHealth::up()
    }
}
