use crate::config::ServerConfig;
use crate::datastore::JsonFileDatasetRepository;
use crate::health_checks::{
    DatastoreHealthCheck, GeminiHealthCheck, HealthCheckSystem, SystemHealthCheck,
};
use crate::routes::AppState;
use crate::system_metrics::{SystemMetricsSource, SysinfoMetrics};
use anyhow::Context;
use domain::{build_context, DatasetRepository};
use llm::{AiRelay, GoogleProvider, LlmProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// Startup dependencies that tests may replace
pub struct Dependencies {
    pub repository: Arc<dyn DatasetRepository>,
    pub provider: Option<Arc<dyn LlmProvider>>,
    pub metrics: Arc<dyn SystemMetricsSource>,
}

impl Dependencies {
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let provider: Option<Arc<dyn LlmProvider>> = match &config.gemini_api_key {
            Some(key) => {
                let provider = GoogleProvider::new(key.clone(), config.gemini_model.clone())?
                    .with_timeout(config.timeouts.ai_request_timeout())?
                    .with_base_url(config.gemini_base_url.clone());
                info!(model = %provider.model(), "Gemini provider configured");
                Some(Arc::new(provider))
            }
            None => {
                warn!("Gemini API key not found. AI features will be disabled.");
                None
            }
        };

        Ok(Self {
            repository: Arc::new(JsonFileDatasetRepository::new(&config.data_file)),
            provider,
            metrics: Arc::new(SysinfoMetrics::new()),
        })
    }
}

/// Load the dataset, build the context digest and wire the shared state.
/// A dataset that cannot be loaded is fatal.
pub async fn build_state(config: &ServerConfig, deps: Dependencies) -> anyhow::Result<AppState> {
    let dataset = deps
        .repository
        .load()
        .await
        .with_context(|| format!("Failed to load sales dataset from {}", deps.repository.location()))?;

    let context = build_context(&dataset);
    info!(
        reps = dataset.rep_count(),
        deals = dataset.deals().count(),
        context_chars = context.len(),
        "Sales dataset loaded"
    );

    let relay = AiRelay::new(deps.provider.clone(), context.as_str(), config.generation);

    let health = HealthCheckSystem::new(config.timeouts.health_probe_timeout())
        .with_check(DatastoreHealthCheck::new(Arc::clone(&deps.repository)))
        .with_check(GeminiHealthCheck::new(deps.provider))
        .with_check(SystemHealthCheck::new(deps.metrics));

    Ok(AppState {
        dataset: Arc::new(dataset),
        relay: Arc::new(relay),
        health: Arc::new(health),
    })
}
