use async_trait::async_trait;
use domain::{Dataset, DatasetRepository, DomainError, DomainResult};
use std::path::PathBuf;
use tracing::debug;

/// Dataset stored as a single JSON document on local disk
#[derive(Debug, Clone)]
pub struct JsonFileDatasetRepository {
    path: PathBuf,
}

impl JsonFileDatasetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetRepository for JsonFileDatasetRepository {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> DomainResult<Dataset> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DomainError::DatasetUnavailable {
                source_name: self.location(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Read dataset file");
        Dataset::from_json_slice(&bytes)
    }
}
