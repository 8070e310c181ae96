//! DatasetRepository - read-only access to the backing sales dataset

use crate::entities::Dataset;
use crate::errors::DomainResult;
use async_trait::async_trait;

/// Read-only source of the sales dataset
///
/// `load` is called once at startup to build the in-memory dataset, and again
/// by the datastore health probe to verify the source is still readable.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Short store type reported by health checks (e.g. "file")
    fn kind(&self) -> &'static str;

    /// Human-readable location of the source, used in logs and errors
    fn location(&self) -> String;

    /// Read, parse and validate the full dataset
    async fn load(&self) -> DomainResult<Dataset>;
}
