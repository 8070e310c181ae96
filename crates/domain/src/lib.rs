//! Domain Layer - sales dataset model and business computations
//!
//! Содержит ТОЛЬКО чистую business logic без dependencies на:
//! - Infrastructure (file systems, networks)
//! - Frameworks (web)
//! - External systems (generative language APIs)
//!
//! - Entities: SalesRep, Deal, Client, Dataset
//! - Repository Abstractions: `DatasetRepository` port for the backing store
//! - Services: analytics aggregation and the context digest

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;

pub use entities::{Client, Dataset, Deal, DealStatus, SalesRep};
pub use errors::{DomainError, DomainResult};
pub use repositories::DatasetRepository;
pub use services::{
    build_context, compute_analytics, format_currency, SalesAnalytics, SalesContext, StatusTally,
};
