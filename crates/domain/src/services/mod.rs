//! Domain Services - pure computations over the dataset

mod analytics_service;
mod context_service;

pub use analytics_service::{compute_analytics, SalesAnalytics, StatusTally};
pub use context_service::{build_context, format_currency, SalesContext};
