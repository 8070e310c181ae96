//! Domain Entities - sales team records
//!
//! Immutable after load; independent of infrastructure concerns.

mod dataset;
mod deal;
mod sales_rep;

pub use dataset::Dataset;
pub use deal::{Deal, DealStatus};
pub use sales_rep::{Client, SalesRep};
