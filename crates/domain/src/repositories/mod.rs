//! Repository Abstractions - ports for the infrastructure layer
//!
//! Domain defines the contract, infrastructure provides the backing store.

mod dataset_repository;

pub use dataset_repository::DatasetRepository;
