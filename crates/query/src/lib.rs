//! Remote feature-query collaborators.
//!
//! Both the migration-flow table and the covariates table are attribute-only
//! feature services. This crate defines the `FeatureService` seam, an HTTP
//! implementation of the REST `query` operation, an in-memory implementation
//! for tests, and the typed requests the viewer issues.

pub mod error;
pub mod feature;
pub mod filter;
pub mod requests;
pub mod service;

pub use error::*;
pub use feature::*;
pub use filter::*;
pub use requests::*;
pub use service::*;
