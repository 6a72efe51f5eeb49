//! portfolio-matcher library
//!
//! Matches requested skills against a portfolio of past projects.
//!
//! # Modules
//!
//! - `dataset`: CSV portfolio loading with header validation
//! - `search`: embeddings and the persistent similarity collection
//! - `matcher`: idempotent index population and skill queries
//! - `jobs`: extracted job postings and per-job link matching

pub mod config;
pub mod dataset;
pub mod error;
pub mod jobs;
pub mod matcher;
pub mod search;

// Re-exports for convenience
pub use config::PortfolioPaths;
pub use dataset::PortfolioEntry;
pub use error::{DatasetError, PortfolioError, Result};
pub use jobs::{JobMatch, JobPosting};
pub use matcher::{LoadOutcome, Portfolio, PortfolioLink, Skills};
pub use search::{Collection, QueryResult};
