//! Error types for the portfolio matcher

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the portfolio dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("index error: {0}")]
    Index(#[from] rusqlite::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid insert: {0}")]
    InvalidInsert(String),

    #[error("invalid job postings: {0}")]
    InvalidJobs(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
