//! Portfolio dataset loading
//!
//! The dataset is a CSV file with a `Techstack` column (free-text skills) and
//! a `Links` column (project URL). Other columns are ignored.

use std::fs::File;
use std::path::Path;

use crate::error::DatasetError;

pub const TECHSTACK_COLUMN: &str = "Techstack";
pub const LINKS_COLUMN: &str = "Links";

/// One row of the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioEntry {
    pub skills_text: String,
    pub link: String,
}

impl PortfolioEntry {
    pub fn new(skills_text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            skills_text: skills_text.into(),
            link: link.into(),
        }
    }
}

/// Read every row of the dataset at `path`
pub fn load_dataset(path: &Path) -> Result<Vec<PortfolioEntry>, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;
    read_entries(file)
}

/// Parse dataset rows from any reader
///
/// The header row is checked before any record is read, so a dataset without
/// `Techstack` or `Links` fails even when it has no data rows.
pub fn read_entries<R: std::io::Read>(reader: R) -> Result<Vec<PortfolioEntry>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DatasetError::MissingColumn(name))
    };
    let techstack_idx = column(TECHSTACK_COLUMN)?;
    let links_idx = column(LINKS_COLUMN)?;

    let mut entries = Vec::new();
    for record in rdr.records() {
        let record = record?;
        entries.push(PortfolioEntry {
            skills_text: record.get(techstack_idx).unwrap_or_default().to_string(),
            link: record.get(links_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(entries)
}
