//! Job postings produced by an upstream extractor
//!
//! The extractor returns either a JSON array of postings or a single posting
//! object. Each posting is matched against the portfolio by its skills.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PortfolioError, Result};
use crate::matcher::{Portfolio, PortfolioLink};
use crate::search::embedding::Embedder;

/// Rendered in place of a link list when nothing matched
pub const NO_LINKS: &str = "No relevant projects available";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A posting with the portfolio links found for it
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub job: JobPosting,
    pub links: Vec<PortfolioLink>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<JobPosting>),
    One(JobPosting),
}

/// Parse extractor output; a lone object becomes a one-element list
pub fn parse_jobs(json: &str) -> Result<Vec<JobPosting>> {
    let parsed: OneOrMany = serde_json::from_str(json)
        .map_err(|e| PortfolioError::InvalidJobs(e.to_string()))?;
    let jobs = match parsed {
        OneOrMany::Many(jobs) => jobs,
        OneOrMany::One(job) => vec![job],
    };
    Ok(jobs)
}

/// Query links for every job that lists skills
///
/// Jobs without skills are skipped with a warning.
pub fn match_jobs<E: Embedder>(portfolio: &Portfolio<E>, jobs: Vec<JobPosting>, merge: bool) -> Vec<JobMatch> {
    jobs.into_iter()
        .filter_map(|job| {
            if job.skills.is_empty() {
                warn!(role = %job.role, "no skills extracted for job, skipping");
                return None;
            }
            let links = if merge {
                portfolio.query_links_merged(job.skills.clone())
            } else {
                portfolio.query_links(job.skills.clone())
            };
            Some(JobMatch { job, links })
        })
        .collect()
}

/// Comma-separated links, or [`NO_LINKS`] when empty
pub fn link_list(links: &[PortfolioLink]) -> String {
    if links.is_empty() {
        return NO_LINKS.to_string();
    }
    links
        .iter()
        .map(|l| l.links.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
