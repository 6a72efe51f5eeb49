//! Portfolio matcher - maps requested skills to portfolio links
//!
//! The dataset is read into memory once; the index is filled from it only
//! when it holds no entries at all, so repeated loads (in this process or a
//! later one sharing the same store) never duplicate rows.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{PortfolioPaths, COLLECTION_NAME, N_RESULTS};
use crate::dataset::{load_dataset, PortfolioEntry};
use crate::error::Result;
use crate::search::collection::{Collection, Metadata};
use crate::search::embedding::{Embedder, HarmonicEmbedder};

/// Metadata returned for a match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortfolioLink {
    pub links: String,
}

/// Skill strings to query with; built from one string or a list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skills(Vec<String>);

impl Skills {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Skills {
    fn from(skill: &str) -> Self {
        Self(vec![skill.to_string()])
    }
}

impl From<String> for Skills {
    fn from(skill: String) -> Self {
        Self(vec![skill])
    }
}

impl From<Vec<String>> for Skills {
    fn from(skills: Vec<String>) -> Self {
        Self(skills)
    }
}

impl From<&[String]> for Skills {
    fn from(skills: &[String]) -> Self {
        Self(skills.to_vec())
    }
}

impl From<Vec<&str>> for Skills {
    fn from(skills: Vec<&str>) -> Self {
        Self(skills.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Skills {
    fn from(skills: [&str; N]) -> Self {
        Self(skills.into_iter().map(String::from).collect())
    }
}

/// What `load_portfolio` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The index was empty and every dataset row was inserted
    Populated { inserted: usize },
    /// The index already held entries; nothing was inserted
    AlreadyLoaded { existing: usize },
}

pub struct Portfolio<E: Embedder = HarmonicEmbedder> {
    entries: Vec<PortfolioEntry>,
    collection: Collection<E>,
}

impl Portfolio<HarmonicEmbedder> {
    /// Read the dataset and open the persistent `portfolio` collection
    pub fn open(paths: &PortfolioPaths) -> Result<Self> {
        let entries = load_dataset(&paths.dataset)?;
        let collection = Collection::open(&paths.store, COLLECTION_NAME)?;
        Ok(Self::from_parts(entries, collection))
    }
}

impl<E: Embedder> Portfolio<E> {
    /// Read the dataset at `dataset_path` and hold `collection` as the index
    pub fn new(dataset_path: &Path, collection: Collection<E>) -> Result<Self> {
        let entries = load_dataset(dataset_path)?;
        Ok(Self::from_parts(entries, collection))
    }

    pub fn from_parts(entries: Vec<PortfolioEntry>, collection: Collection<E>) -> Self {
        Self {
            entries,
            collection,
        }
    }

    /// Number of entries in the index
    pub fn entry_count(&self) -> Result<usize> {
        self.collection.count()
    }

    /// Fill the index from the dataset unless it already holds entries
    pub fn load_portfolio(&self) -> Result<LoadOutcome> {
        let existing = self.collection.count()?;
        if existing > 0 {
            debug!(existing, "portfolio index already populated");
            return Ok(LoadOutcome::AlreadyLoaded { existing });
        }

        let documents: Vec<String> = self.entries.iter().map(|e| e.skills_text.clone()).collect();
        let metadatas: Vec<Metadata> = self.entries.iter().map(|e| link_metadata(&e.link)).collect();
        let ids: Vec<String> = self
            .entries
            .iter()
            .map(|_| uuid::Uuid::new_v4().to_string())
            .collect();

        self.collection.add(&documents, &metadatas, &ids)?;
        info!(inserted = ids.len(), collection = self.collection.name(), "portfolio index populated");

        Ok(LoadOutcome::Populated {
            inserted: ids.len(),
        })
    }

    /// Links matching the first skill only
    ///
    /// Every skill is queried, but only the matches of the first one are
    /// returned. Failures are logged and yield an empty list.
    pub fn query_links(&self, skills: impl Into<Skills>) -> Vec<PortfolioLink> {
        let skills = skills.into();
        match self.query_all(&skills) {
            Ok(per_skill) => per_skill.into_iter().next().unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "error querying portfolio");
                Vec::new()
            }
        }
    }

    /// Links matching any of the skills, in query order, without duplicates
    pub fn query_links_merged(&self, skills: impl Into<Skills>) -> Vec<PortfolioLink> {
        let skills = skills.into();
        match self.query_all(&skills) {
            Ok(per_skill) => {
                let mut seen = HashSet::new();
                per_skill
                    .into_iter()
                    .flatten()
                    .filter(|link| seen.insert(link.links.clone()))
                    .collect()
            }
            Err(e) => {
                error!(error = %e, "error querying portfolio");
                Vec::new()
            }
        }
    }

    fn query_all(&self, skills: &Skills) -> Result<Vec<Vec<PortfolioLink>>> {
        debug!(skills = ?skills.as_slice(), "querying portfolio");
        let result = self.collection.query(skills.as_slice(), N_RESULTS)?;

        let mut per_skill = Vec::with_capacity(result.metadatas.len());
        for metadatas in result.metadatas {
            let links = metadatas
                .into_iter()
                .map(|m| serde_json::from_value(Value::Object(m)))
                .collect::<std::result::Result<Vec<PortfolioLink>, _>>()?;
            per_skill.push(links);
        }
        Ok(per_skill)
    }
}

fn link_metadata(link: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("links".to_string(), Value::String(link.to_string()));
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortfolioError;

    fn portfolio(rows: &[(&str, &str)]) -> Portfolio {
        let entries = rows
            .iter()
            .map(|(skills, link)| PortfolioEntry::new(*skills, *link))
            .collect();
        let collection = Collection::open_in_memory(COLLECTION_NAME).unwrap();
        Portfolio::from_parts(entries, collection)
    }

    fn sample() -> Portfolio {
        portfolio(&[
            ("React, Node.js", "https://a.example"),
            ("Python, ML", "https://b.example"),
            ("Java, Spring Boot", "https://c.example"),
        ])
    }

    fn link(url: &str) -> PortfolioLink {
        PortfolioLink {
            links: url.to_string(),
        }
    }

    #[test]
    fn test_skills_normalization() {
        assert_eq!(Skills::from("python").as_slice(), &["python".to_string()]);
        assert_eq!(
            Skills::from(["python", "java"]).as_slice(),
            &["python".to_string(), "java".to_string()]
        );
        assert!(Skills::from(Vec::<String>::new()).as_slice().is_empty());
    }

    #[test]
    fn test_load_inserts_every_row() {
        let portfolio = sample();
        assert_eq!(
            portfolio.load_portfolio().unwrap(),
            LoadOutcome::Populated { inserted: 3 }
        );
        assert_eq!(portfolio.entry_count().unwrap(), 3);
    }

    #[test]
    fn test_load_is_idempotent() {
        let portfolio = sample();
        portfolio.load_portfolio().unwrap();
        assert_eq!(
            portfolio.load_portfolio().unwrap(),
            LoadOutcome::AlreadyLoaded { existing: 3 }
        );
        assert_eq!(portfolio.entry_count().unwrap(), 3);
    }

    #[test]
    fn test_query_single_string() {
        let portfolio = sample();
        portfolio.load_portfolio().unwrap();

        let links = portfolio.query_links("python");
        assert!(!links.is_empty() && links.len() <= 2);
        assert_eq!(links[0], link("https://b.example"));
    }

    #[test]
    fn test_query_returns_first_skill_only() {
        let portfolio = sample();
        portfolio.load_portfolio().unwrap();

        let links = portfolio.query_links(["python", "java"]);
        assert_eq!(links, portfolio.query_links("python"));
        assert_eq!(links[0], link("https://b.example"));
    }

    #[test]
    fn test_query_merged_covers_every_skill() {
        let portfolio = sample();
        portfolio.load_portfolio().unwrap();

        let links = portfolio.query_links_merged(["python", "java"]);
        assert!(links.contains(&link("https://b.example")));
        assert!(links.contains(&link("https://c.example")));

        let unique: HashSet<_> = links.iter().collect();
        assert_eq!(unique.len(), links.len());
    }

    #[test]
    fn test_query_empty_input_or_index() {
        let portfolio = sample();
        assert!(portfolio.query_links("python").is_empty());

        portfolio.load_portfolio().unwrap();
        assert!(portfolio.query_links(Vec::<String>::new()).is_empty());
        assert!(portfolio.query_links_merged(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_query_with_malformed_metadata_is_empty() {
        let portfolio = portfolio(&[]);
        let mut metadata = Metadata::new();
        metadata.insert("url".to_string(), Value::String("https://x.example".to_string()));
        portfolio
            .collection
            .add(&["Python".to_string()], &[metadata], &["x".to_string()])
            .unwrap();

        assert!(portfolio.query_links("python").is_empty());
    }

    #[test]
    fn test_empty_dataset_populates_nothing() {
        let portfolio = portfolio(&[]);
        assert_eq!(
            portfolio.load_portfolio().unwrap(),
            LoadOutcome::Populated { inserted: 0 }
        );
        assert_eq!(portfolio.entry_count().unwrap(), 0);
    }

    /// One axis per known skill, so only exact skill words match
    struct KeywordEmbedder;

    impl Embedder for KeywordEmbedder {
        fn dimension(&self) -> usize {
            2
        }

        fn embed(&self, text: &str) -> Vec<f32> {
            let text = text.to_lowercase();
            let has = |word: &str| if text.contains(word) { 1.0 } else { 0.0 };
            vec![has("python"), has("react")]
        }
    }

    #[test]
    fn test_portfolio_with_custom_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::open_with(dir.path(), COLLECTION_NAME, KeywordEmbedder).unwrap();
        let portfolio = Portfolio::from_parts(
            vec![
                PortfolioEntry::new("React, Node.js", "https://a.example"),
                PortfolioEntry::new("Python, ML", "https://b.example"),
            ],
            collection,
        );

        assert_eq!(
            portfolio.load_portfolio().unwrap(),
            LoadOutcome::Populated { inserted: 2 }
        );
        assert_eq!(portfolio.query_links("react")[0], link("https://a.example"));
        assert_eq!(portfolio.query_links("Python")[0], link("https://b.example"));
    }

    #[test]
    fn test_missing_dataset_fails_construction() {
        let collection = Collection::open_in_memory(COLLECTION_NAME).unwrap();
        let result = Portfolio::new(Path::new("/tmp/nonexistent/portfolio.csv"), collection);
        assert!(matches!(result, Err(PortfolioError::Dataset(_))));
    }
}
