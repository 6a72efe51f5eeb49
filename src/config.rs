use std::path::PathBuf;

/// Default dataset file name, relative to the root directory
pub const DATASET_FILE: &str = "portfolio.csv";

/// Default index store directory, relative to the root directory
pub const STORE_DIR: &str = "portfolio_store";

/// Name of the collection holding portfolio entries
pub const COLLECTION_NAME: &str = "portfolio";

/// Nearest matches requested per skill query
pub const N_RESULTS: usize = 2;

/// Locations of the dataset and the persistent index
#[derive(Debug, Clone)]
pub struct PortfolioPaths {
    pub dataset: PathBuf,
    pub store: PathBuf,
}

impl PortfolioPaths {
    pub fn new() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_root(root)
    }

    pub fn from_root(root: PathBuf) -> Self {
        Self {
            dataset: root.join(DATASET_FILE),
            store: root.join(STORE_DIR),
        }
    }

    /// Replace defaults with explicitly given paths
    pub fn with_overrides(mut self, dataset: Option<PathBuf>, store: Option<PathBuf>) -> Self {
        if let Some(dataset) = dataset {
            self.dataset = dataset;
        }
        if let Some(store) = store {
            self.store = store;
        }
        self
    }

    pub fn index_file(&self) -> PathBuf {
        self.store.join(crate::search::collection::INDEX_FILE)
    }
}

impl Default for PortfolioPaths {
    fn default() -> Self {
        Self::new()
    }
}
