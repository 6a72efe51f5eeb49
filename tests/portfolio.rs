use std::path::Path;

use portfolio_matcher::{
    DatasetError, LoadOutcome, Portfolio, PortfolioError, PortfolioLink, PortfolioPaths,
};

fn write_dataset(dir: &Path, contents: &str) -> PortfolioPaths {
    std::fs::write(dir.join("portfolio.csv"), contents).unwrap();
    PortfolioPaths::from_root(dir.to_path_buf())
}

fn sample_paths(dir: &Path) -> PortfolioPaths {
    write_dataset(
        dir,
        "Techstack,Links\n\
         \"React, Node.js\",https://a.example\n\
         \"Python, ML\",https://b.example\n\
         \"Java, Spring\",https://c.example\n\
         \"Rust, Tokio\",https://d.example\n",
    )
}

fn link(url: &str) -> PortfolioLink {
    PortfolioLink {
        links: url.to_string(),
    }
}

#[test]
fn load_inserts_one_entry_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio = Portfolio::open(&sample_paths(dir.path())).unwrap();

    assert_eq!(
        portfolio.load_portfolio().unwrap(),
        LoadOutcome::Populated { inserted: 4 }
    );
    assert_eq!(portfolio.entry_count().unwrap(), 4);

    portfolio.load_portfolio().unwrap();
    assert_eq!(portfolio.entry_count().unwrap(), 4);
}

#[test]
fn index_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let paths = sample_paths(dir.path());

    Portfolio::open(&paths).unwrap().load_portfolio().unwrap();

    let reopened = Portfolio::open(&paths).unwrap();
    assert_eq!(reopened.entry_count().unwrap(), 4);
    assert_eq!(
        reopened.load_portfolio().unwrap(),
        LoadOutcome::AlreadyLoaded { existing: 4 }
    );
    assert_eq!(reopened.query_links("rust"), reopened.query_links(["Rust"]));
}

#[test]
fn query_returns_at_most_two_links() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio = Portfolio::open(&sample_paths(dir.path())).unwrap();
    portfolio.load_portfolio().unwrap();

    let links = portfolio.query_links("python");
    assert!(!links.is_empty());
    assert!(links.len() <= 2);
    assert!(links.iter().all(|l| l.links.starts_with("https://")));
}

#[test]
fn query_uses_first_skill_only() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio = Portfolio::open(&sample_paths(dir.path())).unwrap();
    portfolio.load_portfolio().unwrap();

    let links = portfolio.query_links(vec!["python".to_string(), "java".to_string()]);
    assert_eq!(links[0], link("https://b.example"));
    assert_eq!(links, portfolio.query_links("python"));
}

#[test]
fn merged_query_deduplicates_across_skills() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio = Portfolio::open(&sample_paths(dir.path())).unwrap();
    portfolio.load_portfolio().unwrap();

    let links = portfolio.query_links_merged(["python", "react", "python"]);
    assert!(links.contains(&link("https://b.example")));
    assert!(links.contains(&link("https://a.example")));
    assert!(links.len() <= 4);

    let mut urls: Vec<_> = links.iter().map(|l| l.links.clone()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), links.len());
}

#[test]
fn empty_query_or_index_returns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio = Portfolio::open(&sample_paths(dir.path())).unwrap();

    assert!(portfolio.query_links("python").is_empty());

    portfolio.load_portfolio().unwrap();
    assert!(portfolio.query_links(Vec::<String>::new()).is_empty());
}

#[test]
fn python_matches_python_project() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_dataset(
        dir.path(),
        "Techstack,Links\n\"React, Node.js\",https://a.example\n\"Python, ML\",https://b.example\n",
    );
    let portfolio = Portfolio::open(&paths).unwrap();
    portfolio.load_portfolio().unwrap();

    let links = portfolio.query_links(["Python"]);
    assert_eq!(links[0], link("https://b.example"));
}

#[test]
fn missing_links_column_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_dataset(dir.path(), "Techstack,Url\nRust,https://d.example\n");

    match Portfolio::open(&paths) {
        Err(PortfolioError::Dataset(DatasetError::MissingColumn(column))) => {
            assert_eq!(column, "Links")
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("dataset without Links column was accepted"),
    }
}

#[test]
fn missing_dataset_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let paths = PortfolioPaths::from_root(dir.path().to_path_buf());

    assert!(matches!(
        Portfolio::open(&paths),
        Err(PortfolioError::Dataset(DatasetError::NotFound(_)))
    ));
}
