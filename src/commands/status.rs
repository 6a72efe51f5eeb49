//! Status command - is the portfolio loaded, and how big is it

use anyhow::Result;
use colored::Colorize;

use portfolio_matcher::config::COLLECTION_NAME;
use portfolio_matcher::dataset::load_dataset;
use portfolio_matcher::{Collection, PortfolioPaths};

pub fn run(paths: &PortfolioPaths, json: bool) -> Result<()> {
    let index_file = paths.index_file();
    // Opening would create the store, so check first
    let count = if index_file.exists() {
        Collection::open(&paths.store, COLLECTION_NAME)?.count()?
    } else {
        0
    };

    let file_size = std::fs::metadata(&index_file).map(|m| m.len()).unwrap_or(0);
    let dataset = load_dataset(&paths.dataset).map(|entries| entries.len());

    if json {
        println!(
            "{}",
            serde_json::json!({
                "loaded": count > 0,
                "entries": count,
                "dataset": paths.dataset.display().to_string(),
                "dataset_rows": dataset.as_ref().ok(),
                "dataset_error": dataset.as_ref().err().map(|e| e.to_string()),
                "index": index_file.display().to_string(),
                "file_size_bytes": file_size,
            })
        );
        return Ok(());
    }

    println!("{}", "Portfolio Status".bold());
    println!();
    if count > 0 {
        println!("  {} Portfolio loaded", "✓".green().bold());
        println!("  {} Total entries: {}", "→".dimmed(), count.to_string().cyan());
        println!("  {} Size: {:.2} KB", "→".dimmed(), file_size as f64 / 1024.0);
    } else {
        println!(
            "  {} Portfolio not loaded yet. Run {} first.",
            "!".yellow().bold(),
            "portfolio load".cyan()
        );
    }
    match dataset {
        Ok(rows) => println!(
            "  {} Dataset rows: {} ({})",
            "→".dimmed(),
            rows.to_string().cyan(),
            paths.dataset.display()
        ),
        Err(e) => println!("  {} {}", "✗".red(), e),
    }

    Ok(())
}
