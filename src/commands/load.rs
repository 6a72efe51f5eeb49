//! Load command - populate the portfolio index from the dataset

use anyhow::{Context, Result};
use colored::Colorize;

use portfolio_matcher::{LoadOutcome, Portfolio, PortfolioPaths};

pub fn run(paths: &PortfolioPaths, json: bool) -> Result<()> {
    let portfolio = Portfolio::open(paths)
        .with_context(|| format!("Failed to open portfolio {}", paths.dataset.display()))?;

    if !json {
        println!("{} Loading portfolio data...", "→".dimmed());
    }

    let outcome = portfolio
        .load_portfolio()
        .context("Failed to populate portfolio index")?;

    if json {
        let value = match outcome {
            LoadOutcome::Populated { inserted } => serde_json::json!({
                "populated": true,
                "inserted": inserted,
                "index": paths.index_file().display().to_string(),
            }),
            LoadOutcome::AlreadyLoaded { existing } => serde_json::json!({
                "populated": false,
                "existing": existing,
                "index": paths.index_file().display().to_string(),
            }),
        };
        println!("{}", value);
        return Ok(());
    }

    match outcome {
        LoadOutcome::Populated { inserted } => {
            println!(
                "{} Indexed {} portfolio entries",
                "✓".green().bold(),
                inserted.to_string().cyan()
            );
        }
        LoadOutcome::AlreadyLoaded { existing } => {
            println!(
                "{} Index already holds {} entries, nothing to do",
                "✓".green().bold(),
                existing.to_string().cyan()
            );
        }
    }
    println!(
        "  {} Index saved to: {}",
        "→".dimmed(),
        paths.index_file().display()
    );

    Ok(())
}
