//! Query command - portfolio links for a list of skills

use anyhow::{Context, Result};
use colored::Colorize;

use portfolio_matcher::{Portfolio, PortfolioPaths};

/// Load the portfolio if needed, then print links for `skills`
///
/// Without `merge` only the first skill's matches are shown.
pub fn run(paths: &PortfolioPaths, skills: Vec<String>, merge: bool, json: bool) -> Result<()> {
    let portfolio = Portfolio::open(paths)
        .with_context(|| format!("Failed to open portfolio {}", paths.dataset.display()))?;
    portfolio
        .load_portfolio()
        .context("Failed to populate portfolio index")?;

    let query = skills.join(", ");
    let links = if merge {
        portfolio.query_links_merged(skills)
    } else {
        portfolio.query_links(skills)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        println!("{} No portfolio links found for: {}", "→".dimmed(), query.cyan());
        return Ok(());
    }

    println!(
        "{} {} links for: {}",
        "→".dimmed(),
        links.len(),
        query.cyan()
    );
    println!();
    for (i, link) in links.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().bold(), link.links);
    }

    Ok(())
}
