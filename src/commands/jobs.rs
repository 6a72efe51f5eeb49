//! Jobs command - attach portfolio links to extracted job postings

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use portfolio_matcher::jobs::{link_list, match_jobs, parse_jobs};
use portfolio_matcher::{Portfolio, PortfolioPaths};

pub fn run(paths: &PortfolioPaths, jobs_file: &Path, merge: bool, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(jobs_file)
        .with_context(|| format!("Failed to read {}", jobs_file.display()))?;
    let jobs = parse_jobs(&raw).context("Unable to parse jobs")?;

    if jobs.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("{} No job information in {}", "!".yellow(), jobs_file.display());
        }
        return Ok(());
    }

    let portfolio = Portfolio::open(paths)
        .with_context(|| format!("Failed to open portfolio {}", paths.dataset.display()))?;
    portfolio
        .load_portfolio()
        .context("Failed to populate portfolio index")?;

    let total = jobs.len();
    let matches = match_jobs(&portfolio, jobs, merge);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        let role = if m.job.role.is_empty() { "Untitled role" } else { m.job.role.as_str() };
        println!("{}. {}", (i + 1).to_string().bold(), role.cyan());
        if let Some(ref experience) = m.job.experience {
            println!("   {} {}", "Experience:".dimmed(), experience);
        }
        println!("   {} {}", "Skills:".dimmed(), m.job.skills.join(", "));
        println!("   {} {}", "Links:".dimmed(), link_list(&m.links));
        println!();
    }

    let skipped = total - matches.len();
    if skipped > 0 {
        println!("  {} {} jobs skipped (no skills)", "→".dimmed(), skipped);
    }

    Ok(())
}
