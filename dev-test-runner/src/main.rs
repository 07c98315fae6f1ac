//! Runs every fixture document through load → translate → render and reports
//! per-file status. Exits non-zero if any fixture fails.
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use oas2gql::config::{Config, Ordering};

const PATTERNS: [&str; 3] = ["fixtures/**/*.json", "fixtures/**/*.yaml", "fixtures/**/*.yml"];

fn main() -> anyhow::Result<()> {
    let root = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let mut files = Vec::new();
    for pattern in PATTERNS {
        let pattern = root.join(pattern);
        let pattern = pattern.to_str().context("fixture root is not valid UTF-8")?;
        for entry in glob::glob(pattern)? {
            files.push(entry?);
        }
    }
    files.sort();

    let mut failed = 0usize;
    for file in &files {
        match check(file) {
            Ok(summary) => println!("✅ {} {}", file.display(), summary.dimmed()),
            Err(err) => {
                failed += 1;
                println!("❌ {} {}", file.display(), format!("{err:#}").red());
            }
        }
    }

    println!();
    let status = format!("{} fixtures, {} failed", files.len(), failed);
    if failed > 0 {
        println!("{}", status.red().bold());
        std::process::exit(1);
    }
    println!("{}", status.green().bold());
    Ok(())
}

fn check(file: &Path) -> anyhow::Result<String> {
    let location = file.to_str().context("path is not valid UTF-8")?;
    let doc = oas2gql::loader::load(location)?;

    // both orderings and both execution modes must agree with themselves
    let sequential = Config { timestamp: false, ..Config::default() };
    let sdl = oas2gql::generate_sdl(&doc, &sequential)?;
    let parallel = oas2gql::generate_sdl(&doc, &Config { parallel: true, ..sequential.clone() })?;
    anyhow::ensure!(sdl == parallel, "parallel output differs from sequential output");

    let sorted = Config { ordering: Ordering::Lexicographic, ..sequential };
    oas2gql::generate_sdl(&doc, &sorted)?;

    let spec = oas2gql::translate_document(&doc, &Config::default())?;
    Ok(format!(
        "({} types, {} scalars, {} queries, {} mutations)",
        spec.types.len(),
        spec.scalars.len(),
        spec.queries.len(),
        spec.mutations.len()
    ))
}
