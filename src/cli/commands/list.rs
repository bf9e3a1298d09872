//! List command - query extracted utility classes

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::commands::{build_extractor, resolve_roots};
use crate::config::Config;
use crate::error::{VutilError, VutilResult};
use crate::record::{Category, Record};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> VutilResult<()> {
    let category = args
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;

    let roots = resolve_roots(&args.roots)?;
    let extractor = build_extractor(roots, config);
    extractor.ensure_extracted().await?;

    let records: Vec<Record> = extractor
        .all_records()
        .into_iter()
        .filter(|r| category.is_none_or(|c| r.category == c))
        .filter(|r| {
            args.prefix
                .as_deref()
                .is_none_or(|prefix| r.name.starts_with(prefix))
        })
        .collect();

    match args.format {
        OutputFormat::Table => print_table(&records),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for record in &records {
                println!("{}", record.name);
            }
        }
    }

    Ok(())
}

fn parse_category(name: &str) -> VutilResult<Category> {
    Category::all()
        .iter()
        .copied()
        .find(|c| c.to_string() == name)
        .ok_or_else(|| {
            VutilError::User(format!(
                "Unknown category '{}'. Known categories: {}",
                name,
                Category::all()
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

fn print_table(records: &[Record]) {
    if records.is_empty() {
        println!("No utility classes extracted.");
        return;
    }

    println!("{:<28} {:<12} {}", "NAME", "CATEGORY", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for record in records {
        println!(
            "{:<28} {:<12} {}",
            record.name,
            record.category,
            record.description.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("Total: {} class(es)", style(records.len()).green());
}
