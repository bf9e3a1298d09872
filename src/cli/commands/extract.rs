//! Extract command - run one extraction cycle and summarize the index

use crate::cli::args::{ExtractArgs, OutputFormat};
use crate::cli::commands::{build_extractor, resolve_roots};
use crate::config::Config;
use crate::error::VutilResult;
use console::style;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Execute the extract command
pub async fn execute(args: ExtractArgs, config: &Config) -> VutilResult<()> {
    let roots = resolve_roots(&args.roots)?;
    let extractor = build_extractor(roots, config);

    extractor.extract_all(args.force).await?;
    let summary = extractor.index_summary();

    match args.format {
        OutputFormat::Table => print_table(&summary),
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Plain => print_plain(&summary),
    }

    Ok(())
}

fn print_table(summary: &BTreeMap<PathBuf, usize>) {
    if summary.is_empty() {
        println!("No vuetify installations found.");
        return;
    }

    println!("{:<60} {:>8}", "ROOT", "RECORDS");
    println!("{}", "-".repeat(70));
    for (root, count) in summary {
        println!("{:<60} {:>8}", root.display(), count);
    }

    let total: usize = summary.values().sum();
    println!();
    println!(
        "Total: {} record(s) across {} root(s)",
        style(total).green(),
        summary.len()
    );
}

fn print_json(summary: &BTreeMap<PathBuf, usize>) -> VutilResult<()> {
    #[derive(serde::Serialize)]
    struct RootJson<'a> {
        root: &'a std::path::Path,
        records: usize,
    }

    let rows: Vec<RootJson> = summary
        .iter()
        .map(|(root, count)| RootJson {
            root,
            records: *count,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn print_plain(summary: &BTreeMap<PathBuf, usize>) {
    for (root, count) in summary {
        println!("{} {}", root.display(), count);
    }
}
