use clap::Parser;
use relorder::cli::{Cli, Commands};
use relorder::commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { query, limit }) => run_search(&query, limit),
        Some(Commands::Scores { query, limit }) => run_scores(&query, limit),
        Some(Commands::List) => run_list(),
        Some(Commands::Index) => {
            let count = commands::index_all()?;
            println!("Indexed {count} dataset(s)");
            Ok(())
        }
        None => {
            Cli::parse_from(["relorder", "--help"]);
            Ok(())
        }
    }
}

fn run_search(query: &str, limit: usize) -> anyhow::Result<()> {
    let results = commands::search(query, limit)?;

    if results.is_empty() {
        println!("No matches found for '{query}'");
        return Ok(());
    }

    for ranked in &results {
        println!(
            "{}: {}  [relevance {:.3}]",
            ranked.table, ranked.id, ranked.relevance
        );
        if let Some(summary) = &ranked.summary {
            println!("  {summary}");
        }
    }
    println!("{} result(s) found", results.len());

    Ok(())
}

fn run_scores(query: &str, limit: usize) -> anyhow::Result<()> {
    let dataset_results = commands::search_raw(query, limit)?;

    let mut any_hits = false;
    for entry in &dataset_results {
        if entry.results.is_empty() {
            continue;
        }
        any_hits = true;

        println!("{} ({})", entry.table, entry.root.display());
        for hit in &entry.results.hits {
            println!("  {}: {:.4}", hit.id, hit.relevance);
        }
        println!(
            "  highest {:.4}  lowest {:.4}  average {:.4}",
            entry.results.highest_relevance,
            entry.results.lowest_relevance,
            entry.results.average_relevance
        );
    }

    if !any_hits {
        println!("No matches found for '{query}'");
    }

    Ok(())
}

fn run_list() -> anyhow::Result<()> {
    let datasets = commands::list()?;

    if datasets.is_empty() {
        println!("No datasets found");
        return Ok(());
    }

    for info in &datasets {
        let status = if info.indexed { "indexed" } else { "not indexed" };
        println!(
            "- {}: {} record(s), {status}\n  {}",
            info.table,
            info.records,
            info.root.display()
        );
    }

    Ok(())
}
