//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use brs_index::SearchHit;
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;

/// JSON output for a search.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The original query string.
    query: &'a str,
    /// Ranked results.
    results: &'a [SearchHit],
    /// Total matches returned.
    total_matches: usize,
}

/// Prints search hits as a ranked table or as JSON.
pub fn output_hits(hits: &[SearchHit], query: &str, json: bool) -> ExitCode {
    if json {
        let output = JsonSearchOutput {
            query,
            results: hits,
            total_matches: hits.len(),
        };
        return print_json(&output);
    }

    if hits.is_empty() {
        println!("No results found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", hits_table(hits));
    ExitCode::SUCCESS
}

/// Builds the rank / publication number / score table.
pub fn hits_table(hits: &[SearchHit]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Publication", "Score"]);
    for (rank, hit) in hits.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(&hit.id),
            Cell::new(format!("{:.4}", hit.score)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Serializes a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Indents every line of `content` by three spaces.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("   {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints a section heading followed by its indented body and a blank line.
pub fn print_section(title: &str, body: &str) {
    println!("{title}");
    println!("{}", indent_content(body));
    println!();
}
