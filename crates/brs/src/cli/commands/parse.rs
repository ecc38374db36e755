//! Implementation of `brs parse`.

use std::process::ExitCode;

use brs_query::{count_query_tokens, parse, tokenize};

use crate::cli::{args::ParseCommand, context::CommandContext, output::print_section};

/// Prints the tokens, tree and canonical form of a query.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let query = cmd.query.as_str();

    let tokens = match tokenize(query) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("error: {}", e.with_query(query));
            return ExitCode::FAILURE;
        }
    };
    let listing = tokens
        .iter()
        .map(|t| format!("{:>4}  {}", t.start, t.text))
        .collect::<Vec<_>>()
        .join("\n");
    print_section("Tokens:", &listing);

    match parse(query, &ctx.parse_options()) {
        Ok(Some(node)) => {
            print_section("Parsed AST:", &node.to_string());
            print_section("Canonical:", &node.to_query_string());
        }
        Ok(None) => {
            println!("(empty query)");
            println!();
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    println!("Token count: {}", count_query_tokens(query));
    ExitCode::SUCCESS
}
