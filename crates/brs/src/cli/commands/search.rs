//! Implementation of `brs search`.

use std::process::ExitCode;

use brs_index::{Searcher, SearchError};

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{output_hits, print_section},
};

/// Searches the index and prints ranked publication numbers.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let mut searcher = match ctx.searcher(cmd.dir.index.as_deref()) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Some(scoring) = cmd.scoring {
        searcher.set_scoring(scoring);
    }

    if cmd.explain {
        return explain(&searcher, &cmd.query);
    }

    let limit = cmd.limit.unwrap_or(searcher.settings().limit);
    match searcher.execute_with_limit(&cmd.query, limit) {
        Ok(hits) => output_hits(&hits, &cmd.query, cmd.json),
        Err(e) => report(&e),
    }
}

/// Prints the parsed and compiled forms of the query.
fn explain(searcher: &Searcher, query: &str) -> ExitCode {
    print_section("Query:", query);

    let explanation = match searcher.explain(query) {
        Ok(Some(explanation)) => explanation,
        Ok(None) => {
            println!("(empty query)");
            return ExitCode::SUCCESS;
        }
        Err(e) => return report(&e),
    };

    print_section("Parsed AST:", &explanation.ast.to_string());
    print_section("Canonical:", &explanation.ast.to_query_string());
    print_section("Compiled:", &explanation.compiled.to_string());

    let settings = searcher.settings();
    let params = format!(
        "scoring = {}\nlimit = {}\ndocuments = {}",
        settings.scoring,
        settings.limit,
        searcher.num_docs()
    );
    print_section("Search Parameters:", &params);
    ExitCode::SUCCESS
}

/// Prints a search failure, naming the stage that rejected the query.
fn report(err: &SearchError) -> ExitCode {
    match err {
        SearchError::Policy(e) => eprintln!("error: query rejected: {e}"),
        SearchError::Query(e) => eprintln!("error: {e}"),
        SearchError::Index(e) => eprintln!("error: search failed: {e}"),
    }
    ExitCode::FAILURE
}
