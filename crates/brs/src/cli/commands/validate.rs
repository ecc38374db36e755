//! Implementation of `brs validate`.

use std::process::ExitCode;

use brs_query::{Scope, validate_scoped};

use crate::cli::{args::ValidateCommand, context::CommandContext};

/// Checks parentheses, quotes and field suffixes without building a query tree.
pub fn run(ctx: &CommandContext, cmd: &ValidateCommand) -> ExitCode {
    let scope = if cmd.inherit {
        Scope::Inherited
    } else {
        ctx.parse_options().scope()
    };

    match validate_scoped(&cmd.query, scope) {
        Ok(()) => {
            println!("ok");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
