//! Implementation of `brs config`.

use std::process::ExitCode;

use brs_config::discover_config_files;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings and any warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    let files = discover_config_files(&ctx.cwd);
    if files.is_empty() {
        println!("# No configuration files found; showing defaults.");
    } else {
        println!("# Config files (highest precedence first):");
        for path in &files {
            println!("#   {}", path.display());
        }
    }
    println!("# Index directory: {}", config.index_dir(&ctx.cwd).display());
    println!();

    match config.settings_to_toml() {
        Ok(toml) => print!("{toml}"),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    for warning in config.validate() {
        eprintln!("warning: {warning}");
    }
    ExitCode::SUCCESS
}
