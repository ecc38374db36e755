//! Implementation of `brs index`.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    process::ExitCode,
};

use brs_index::{BuildOptions, PatentDocument, build_index, read_documents};
use tracing::info;

use crate::cli::{args::IndexCommand, context::CommandContext};

/// Builds the index from a JSON Lines file, replacing any previous contents.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let documents = match load_documents(&cmd.file) {
        Ok(docs) => docs,
        Err(code) => return code,
    };

    let mut options = BuildOptions::from(&ctx.config.index);
    if let Some(memory_limit_mb) = cmd.memory_limit_mb {
        options.memory_limit_mb = memory_limit_mb;
    }
    if let Some(workers) = cmd.workers {
        options.workers = workers;
    }

    let dir = ctx.index_dir(cmd.dir.index.as_deref());
    info!(path = %dir.display(), documents = documents.len(), "building index");

    match build_index(&dir, documents, &options) {
        Ok(stats) => {
            println!(
                "Indexed {} documents in {:.2}s",
                stats.documents_indexed,
                stats.elapsed.as_secs_f64()
            );
            println!("Index: {}", dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: indexing failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reads all documents from `path`, or from stdin for `-`.
fn load_documents(path: &Path) -> Result<Vec<PatentDocument>, ExitCode> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("error: failed to open {}: {e}", path.display());
                return Err(ExitCode::FAILURE);
            }
        }
    };

    read_documents(reader).map_err(|e| {
        eprintln!("error: {}: {e}", path.display());
        ExitCode::FAILURE
    })
}
