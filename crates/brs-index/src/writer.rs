//! Index creation and bulk loading.

use std::{
    fs,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use brs_config::IndexSettings;
use tantivy::{
    Index, IndexWriter as TantivyIndexWriter, TantivyDocument, directory::MmapDirectory,
};
use tracing::{debug, info, warn};

use crate::{
    analyzer::register_tokenizers, document::PatentDocument, error::IndexError,
    schema::IndexSchema,
};

/// Smallest per-thread indexing heap Tantivy accepts.
const MIN_HEAP_PER_THREAD: usize = 15_000_000;

/// Largest per-thread indexing heap Tantivy accepts.
const MAX_HEAP_PER_THREAD: usize = 4_000_000_000;

/// Most indexing threads Tantivy will run.
const MAX_WORKERS: usize = 8;

/// Resource settings for building an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Memory budget in megabytes, shared by all workers.
    pub memory_limit_mb: usize,
    /// Indexing threads (0 = one per CPU).
    pub workers: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from(&IndexSettings::default())
    }
}

impl From<&IndexSettings> for BuildOptions {
    fn from(settings: &IndexSettings) -> Self {
        Self {
            memory_limit_mb: settings.memory_limit_mb,
            workers: settings.workers,
        }
    }
}

impl BuildOptions {
    /// Resolves the thread count and per-thread heap, clamped to what Tantivy accepts.
    fn resolve(&self) -> (usize, usize) {
        let requested = if self.workers == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            self.workers
        };
        let workers = requested.clamp(1, MAX_WORKERS);
        if workers != requested && self.workers != 0 {
            warn!(requested, workers, "clamped indexing workers");
        }

        let budget = self.memory_limit_mb.saturating_mul(1_000_000);
        let per_thread = budget / workers;
        let clamped = per_thread.clamp(MIN_HEAP_PER_THREAD, MAX_HEAP_PER_THREAD);
        if clamped != per_thread {
            warn!(
                memory_limit_mb = self.memory_limit_mb,
                workers,
                heap_per_thread = clamped,
                "clamped per-worker indexing heap"
            );
        }
        (workers, clamped)
    }
}

/// Statistics from a build.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of documents written.
    pub documents_indexed: usize,
    /// Wall-clock time spent building.
    pub elapsed: Duration,
}

/// Opens the index directory with the patent tokenizers registered.
pub fn open_index(path: &Path) -> Result<Index, IndexError> {
    if !path.exists() {
        return Err(IndexError::OpenIndex {
            path: path.to_path_buf(),
            message: "index directory does not exist".to_string(),
        });
    }

    let dir = MmapDirectory::open(path).map_err(|e| {
        let err: tantivy::TantivyError = e.into();
        IndexError::open_index(path.to_path_buf(), &err)
    })?;
    let index = Index::open(dir).map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
    register_tokenizers(&index);
    Ok(index)
}

/// Writes patent documents to a Tantivy index.
pub struct IndexWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: IndexSchema,
}

impl IndexWriter {
    /// Opens or creates an index at the given path.
    pub fn open(path: &Path, options: &BuildOptions) -> Result<Self, IndexError> {
        let schema = IndexSchema::new();

        fs::create_dir_all(path)?;

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        register_tokenizers(&index);

        let (workers, heap_per_thread) = options.resolve();
        debug!(workers, heap_per_thread, "opening index writer");
        let writer = index
            .writer_with_num_threads(workers, workers * heap_per_thread)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            index,
            writer,
            schema,
        })
    }

    /// Stages a document; it becomes visible after [`commit`](Self::commit).
    pub fn add_document(&mut self, doc: &PatentDocument) -> Result<(), IndexError> {
        let mut tantivy_doc = TantivyDocument::new();
        tantivy_doc.add_text(self.schema.id, &doc.id);
        tantivy_doc.add_text(self.schema.title, &doc.title);
        tantivy_doc.add_text(self.schema.abstract_text, &doc.abstract_text);
        tantivy_doc.add_text(self.schema.claims, &doc.claims);
        tantivy_doc.add_text(self.schema.description, &doc.description);
        tantivy_doc.add_text(self.schema.classification, doc.classification_text());

        self.writer
            .add_document(tantivy_doc)
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Deletes all documents from the index.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Commits all pending changes to the index.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Returns the number of committed documents.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::read(&e))?;
        Ok(reader.searcher().num_docs())
    }
}

/// Builds an index at `path` from `documents`, replacing any existing contents.
pub fn build_index<I>(
    path: &Path,
    documents: I,
    options: &BuildOptions,
) -> Result<IndexStats, IndexError>
where
    I: IntoIterator<Item = PatentDocument>,
{
    let started = Instant::now();
    let mut writer = IndexWriter::open(path, options)?;
    writer.delete_all()?;

    let mut documents_indexed = 0;
    for doc in documents {
        writer.add_document(&doc)?;
        documents_indexed += 1;
        if documents_indexed % 10_000 == 0 {
            info!(documents_indexed, "indexing");
        }
    }
    writer.commit()?;

    let stats = IndexStats {
        documents_indexed,
        elapsed: started.elapsed(),
    };
    info!(
        documents = stats.documents_indexed,
        elapsed_ms = stats.elapsed.as_millis(),
        path = %path.display(),
        "built index"
    );
    Ok(stats)
}
