use crate::codebase::CodebaseIndex;
use crate::error::{IndexerError, Result};
use codemap_lexer::{IndexRecord, RecordKind};
use std::collections::HashMap;

/// Downstream store for token and block records (e.g. a vector index).
///
/// The handle is owned by the caller and passed in explicitly.
pub trait RecordSink {
    fn open(&mut self) -> Result<()>;

    /// Insert or replace records by id
    fn upsert(&mut self, records: Vec<IndexRecord>) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// In-memory sink keyed by record id
#[derive(Debug, Default)]
pub struct MemorySink {
    records: HashMap<String, IndexRecord>,
    is_open: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&IndexRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn count_kind(&self, kind: RecordKind) -> usize {
        self.records.values().filter(|r| r.kind == kind).count()
    }
}

impl RecordSink for MemorySink {
    fn open(&mut self) -> Result<()> {
        self.is_open = true;
        Ok(())
    }

    fn upsert(&mut self, records: Vec<IndexRecord>) -> Result<()> {
        if !self.is_open {
            return Err(IndexerError::sink("upsert on a closed sink"));
        }
        for record in records {
            self.records.insert(record.id.clone(), record);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.is_open = false;
        Ok(())
    }
}

/// Push every token and block of `index` into `sink`, one batch per file.
///
/// The sink is closed even when a batch fails. Returns the number of records sent.
pub fn export_records<S: RecordSink + ?Sized>(index: &CodebaseIndex, sink: &mut S) -> Result<usize> {
    sink.open()?;

    let mut sent = 0;
    let mut outcome = Ok(());
    for file in &index.files {
        let batch: Vec<IndexRecord> = file.records().collect();
        let len = batch.len();
        if let Err(e) = sink.upsert(batch) {
            log::warn!("Record export stopped at {}: {e}", file.file_path);
            outcome = Err(e);
            break;
        }
        sent += len;
    }

    let closed = sink.close();
    outcome?;
    closed?;

    log::info!("Exported {sent} records from {} files", index.files.len());
    Ok(sent)
}
