use crate::detector::{detect_structures, PatternDetector, StructureDetector};
use crate::error::{LexerError, Result};
use crate::tokenizer::{split_lines, tokenize_lines};
use crate::types::TokenizedFile;
use std::path::Path;

/// Tokenizes one file and detects its structural regions
#[derive(Debug, Clone, Default)]
pub struct FileIndexer<D = PatternDetector> {
    detector: D,
}

impl FileIndexer {
    /// Create a file indexer with the built-in pattern detector
    #[must_use]
    pub const fn new() -> Self {
        Self {
            detector: PatternDetector::new(),
        }
    }
}

impl<D: StructureDetector> FileIndexer<D> {
    /// Create a file indexer with a custom detector
    pub const fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    /// Read and index a file from disk
    pub fn index_file(&self, path: impl AsRef<Path>) -> Result<TokenizedFile> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LexerError::io(path, e))?;
        Ok(self.index_source(&path.to_string_lossy(), &content))
    }

    /// Index in-memory source text as if it was read from `file_path`
    pub fn index_source(&self, file_path: &str, content: &str) -> TokenizedFile {
        // Tokens and blocks share one line array so block indices line up
        let lines = split_lines(content);
        let tokens = tokenize_lines(file_path, &lines);
        let detection = detect_structures(&self.detector, file_path, &lines);

        log::debug!(
            "Indexed {file_path}: {} lines, {} tokens, {} blocks",
            lines.len(),
            tokens.len(),
            detection.code_blocks.len()
        );

        TokenizedFile {
            file_path: file_path.to_string(),
            tokens,
            line_count: lines.len(),
            function_locations: detection.function_locations,
            route_definitions: detection.route_definitions,
            code_blocks: detection.code_blocks,
        }
    }
}

/// Index a file with the default detector
pub fn index_file(path: impl AsRef<Path>) -> Result<TokenizedFile> {
    FileIndexer::new().index_file(path)
}
