use crate::codebase::CodebaseIndex;
use codemap_lexer::{BlockType, TokenizedFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about an indexed codebase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of files indexed
    pub files: usize,

    /// Total lines across all files
    pub total_lines: usize,

    /// Total tokens, newline tokens included
    pub tokens: usize,

    pub functions: usize,

    /// Distinct route paths
    pub routes: usize,

    pub components: usize,

    pub blocks_by_type: BTreeMap<BlockType, usize>,
}

impl IndexStats {
    pub fn from_index(index: &CodebaseIndex) -> Self {
        Self {
            files: index.files.len(),
            total_lines: index.total_lines(),
            tokens: index.files.iter().map(|f| f.tokens.len()).sum(),
            functions: index.files.iter().map(|f| f.function_locations.len()).sum(),
            routes: index.route_map.len(),
            components: index.component_map.len(),
            blocks_by_type: index
                .blocks_by_type
                .iter()
                .map(|(block_type, blocks)| (*block_type, blocks.len()))
                .collect(),
        }
    }
}

/// Summary of one indexed file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileStatus {
    pub file: String,
    pub line_count: usize,
    pub token_count: usize,
    pub functions: usize,
    pub routes: usize,
    pub code_blocks: usize,
}

impl FileStatus {
    pub fn from_file(file: &TokenizedFile) -> Self {
        Self {
            file: file.file_path.clone(),
            line_count: file.line_count,
            token_count: file.tokens.len(),
            functions: file.function_locations.len(),
            routes: file.route_definitions.len(),
            code_blocks: file.code_blocks.len(),
        }
    }
}
