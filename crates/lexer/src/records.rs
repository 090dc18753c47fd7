use crate::types::{BlockType, TokenizedFile};
use serde::{Deserialize, Serialize};

/// Kind of an addressable record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Token,
    Block,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Block => "block",
        }
    }
}

/// A token or block exposed to downstream stores under a stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// `<file_path>-token-<i>` or `<file_path>-block-<i>`
    pub id: String,
    pub file_path: String,
    pub kind: RecordKind,
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<BlockType>,
}

#[must_use]
pub fn record_id(file_path: &str, kind: RecordKind, index: usize) -> String {
    format!("{file_path}-{}-{index}", kind.as_str())
}

impl TokenizedFile {
    /// Every token followed by every code block, each with its record id
    pub fn records(&self) -> impl Iterator<Item = IndexRecord> + '_ {
        let tokens = self.tokens.iter().enumerate().map(|(i, token)| IndexRecord {
            id: record_id(&self.file_path, RecordKind::Token, i),
            file_path: self.file_path.clone(),
            kind: RecordKind::Token,
            text: token.value.clone(),
            start_line: token.line_number,
            end_line: token.line_number,
            block_type: None,
        });
        let blocks = self.code_blocks.iter().enumerate().map(|(i, block)| IndexRecord {
            id: record_id(&self.file_path, RecordKind::Block, i),
            file_path: self.file_path.clone(),
            kind: RecordKind::Block,
            text: block.content.clone(),
            start_line: block.start_line,
            end_line: block.end_line,
            block_type: Some(block.block_type),
        });
        tokens.chain(blocks)
    }
}
