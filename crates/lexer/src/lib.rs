//! # Codemap Lexer
//!
//! Best-effort lexical scanning of JavaScript/TypeScript sources.
//!
//! ## Philosophy
//!
//! The lexer is deliberately not a parser. It works line by line:
//! - Tokens are positioned words, punctuation chars and whitespace runs
//! - Structures (functions, routes, imports, classes, interfaces,
//!   middleware) are recognised by line-local patterns
//! - Block extents come from raw brace counting
//!
//! Braces inside strings, template literals or comments can therefore shift
//! block boundaries. A block whose closing brace is never found ends on its
//! start line.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> split_lines (one shared line array)
//!     │
//!     ├──> Tokenizer → Token[] (+ one `\n` token per line)
//!     │
//!     └──> StructureDetector (per line)
//!          ├─> Candidate[]
//!          ├─> Block boundary resolution (brace depth)
//!          └─> CodeBlock[], FunctionLocation[], RouteDefinition[]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codemap_lexer::FileIndexer;
//!
//! let code = "function add(a, b) {\n  return a + b;\n}";
//! let file = FileIndexer::new().index_source("math.js", code);
//!
//! let add = &file.function_locations[0];
//! assert_eq!((add.start_line, add.end_line), (1, 3));
//! assert_eq!(file.source_text(), code);
//! ```

mod block;
mod detector;
mod error;
mod indexer;
mod records;
mod tokenizer;
mod types;

pub use block::{block_content, find_block_end, resolve_block_end};
pub use detector::{detect_structures, Candidate, Detection, PatternDetector, StructureDetector};
pub use error::{LexerError, Result};
pub use indexer::{index_file, FileIndexer};
pub use records::{record_id, IndexRecord, RecordKind};
pub use tokenizer::{detokenize, split_lines, tokenize, tokenize_line, tokenize_lines, PUNCTUATION};
pub use types::{
    BlockType, CodeBlock, FunctionLocation, HttpMethod, RouteDefinition, Token, TokenizedFile,
    ROUTE_HANDLER_NAME,
};
