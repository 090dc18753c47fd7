//! # Codemap Indexer
//!
//! Whole-repository structural index for JavaScript/TypeScript projects.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (include/exclude patterns, pruned walk)
//!     │      └─> Source files
//!     │
//!     ├──> File Indexer (codemap-lexer)
//!     │      └─> Tokens, functions, routes, code blocks
//!     │
//!     ├──> Aggregator
//!     │      └─> CodebaseIndex (files, components, routes, blocks by type)
//!     │
//!     └──> Report
//!            ├─> Markdown report
//!            └─> JSON index
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use codemap_indexer::{build_index, render_report, serialize_index};
//! use std::path::Path;
//!
//! fn main() -> codemap_indexer::Result<()> {
//!     let index = build_index("/path/to/project")?;
//!     let report = render_report(&index, Path::new("/path/to/project"));
//!     let json = serialize_index(&index)?;
//!
//!     println!("{} files, {} bytes of JSON", index.files.len(), json.len());
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

mod codebase;
mod config;
mod error;
mod report;
mod scanner;
mod sink;
mod stats;

pub use codebase::{build_index, build_index_with, Aggregator, CodebaseIndex, RouteSummary};
pub use config::{IndexerConfig, DEFAULT_EXCLUDE_PATTERN, DEFAULT_INCLUDE_PATTERN};
pub use error::{IndexerError, Result};
pub use report::{bounded_prefix, deserialize_index, render_report, serialize_index};
pub use scanner::{walk, FileScanner};
pub use sink::{export_records, MemorySink, RecordSink};
pub use stats::{FileStatus, IndexStats};
