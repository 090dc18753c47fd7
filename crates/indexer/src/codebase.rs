use crate::config::IndexerConfig;
use crate::error::Result;
use crate::scanner::FileScanner;
use codemap_lexer::{
    BlockType, CodeBlock, FileIndexer, HttpMethod, PatternDetector, StructureDetector,
    TokenizedFile,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Route table entry; the last registration of a path wins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub method: HttpMethod,
    pub path: String,
    pub handler: String,
    pub file: String,
    pub line: usize,
}

/// Whole-repository merge of every indexed file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodebaseIndex {
    /// Files in scan order
    pub files: Vec<TokenizedFile>,

    /// Component name (file stem) -> file path
    pub component_map: BTreeMap<String, String>,

    /// Route path -> route summary
    pub route_map: BTreeMap<String, RouteSummary>,

    /// Every block grouped by type; all types are always present
    pub blocks_by_type: BTreeMap<BlockType, Vec<CodeBlock>>,
}

impl Default for CodebaseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CodebaseIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            component_map: BTreeMap::new(),
            route_map: BTreeMap::new(),
            blocks_by_type: BlockType::ALL.into_iter().map(|t| (t, Vec::new())).collect(),
        }
    }

    /// Merge one file into the index
    pub fn add_file(&mut self, file: TokenizedFile, config: &IndexerConfig) {
        let path = Path::new(&file.file_path);
        if config.is_component(path) {
            if let Some(stem) = path.file_stem() {
                self.component_map
                    .insert(stem.to_string_lossy().into_owned(), file.file_path.clone());
            }
        }

        for route in &file.route_definitions {
            self.route_map.insert(
                route.path.clone(),
                RouteSummary {
                    method: route.method,
                    path: route.path.clone(),
                    handler: route.handler_name.clone(),
                    file: file.file_path.clone(),
                    line: route.line_number,
                },
            );
        }

        for block in &file.code_blocks {
            self.blocks_by_type
                .entry(block.block_type)
                .or_default()
                .push(block.clone());
        }

        self.files.push(file);
    }

    pub fn blocks(&self, block_type: BlockType) -> &[CodeBlock] {
        self.blocks_by_type
            .get(&block_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up a file by its indexed path, or by a path suffix such as `src/index.ts`
    pub fn file(&self, path: &str) -> Option<&TokenizedFile> {
        self.files
            .iter()
            .find(|f| f.file_path == path)
            .or_else(|| self.files.iter().find(|f| Path::new(&f.file_path).ends_with(path)))
    }

    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.line_count).sum()
    }

    /// Restore the six type buckets after deserializing a partial document
    pub(crate) fn ensure_buckets(&mut self) {
        for block_type in BlockType::ALL {
            self.blocks_by_type.entry(block_type).or_default();
        }
    }
}

/// Runs the file indexer over scanned paths and merges the results
pub struct Aggregator<D = PatternDetector> {
    config: IndexerConfig,
    file_indexer: FileIndexer<D>,
}

impl Aggregator {
    pub fn new(config: IndexerConfig) -> Self {
        Self::with_file_indexer(config, FileIndexer::new())
    }
}

impl<D: StructureDetector> Aggregator<D> {
    /// Aggregate with a file indexer built around another detector
    pub fn with_file_indexer(config: IndexerConfig, file_indexer: FileIndexer<D>) -> Self {
        Self {
            config,
            file_indexer,
        }
    }

    /// Index `paths` in order; the first unreadable file aborts the run
    pub fn aggregate(&self, paths: &[PathBuf]) -> Result<CodebaseIndex> {
        let mut index = CodebaseIndex::new();
        for path in paths {
            let file = self.file_indexer.index_file(path)?;
            index.add_file(file, &self.config);
        }
        Ok(index)
    }

    /// Scan `root` and index everything found
    pub fn index_root(&self, root: impl AsRef<Path>) -> Result<CodebaseIndex> {
        let root = root.as_ref();
        log::info!("Indexing codebase at {}", root.display());

        let paths = FileScanner::new(root, &self.config)?.scan()?;
        let index = self.aggregate(&paths)?;

        log::info!(
            "Indexed {} files: {} routes, {} components, {} blocks",
            index.files.len(),
            index.route_map.len(),
            index.component_map.len(),
            index.blocks_by_type.values().map(Vec::len).sum::<usize>()
        );
        Ok(index)
    }
}

/// Build an index of `root` with the default configuration
pub fn build_index(root: impl AsRef<Path>) -> Result<CodebaseIndex> {
    build_index_with(root, &IndexerConfig::default())
}

/// Build an index of `root` with an explicit configuration
pub fn build_index_with(root: impl AsRef<Path>, config: &IndexerConfig) -> Result<CodebaseIndex> {
    config
        .validate()
        .map_err(crate::error::IndexerError::invalid_config)?;
    Aggregator::new(config.clone()).index_root(root)
}
