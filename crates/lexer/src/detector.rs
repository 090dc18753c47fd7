//! Line-local structural pattern detection.
//!
//! Matching is regex based and knows nothing about strings, comments or
//! nesting. A single line may yield several candidates.

use crate::block::{block_content, find_block_end};
use crate::types::{
    BlockType, CodeBlock, FunctionLocation, HttpMethod, RouteDefinition, ROUTE_HANDLER_NAME,
};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"function\s+([A-Za-z0-9_]+)\s*\(([^)]*)\)|const\s+([A-Za-z0-9_]+)\s*=\s*(?:async\s*)?\([^)]*\)\s*=>",
    )
    .expect("function pattern")
});
static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"app\.(get|post|put|delete|patch)\s*\(\s*['"]([^'"]+)['"]"#)
        .expect("route pattern")
});
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+.+\s+from\s+['"](.+)['"]"#).expect("import pattern")
});
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+([A-Za-z0-9_]+)").expect("class pattern"));
static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"interface\s+([A-Za-z0-9_]+)").expect("interface pattern"));
static MIDDLEWARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"app\.use\(([^)]+)\)").expect("middleware pattern"));

/// A construct recognised on a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Function { name: String, signature: String },
    Route { method: HttpMethod, path: String },
    Import { module: String },
    Class { name: String },
    Interface { name: String },
    Middleware { args: String },
}

impl Candidate {
    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        match self {
            Self::Function { .. } => BlockType::Function,
            Self::Route { .. } => BlockType::Route,
            Self::Import { .. } => BlockType::Import,
            Self::Class { .. } => BlockType::Class,
            Self::Interface { .. } => BlockType::Interface,
            Self::Middleware { .. } => BlockType::Middleware,
        }
    }

    /// Block name as shown in listings
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Function { name, .. } | Self::Class { name } | Self::Interface { name } => {
                name.clone()
            }
            Self::Route { method, path } => format!("{method} {path}"),
            Self::Import { module } => module.clone(),
            Self::Middleware { args } => args.clone(),
        }
    }
}

/// Seam between the indexer and whatever recognises structure in a line
pub trait StructureDetector {
    /// All candidates on `line`, grouped by kind in a fixed order
    fn detect(&self, line: &str) -> Vec<Candidate>;
}

/// The built-in regex matcher set for JavaScript/TypeScript sources
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDetector;

impl PatternDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StructureDetector for PatternDetector {
    fn detect(&self, line: &str) -> Vec<Candidate> {
        let mut found = Vec::new();

        for caps in FUNCTION_RE.captures_iter(line) {
            let Some(name) = caps.get(1).or_else(|| caps.get(3)) else {
                continue;
            };
            found.push(Candidate::Function {
                name: name.as_str().to_string(),
                signature: caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            });
        }

        for caps in ROUTE_RE.captures_iter(line) {
            let Ok(method) = caps[1].parse::<HttpMethod>() else {
                continue;
            };
            found.push(Candidate::Route {
                method,
                path: caps[2].to_string(),
            });
        }

        found.extend(IMPORT_RE.captures_iter(line).map(|caps| Candidate::Import {
            module: caps[1].to_string(),
        }));
        found.extend(CLASS_RE.captures_iter(line).map(|caps| Candidate::Class {
            name: caps[1].to_string(),
        }));
        found.extend(
            INTERFACE_RE
                .captures_iter(line)
                .map(|caps| Candidate::Interface {
                    name: caps[1].to_string(),
                }),
        );
        found.extend(
            MIDDLEWARE_RE
                .captures_iter(line)
                .map(|caps| Candidate::Middleware {
                    args: caps[1].trim().to_string(),
                }),
        );

        found
    }
}

/// Structures found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub function_locations: Vec<FunctionLocation>,
    pub route_definitions: Vec<RouteDefinition>,
    pub code_blocks: Vec<CodeBlock>,
}

/// Run `detector` over every line and resolve block extents against `lines`
pub fn detect_structures<D: StructureDetector + ?Sized>(
    detector: &D,
    file_path: &str,
    lines: &[&str],
) -> Detection {
    let mut detection = Detection::default();

    for (idx, line) in lines.iter().enumerate() {
        for candidate in detector.detect(line) {
            let block_type = candidate.block_type();
            let (end_idx, content) = if block_type.spans_braces() {
                let end_idx = find_block_end(lines, idx).unwrap_or_else(|| {
                    log::debug!(
                        "Unresolved {} block at {}:{}",
                        block_type,
                        file_path,
                        idx + 1
                    );
                    idx
                });
                (end_idx, block_content(lines, idx, end_idx))
            } else {
                (idx, (*line).to_string())
            };

            let start_line = idx + 1;
            let end_line = end_idx + 1;
            let mut block = CodeBlock {
                block_type,
                name: candidate.name(),
                start_line,
                end_line,
                content,
                file: file_path.to_string(),
                path: None,
                method: None,
            };

            match candidate {
                Candidate::Function { name, signature } => {
                    detection.function_locations.push(FunctionLocation {
                        name,
                        start_line,
                        end_line,
                        signature,
                    });
                }
                Candidate::Route { method, path } => {
                    detection.route_definitions.push(RouteDefinition {
                        path: path.clone(),
                        method,
                        handler_name: ROUTE_HANDLER_NAME.to_string(),
                        line_number: start_line,
                    });
                    block.path = Some(path);
                    block.method = Some(method);
                }
                _ => {}
            }

            detection.code_blocks.push(block);
        }
    }

    detection
}
