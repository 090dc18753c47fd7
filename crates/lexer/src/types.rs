use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A positioned lexical unit taken from one line of source text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Raw token text (a word, one punctuation char, a whitespace run or `\n`)
    pub value: String,

    /// Source file path
    pub file: String,

    /// Line number (1-indexed)
    pub line_number: usize,

    /// First column, counted in chars (0-indexed)
    pub column_start: usize,

    /// Column one past the last char
    pub column_end: usize,

    /// The owning line with surrounding whitespace trimmed
    pub context: String,
}

impl Token {
    /// Check whether this is the synthetic end-of-line token
    #[must_use]
    pub fn is_newline(&self) -> bool {
        self.value == "\n"
    }

    /// Token width in chars
    #[must_use]
    pub const fn width(&self) -> usize {
        self.column_end - self.column_start
    }
}

/// Location of a detected function declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionLocation {
    pub name: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Raw parameter text, empty for arrow functions
    #[serde(default)]
    pub signature: String,
}

/// HTTP method of a route registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Delete, Self::Patch];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
        }
    }

    #[must_use]
    pub const fn as_upper(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown HTTP method: {s}"))
    }
}

/// Handler name recorded for every route; the callback identifier is not resolved.
pub const ROUTE_HANDLER_NAME: &str = "handler";

/// An HTTP route registration found in source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteDefinition {
    pub path: String,
    pub method: HttpMethod,
    pub handler_name: String,

    /// Line of the registration call (1-indexed)
    pub line_number: usize,
}

/// Kind of structural region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Function,
    Route,
    Import,
    Class,
    Interface,
    Middleware,
}

impl BlockType {
    /// Every block type, in detection order
    pub const ALL: [Self; 6] = [
        Self::Function,
        Self::Route,
        Self::Import,
        Self::Class,
        Self::Interface,
        Self::Middleware,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Route => "route",
            Self::Import => "import",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Middleware => "middleware",
        }
    }

    /// Whether the region extends to a matching closing brace
    #[must_use]
    pub const fn spans_braces(self) -> bool {
        !matches!(self, Self::Import | Self::Middleware)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed, line-ranged span of source text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,

    pub name: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Verbatim source lines `start_line..=end_line` joined with `\n`
    pub content: String,

    pub file: String,

    /// Route path (route blocks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Route method (route blocks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
}

impl CodeBlock {
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Everything extracted from one scanned file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizedFile {
    pub file_path: String,
    pub tokens: Vec<Token>,
    pub line_count: usize,
    pub function_locations: Vec<FunctionLocation>,
    pub route_definitions: Vec<RouteDefinition>,
    pub code_blocks: Vec<CodeBlock>,
}

impl TokenizedFile {
    /// Source lines rebuilt from the token stream, without line terminators
    #[must_use]
    pub fn line_texts(&self) -> Vec<String> {
        let mut lines = vec![String::new(); self.line_count];
        for token in self.tokens.iter().filter(|t| !t.is_newline()) {
            if let Some(line) = token
                .line_number
                .checked_sub(1)
                .and_then(|idx| lines.get_mut(idx))
            {
                line.push_str(&token.value);
            }
        }
        lines
    }

    /// The original file text
    #[must_use]
    pub fn source_text(&self) -> String {
        crate::tokenizer::detokenize(&self.tokens)
    }

    pub fn blocks_of(&self, block_type: BlockType) -> impl Iterator<Item = &CodeBlock> {
        self.code_blocks
            .iter()
            .filter(move |block| block.block_type == block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start_line: usize, end_line: usize) -> CodeBlock {
        CodeBlock {
            block_type: BlockType::Class,
            name: "Foo".to_string(),
            start_line,
            end_line,
            content: String::new(),
            file: "foo.ts".to_string(),
            path: None,
            method: None,
        }
    }

    #[test]
    fn block_line_count() {
        assert_eq!(block(10, 15).line_count(), 6);
        assert_eq!(block(4, 4).line_count(), 1);
    }

    #[test]
    fn block_contains_line() {
        let block = block(10, 15);
        assert!(block.contains_line(10));
        assert!(block.contains_line(15));
        assert!(!block.contains_line(9));
        assert!(!block.contains_line(16));
    }

    #[test]
    fn http_method_parse() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("PATCH".parse::<HttpMethod>(), Ok(HttpMethod::Patch));
        assert!("options".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Delete.as_upper(), "DELETE");
    }

    #[test]
    fn only_imports_and_middleware_are_single_line() {
        let single: Vec<_> = BlockType::ALL
            .into_iter()
            .filter(|t| !t.spans_braces())
            .collect();
        assert_eq!(single, vec![BlockType::Import, BlockType::Middleware]);
    }

    #[test]
    fn route_block_serializes_type_tag() {
        let mut route = block(1, 1);
        route.block_type = BlockType::Route;
        route.method = Some(HttpMethod::Get);
        route.path = Some("/users".to_string());

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["type"], "route");
        assert_eq!(json["method"], "get");

        let plain = serde_json::to_value(block(1, 1)).unwrap();
        assert!(plain.get("path").is_none());
    }
}
