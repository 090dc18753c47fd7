use crate::codebase::CodebaseIndex;
use crate::error::Result;
use codemap_lexer::BlockType;
use std::fmt::Write as _;
use std::path::Path;

/// Block types that get a listing section, in report order
const LISTED_BLOCK_TYPES: [BlockType; 5] = [
    BlockType::Route,
    BlockType::Function,
    BlockType::Class,
    BlockType::Interface,
    BlockType::Middleware,
];

/// Render the human-readable codebase report.
///
/// Paths below `base` are printed relative to it.
pub fn render_report(index: &CodebaseIndex, base: &Path) -> String {
    let mut md = String::new();
    md.push_str("# Codebase Structure\n\n");

    md.push_str("## Files\n\n");
    for file in &index.files {
        let _ = writeln!(
            md,
            "- {} ({} lines)",
            display_path(base, &file.file_path),
            file.line_count
        );
    }

    md.push_str("\n## Routes\n\n");
    for (route_path, route) in &index.route_map {
        let _ = writeln!(
            md,
            "- {} {} - Defined in {}:{}",
            route.method.as_upper(),
            route_path,
            display_path(base, &route.file),
            route.line
        );
    }

    md.push_str("\n## Functions\n\n");
    for file in &index.files {
        let path = display_path(base, &file.file_path);
        for func in &file.function_locations {
            let _ = writeln!(
                md,
                "- {} - {}:{}-{}",
                func.name, path, func.start_line, func.end_line
            );
        }
    }

    if !index.component_map.is_empty() {
        md.push_str("\n## Components\n\n");
        for (name, file_path) in &index.component_map {
            let _ = writeln!(md, "- {} - {}", name, display_path(base, file_path));
        }
    }

    for block_type in LISTED_BLOCK_TYPES {
        let blocks = index.blocks(block_type);
        if blocks.is_empty() {
            continue;
        }

        let _ = write!(md, "\n## {}\n\n", section_title(block_type));
        for block in blocks {
            let _ = writeln!(
                md,
                "- {} - {}:{}-{}",
                block.name,
                display_path(base, &block.file),
                block.start_line,
                block.end_line
            );
            if let (Some(method), Some(path)) = (block.method, block.path.as_deref()) {
                let _ = writeln!(md, "  - Method: {}, Path: {}", method.as_upper(), path);
            }
        }
    }

    md.push_str("\n## File Contents\n\n");
    for file in &index.files {
        let _ = write!(md, "### {}\n\n", display_path(base, &file.file_path));
        md.push_str("```\n");
        for (idx, line) in file.line_texts().iter().enumerate() {
            let _ = writeln!(md, "{}: {}", idx + 1, line);
        }
        md.push_str("```\n\n");
    }

    md.push_str("\n## Code Blocks\n\n");
    for file in &index.files {
        let path = display_path(base, &file.file_path);
        for block in &file.code_blocks {
            let _ = write!(
                md,
                "### {}: {} ({}:{}-{})\n\n",
                block.block_type, block.name, path, block.start_line, block.end_line
            );
            md.push_str("```typescript\n");
            md.push_str(&block.content);
            md.push_str("\n```\n\n");
        }
    }

    md
}

/// Serialize the index as pretty JSON
pub fn serialize_index(index: &CodebaseIndex) -> Result<String> {
    Ok(serde_json::to_string_pretty(index)?)
}

/// Parse an index previously written by [`serialize_index`]
pub fn deserialize_index(raw: &str) -> Result<CodebaseIndex> {
    let mut index: CodebaseIndex = serde_json::from_str(raw)?;
    index.ensure_buckets();
    Ok(index)
}

/// Leading part of `report` holding at most `max_chars` chars
pub fn bounded_prefix(report: &str, max_chars: usize) -> &str {
    match report.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &report[..byte_idx],
        None => report,
    }
}

fn section_title(block_type: BlockType) -> &'static str {
    match block_type {
        BlockType::Function => "Functions",
        BlockType::Route => "Routes",
        BlockType::Import => "Imports",
        BlockType::Class => "Classes",
        BlockType::Interface => "Interfaces",
        BlockType::Middleware => "Middlewares",
    }
}

fn display_path(base: &Path, file: &str) -> String {
    Path::new(file)
        .strip_prefix(base)
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_else(|_| file.to_string())
}
