//! Brace-depth block boundaries.
//!
//! Braces are counted lexically: string literals, template interpolation and
//! comments are not special-cased.

/// Find the line on which the first brace block opened at or after `start`
/// closes again.
///
/// Closing braces seen before the first opening brace are ignored. Returns
/// `None` when there is no opening brace or the block never closes.
#[must_use]
pub fn find_block_end(lines: &[&str], start: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut opened = false;

    for (idx, line) in lines.iter().enumerate().skip(start) {
        for c in line.chars() {
            match c {
                '{' => {
                    opened = true;
                    depth += 1;
                }
                '}' if opened => depth -= 1,
                _ => continue,
            }

            if opened && depth == 0 {
                return Some(idx);
            }
        }
    }

    None
}

/// Like [`find_block_end`], falling back to `start` for unresolved blocks
#[must_use]
pub fn resolve_block_end(lines: &[&str], start: usize) -> usize {
    find_block_end(lines, start).unwrap_or(start)
}

/// Join `lines[start..=end]` with `\n`
#[must_use]
pub fn block_content(lines: &[&str], start: usize, end: usize) -> String {
    let end = end.min(lines.len().saturating_sub(1));
    lines
        .get(start..=end)
        .map(|span| span.join("\n"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_multi_line_block() {
        let lines = ["function add(a, b) {", "  return a + b;", "}", "add(1, 2);"];
        assert_eq!(find_block_end(&lines, 0), Some(2));
    }

    #[test]
    fn same_line_block() {
        let lines = ["function noop() {}", "noop();"];
        assert_eq!(find_block_end(&lines, 0), Some(0));
    }

    #[test]
    fn opening_brace_on_later_line() {
        let lines = ["class Foo", "{", "  bar() { return 1; }", "}"];
        assert_eq!(find_block_end(&lines, 0), Some(3));
    }

    #[test]
    fn nested_blocks_close_at_outer_brace() {
        let lines = [
            "class A {",
            "  m() {",
            "    if (x) { y(); }",
            "  }",
            "}",
        ];
        assert_eq!(find_block_end(&lines, 0), Some(4));
        assert_eq!(find_block_end(&lines, 1), Some(3));
    }

    #[test]
    fn unterminated_block_is_degenerate() {
        let lines = ["class Foo {", "  bar() {}"];
        assert_eq!(find_block_end(&lines, 0), None);
        assert_eq!(resolve_block_end(&lines, 0), 0);
    }

    #[test]
    fn no_brace_at_all_is_degenerate() {
        let lines = ["app.get('/users', handler)", "const x = 1;"];
        assert_eq!(resolve_block_end(&lines, 0), 0);
    }

    #[test]
    fn leading_close_brace_is_ignored() {
        let lines = ["} else {", "  run();", "}"];
        assert_eq!(find_block_end(&lines, 0), Some(2));
    }

    #[test]
    fn start_past_end_is_returned_unchanged() {
        let lines = ["{", "}"];
        assert_eq!(resolve_block_end(&lines, 5), 5);
    }

    #[test]
    fn content_spans_inclusive_range() {
        let lines = ["a {", "b", "}", "c"];
        assert_eq!(block_content(&lines, 0, 2), "a {\nb\n}");
        assert_eq!(block_content(&lines, 3, 3), "c");
        assert_eq!(block_content(&lines, 2, 10), "}\nc");
    }
}
