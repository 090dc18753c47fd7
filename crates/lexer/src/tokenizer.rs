use crate::types::Token;

/// Characters that always form a token of their own
pub const PUNCTUATION: &[char] = &[
    ';', ':', ',', '.', '(', ')', '{', '}', '[', ']', '<', '>', '+', '=', '-', '*', '/', '%',
    '&', '|', '^', '!', '~', '?',
];

const NEWLINE: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Punct,
    Word,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if PUNCTUATION.contains(&c) {
        CharClass::Punct
    } else {
        CharClass::Word
    }
}

/// Split file text into lines on `\n`, keeping a trailing empty line
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Tokenize a whole file
#[must_use]
pub fn tokenize(file_path: &str, text: &str) -> Vec<Token> {
    tokenize_lines(file_path, &split_lines(text))
}

/// Tokenize pre-split lines; every line ends with one synthetic newline token
#[must_use]
pub fn tokenize_lines(file_path: &str, lines: &[&str]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        tokenize_line_into(&mut tokens, file_path, idx + 1, line);
    }
    tokens
}

/// Tokenize a single line (1-indexed `line_number`)
#[must_use]
pub fn tokenize_line(file_path: &str, line_number: usize, line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    tokenize_line_into(&mut tokens, file_path, line_number, line);
    tokens
}

fn tokenize_line_into(tokens: &mut Vec<Token>, file_path: &str, line_number: usize, line: &str) {
    let context = line.trim();
    let mut column = 0;
    let mut chars = line.char_indices().peekable();

    let mut push = |value: &str, column_start: usize, column_end: usize| {
        tokens.push(Token {
            value: value.to_string(),
            file: file_path.to_string(),
            line_number,
            column_start,
            column_end,
            context: context.to_string(),
        });
    };

    while let Some((start, c)) = chars.next() {
        let class = classify(c);
        let mut end = start + c.len_utf8();
        let mut width = 1;

        // Punctuation never merges with its neighbours
        if class != CharClass::Punct {
            while let Some(&(idx, next)) = chars.peek() {
                if classify(next) != class {
                    break;
                }
                end = idx + next.len_utf8();
                width += 1;
                chars.next();
            }
        }

        push(&line[start..end], column, column + width);
        column += width;
    }

    push(NEWLINE, column, column + 1);
}

/// Rebuild the original text from a token stream.
///
/// Every line contributes a newline token, including the last one, so the
/// final token is dropped to get the text back byte for byte.
#[must_use]
pub fn detokenize(tokens: &[Token]) -> String {
    let mut text: String = tokens.iter().map(|t| t.value.as_str()).collect();
    if tokens.last().is_some_and(Token::is_newline) {
        text.pop();
    }
    text
}
