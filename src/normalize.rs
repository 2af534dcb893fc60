//! Pulls indented fenced code blocks flush left.
//!
//! A fence nested under a list item is otherwise rendered as part of the
//! item, which breaks highlighting. Every line whose trimmed start is a
//! triple backtick toggles the fence state; fence lines are emitted without
//! indentation and lines inside a block lose the opening fence's indentation
//! width when they have at least that much leading whitespace.
//!
//! An unterminated fence keeps the rest of the document inside the block.

const FENCE: &str = "```";

pub fn normalize_code_blocks(markdown: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fence_indent: Option<usize> = None;

    for line in markdown.split('\n') {
        let stripped = line.trim_start();
        if stripped.starts_with(FENCE) {
            fence_indent = match fence_indent {
                None => Some(line.chars().count() - stripped.chars().count()),
                Some(_) => None,
            };
            out.push(stripped);
        } else if let Some(indent) = fence_indent {
            out.push(strip_indent(line, indent));
        } else {
            out.push(line);
        }
    }

    out.join("\n")
}

/// Drops the first `width` characters when all of them are whitespace.
fn strip_indent(line: &str, width: usize) -> &str {
    if width == 0 {
        return line;
    }
    let mut chars = line.char_indices();
    for _ in 0..width {
        match chars.next() {
            Some((_, c)) if c.is_whitespace() => {}
            _ => return line,
        }
    }
    match chars.next() {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}
