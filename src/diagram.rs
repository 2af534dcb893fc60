//! Shields mermaid blocks from the Markdown renderer.
//!
//! Before rendering, each fenced `mermaid` block is cut out and replaced by a
//! placeholder paragraph `XMERMAIDIDX<n>XEND`. The token uses only ASCII
//! letters and digits, so no emphasis, code span or link syntax can alter it.
//! After rendering, every placeholder (bare, or wrapped in `<p>`) is swapped
//! for a `<div class="mermaid">` holding the original diagram source.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error};

use crate::error::DiagramError;

pub const PLACEHOLDER_PREFIX: &str = "XMERMAIDIDX";
pub const PLACEHOLDER_SUFFIX: &str = "XEND";

const DIAGRAM_FENCE: &str = "```mermaid";
const FENCE: &str = "```";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<p>\s*XMERMAIDIDX(\d+)XEND\s*</p>|XMERMAIDIDX(\d+)XEND").unwrap()
});

pub fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}{PLACEHOLDER_SUFFIX}")
}

/// Diagram sources in extraction order; the position is the placeholder index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramBlocks {
    sources: Vec<String>,
}

impl DiagramBlocks {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.sources.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    fn push(&mut self, source: String) -> usize {
        self.sources.push(source);
        self.sources.len() - 1
    }
}

/// Markdown with placeholders in place of diagram blocks, plus the blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub markdown: String,
    pub diagrams: DiagramBlocks,
}

fn is_diagram_open(line: &str) -> bool {
    line.trim_start()
        .strip_prefix(DIAGRAM_FENCE)
        .is_some_and(|rest| rest.trim().is_empty())
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Replace every terminated mermaid block with a placeholder paragraph.
///
/// The block closes at the first following line starting with a fence.
/// Blank lines at either end of the body are dropped; inner lines are kept
/// verbatim. An opening fence with no close is left untouched.
pub fn extract_diagrams(markdown: &str) -> Extraction {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut diagrams = DiagramBlocks::default();

    let mut i = 0;
    while i < lines.len() {
        if is_diagram_open(lines[i]) {
            if let Some(close) = (i + 1..lines.len()).find(|&j| is_fence(lines[j])) {
                let mut body = &lines[i + 1..close];
                while body.first().is_some_and(|l| is_blank(l)) {
                    body = &body[1..];
                }
                while body.last().is_some_and(|l| is_blank(l)) {
                    body = &body[..body.len() - 1];
                }
                let index = diagrams.push(body.join("\n"));
                debug!(index, lines = body.len(), "Extracted diagram block");

                out.push(String::new());
                out.push(placeholder(index));
                out.push(String::new());
                i = close + 1;
                continue;
            }
            debug!(line = i + 1, "Unterminated diagram fence left in place");
        }
        out.push(lines[i].to_string());
        i += 1;
    }

    Extraction {
        markdown: out.join("\n"),
        diagrams,
    }
}

/// Swap placeholders in rendered HTML for diagram containers.
///
/// Fails when a placeholder names an index that was never extracted, or
/// when any extracted block is not restored exactly once.
pub fn restore_diagrams(html: &str, diagrams: &DiagramBlocks) -> Result<String, DiagramError> {
    let mut restored = String::with_capacity(html.len());
    let mut occurrences = vec![0usize; diagrams.len()];
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(digits) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let index = digits.as_str().parse::<usize>().unwrap_or(usize::MAX);
        let Some(source) = diagrams.get(index) else {
            error!(index, "Placeholder without a stored diagram");
            return Err(DiagramError::MissingIndex { index });
        };

        restored.push_str(&html[last..whole.start()]);
        restored.push_str("<div class=\"mermaid\">\n");
        restored.push_str(source);
        restored.push_str("\n</div>");
        occurrences[index] += 1;
        last = whole.end();
    }
    restored.push_str(&html[last..]);

    if let Some((index, &count)) = occurrences.iter().enumerate().find(|&(_, &n)| n != 1) {
        error!(index, occurrences = count, "Diagram not restored exactly once");
        return Err(DiagramError::NotRestored {
            index,
            occurrences: count,
        });
    }

    Ok(restored)
}
