//! pulldown-cmark backed [`MarkdownRenderer`].
//!
//! On top of plain CommonMark this renderer enables tables, gives every
//! heading a unique anchor id, and wraps code blocks in
//! `<div class="codehilite">`. Fences tagged with a language syntect knows
//! are highlighted with `hl-` prefixed CSS classes; the page stylesheet
//! supplies the colours.

use std::collections::HashSet;
use std::sync::LazyLock;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

use crate::contract::MarkdownRenderer;
use crate::error::RenderError;

pub const HIGHLIGHT_CLASS_PREFIX: &str = "hl-";
const CODE_WRAPPER_OPEN: &str = "<div class=\"codehilite\">";
const CODE_WRAPPER_CLOSE: &str = "</div>\n";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(|| SyntaxSet::load_defaults_newlines());

#[derive(Debug, Clone)]
pub struct CmarkRenderer {
    options: Options,
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CmarkRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES,
        }
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, self.options).collect();
        let events = decorate(events);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

/// Adds heading ids and replaces code blocks with highlighted HTML.
fn decorate(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut slugs = Slugs::default();
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;

    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::Heading {
                level,
                id: None,
                classes,
                attrs,
            }) => {
                let text = heading_text(&events[i + 1..]);
                out.push(Event::Start(Tag::Heading {
                    level: *level,
                    id: Some(CowStr::from(slugs.unique(&text))),
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
                i += 1;
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let end = events[i + 1..]
                    .iter()
                    .position(|e| matches!(e, Event::End(TagEnd::CodeBlock)))
                    .map_or(events.len() - 1, |p| i + 1 + p);
                let code: String = events[i + 1..end]
                    .iter()
                    .filter_map(|e| match e {
                        Event::Text(t) => Some(&**t),
                        _ => None,
                    })
                    .collect();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
                    CodeBlockKind::Indented => None,
                };

                match language.and_then(|lang| highlight(lang, &code)) {
                    Some(highlighted) => out.push(Event::Html(CowStr::from(highlighted))),
                    None => {
                        out.push(Event::Html(CowStr::Borrowed(CODE_WRAPPER_OPEN)));
                        out.extend(events[i..=end].iter().cloned());
                        out.push(Event::Html(CowStr::Borrowed(CODE_WRAPPER_CLOSE)));
                    }
                }
                i = end + 1;
            }
            other => {
                out.push(other.clone());
                i += 1;
            }
        }
    }

    out
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

fn highlight(language: &str, code: &str) -> Option<String> {
    let syntax = SYNTAX_SET.find_syntax_by_token(language)?;
    let mut generator = ClassedHTMLGenerator::new_with_class_style(
        syntax,
        &SYNTAX_SET,
        ClassStyle::SpacedPrefixed {
            prefix: HIGHLIGHT_CLASS_PREFIX,
        },
    );
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            warn!(language, error = %e, "Highlighting failed, falling back to plain code");
            return None;
        }
    }
    debug!(language, syntax = %syntax.name, "Highlighted code block");

    let class = if is_class_safe(language) {
        format!(" class=\"language-{language}\"")
    } else {
        String::new()
    };
    Some(format!(
        "{CODE_WRAPPER_OPEN}<pre><code{class}>{}</code></pre>{CODE_WRAPPER_CLOSE}",
        generator.finalize()
    ))
}

fn is_class_safe(language: &str) -> bool {
    language
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
}

/// Lowercase ASCII slug: alphanumerics and `_` kept, runs of whitespace and
/// `-` collapsed to a single `-`, everything else dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}

/// Hands out per-document unique heading ids.
#[derive(Debug, Default)]
struct Slugs {
    seen: HashSet<String>,
}

impl Slugs {
    fn unique(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let mut candidate = base.clone();
        let mut n = 1;
        while self.seen.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        self.seen.insert(candidate.clone());
        candidate
    }
}
