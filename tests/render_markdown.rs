use md_portal::contract::MarkdownRenderer;
use md_portal::render::{slugify, CmarkRenderer};

fn render(markdown: &str) -> String {
    CmarkRenderer::new().render(markdown).expect("render")
}

#[test]
fn test_tables_are_rendered() {
    let html = render("| Name | Value |\n|------|-------|\n| a    | 1     |\n");

    assert!(html.contains("<table>"), "{html}");
    assert!(html.contains("<th>Name</th>"), "{html}");
    assert!(html.contains("<td>1</td>"), "{html}");
}

#[test]
fn test_headings_get_unique_anchor_ids() {
    let html = render("# Intro\n\n## Setup Steps\n\ntext\n\n## Setup Steps\n\n### `cargo` & *friends*\n");

    assert!(html.contains("<h1 id=\"intro\">Intro</h1>"), "{html}");
    assert!(html.contains("<h2 id=\"setup-steps\">"), "{html}");
    assert!(html.contains("<h2 id=\"setup-steps_1\">"), "{html}");
    assert!(html.contains("<h3 id=\"cargo-friends\">"), "{html}");
}

#[test]
fn test_heading_without_slug_characters_falls_back_to_section() {
    let html = render("## ???\n\n## !!!\n");

    assert!(html.contains("<h2 id=\"section\">"), "{html}");
    assert!(html.contains("<h2 id=\"section_1\">"), "{html}");
}

#[test]
fn test_known_language_is_highlighted_with_classes_not_inline_styles() {
    let html = render("```rust\nfn main() {\n    let x = \"hi\";\n}\n```\n");

    assert!(
        html.contains("<div class=\"codehilite\"><pre><code class=\"language-rust\">"),
        "{html}"
    );
    assert!(html.contains("<span class=\"hl-"), "{html}");
    assert!(!html.contains("style="), "{html}");
    assert!(html.contains("</code></pre></div>"), "{html}");
}

#[test]
fn test_unknown_language_falls_back_to_escaped_plain_code() {
    let html = render("```nosuchlang\nx < y && z\n```\n");

    assert!(html.contains("<div class=\"codehilite\">"), "{html}");
    assert!(
        html.contains("<pre><code class=\"language-nosuchlang\">x &lt; y &amp;&amp; z"),
        "{html}"
    );
    assert!(!html.contains("hl-"), "{html}");
}

#[test]
fn test_fence_without_language_is_wrapped_plain() {
    let html = render("```\nplain text\n```\n");

    assert!(html.contains("<div class=\"codehilite\">"), "{html}");
    assert!(html.contains("<pre><code>plain text"), "{html}");
}

#[test]
fn test_placeholder_token_passes_through_untouched() {
    let html = render("before\n\nXMERMAIDIDX3XEND\n\nafter");
    assert!(html.contains("<p>XMERMAIDIDX3XEND</p>"), "{html}");
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    assert_eq!(slugify("snake_case-name"), "snake_case-name");
    assert_eq!(slugify("a -- b"), "a-b");
    assert_eq!(slugify("Übersicht 2"), "bersicht-2");
}

#[test]
fn test_heading_anchor_keeps_underscores() {
    let html = render("## config_file option\n\n## `load_config`\n");

    assert!(html.contains("<h2 id=\"config_file-option\">"), "{html}");
    assert!(html.contains("<h2 id=\"load_config\">"), "{html}");
}
