use md_portal::convert::convert_markdown;
use md_portal::diagram::{extract_diagrams, placeholder, restore_diagrams, DiagramBlocks};
use md_portal::error::DiagramError;
use md_portal::render::CmarkRenderer;
use std::path::Path;

const TWO_DIAGRAMS: &str = "# Flow\n\n```mermaid\ngraph TD\n  A-->B\n```\n\nbetween\n\n```mermaid\nsequenceDiagram\n```\n";

#[test]
fn test_extracts_blocks_in_document_order_with_sequential_placeholders() {
    let extraction = extract_diagrams(TWO_DIAGRAMS);

    assert_eq!(extraction.diagrams.len(), 2);
    assert_eq!(extraction.diagrams.get(0), Some("graph TD\n  A-->B"));
    assert_eq!(extraction.diagrams.get(1), Some("sequenceDiagram"));

    let first = extraction.markdown.find(&placeholder(0)).expect("placeholder 0");
    let second = extraction.markdown.find(&placeholder(1)).expect("placeholder 1");
    assert!(first < second);
    assert!(!extraction.markdown.contains("```mermaid"));
    assert!(extraction.markdown.contains("between"));
}

#[test]
fn test_placeholder_sits_in_its_own_paragraph() {
    let extraction = extract_diagrams("text before\n```mermaid\ngraph LR\n```\ntext after");
    assert_eq!(
        extraction.markdown,
        "text before\n\nXMERMAIDIDX0XEND\n\ntext after"
    );
}

#[test]
fn test_blank_edge_lines_are_dropped_but_inner_indentation_kept() {
    let extraction = extract_diagrams("```mermaid   \n\n    graph LR\n\n      A --> B\n   \n```");
    assert_eq!(extraction.diagrams.get(0), Some("    graph LR\n\n      A --> B"));
}

#[test]
fn test_unterminated_diagram_fence_is_left_in_place() {
    let input = "intro\n```mermaid\ngraph TD\n  A-->B";
    let extraction = extract_diagrams(input);

    assert!(extraction.diagrams.is_empty());
    assert_eq!(extraction.markdown, input);
}

#[test]
fn test_fence_with_other_language_is_not_a_diagram() {
    let input = "```mermaidish\ngraph\n```\n```rust\nfn x() {}\n```";
    let extraction = extract_diagrams(input);

    assert!(extraction.diagrams.is_empty());
    assert_eq!(extraction.markdown, input);
}

#[test]
fn test_placeholder_alphabet_has_no_inline_markdown_characters() {
    for index in [0usize, 7, 42, 1234] {
        let token = placeholder(index);
        assert!(token.starts_with("XMERMAIDIDX") && token.ends_with("XEND"));
        assert!(
            token.chars().all(|c| c.is_ascii_alphanumeric()),
            "token {token} must be plain alphanumerics"
        );
    }
}

#[test]
fn test_restores_wrapped_and_bare_placeholders() {
    let extraction = extract_diagrams(TWO_DIAGRAMS);
    let html = "<h1>Flow</h1>\n<p>XMERMAIDIDX0XEND</p>\n<ul><li>XMERMAIDIDX1XEND</li></ul>\n";

    let restored = restore_diagrams(html, &extraction.diagrams).expect("restore");

    assert_eq!(
        restored,
        "<h1>Flow</h1>\n<div class=\"mermaid\">\ngraph TD\n  A-->B\n</div>\n<ul><li><div class=\"mermaid\">\nsequenceDiagram\n</div></li></ul>\n"
    );
}

#[test]
fn test_restore_tolerates_whitespace_inside_paragraph() {
    let extraction = extract_diagrams("```mermaid\npie\n```");
    let restored =
        restore_diagrams("<p>\n  XMERMAIDIDX0XEND \n</p>", &extraction.diagrams).expect("restore");
    assert_eq!(restored, "<div class=\"mermaid\">\npie\n</div>");
}

#[test]
fn test_unknown_index_is_an_error() {
    let err = restore_diagrams("<p>XMERMAIDIDX5XEND</p>", &DiagramBlocks::default()).unwrap_err();
    assert_eq!(err, DiagramError::MissingIndex { index: 5 });
}

#[test]
fn test_each_diagram_must_be_restored_exactly_once() {
    let extraction = extract_diagrams("```mermaid\npie\n```");

    let missing = restore_diagrams("<p>nothing here</p>", &extraction.diagrams).unwrap_err();
    assert_eq!(
        missing,
        DiagramError::NotRestored {
            index: 0,
            occurrences: 0
        }
    );

    let doubled =
        restore_diagrams("XMERMAIDIDX0XEND XMERMAIDIDX0XEND", &extraction.diagrams).unwrap_err();
    assert_eq!(
        doubled,
        DiagramError::NotRestored {
            index: 0,
            occurrences: 2
        }
    );
}

#[test]
fn test_full_round_trip_leaves_no_placeholders_and_keeps_source_bytes() {
    let diagram_a = "graph TD\n  A[__init__] --> B[*star*]\n  B --> C[`tick`]";
    let diagram_b = "sequenceDiagram\n  Alice->>Bob: _hello_";
    let markdown = format!(
        "# Title\n\nSome *text*.\n\n```mermaid\n{diagram_a}\n```\n\n- step one\n\n    ```mermaid\n    {}\n    ```\n",
        diagram_b.replace('\n', "\n    ")
    );

    let html = convert_markdown(&markdown, &CmarkRenderer::new(), Path::new("round-trip.md"))
        .expect("conversion");

    assert!(!html.contains("XMERMAIDIDX"), "residual placeholder in {html}");
    assert_eq!(html.matches("<div class=\"mermaid\">").count(), 2);
    assert!(html.contains(&format!("<div class=\"mermaid\">\n{diagram_a}\n</div>")));
    assert!(html.contains(&format!("<div class=\"mermaid\">\n{diagram_b}\n</div>")));

    let first = html.find(diagram_a).unwrap();
    let second = html.find(diagram_b).unwrap();
    assert!(first < second);
}
