//! End to end: Markdown source → ADF blocks

use mdadf::adf::builders::{paragraph, text};
use mdadf::{markdown_to_adf, markdown_to_document, CollectingSink, Converter, Mark, Node};
use rstest::rstest;

const RELEASE_NOTES: &str = "# Release notes

Fixed a **crash** in `parser`.

- first
- second

---

![logo](https://example.com/logo.png)
";

fn type_names(nodes: &[Node]) -> Vec<&'static str> {
    nodes.iter().map(Node::type_name).collect()
}

// ============================================================================
// DOCUMENT LEVEL
// ============================================================================

#[test]
fn test_empty_input_is_empty_output() {
    assert!(markdown_to_document("").is_empty());
    assert!(markdown_to_adf("").content.is_empty());
}

#[test]
fn test_title_and_bold_paragraph() {
    let nodes = markdown_to_document("# Title\n\nSome **bold** text.");
    assert_eq!(nodes.len(), 2);

    match &nodes[0] {
        Node::Heading { attrs, content } => {
            assert_eq!(attrs.level, 1);
            assert_eq!(content, &vec![text("Title", vec![])]);
        }
        other => panic!("Expected heading, got {:?}", other),
    }

    match &nodes[1] {
        Node::Paragraph { content } => {
            assert!(content.contains(&text("bold", vec![Mark::Strong])));
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_thematic_break_is_one_rule() {
    assert_eq!(markdown_to_document("---"), vec![Node::Rule]);
}

#[rstest]
#[case::empty_link("[]()")]
#[case::definition_only("[ref]: https://example.com")]
#[case::definition_with_title("[ref]: https://example.com \"Title\"\n")]
fn test_fully_dropped_input(#[case] source: &str) {
    assert!(markdown_to_document(source).is_empty());
}

#[test]
fn test_release_notes_document() {
    let json = serde_json::to_string_pretty(&markdown_to_adf(RELEASE_NOTES)).unwrap();
    insta::assert_snapshot!("release_notes_document", json);
}

// ============================================================================
// BLOCKS
// ============================================================================

#[rstest]
#[case::fenced_with_language("```rust\nlet x = 1;\n```", Some("rust"))]
#[case::fenced_with_info_words("```python title=x\nprint(1)\n```", Some("python"))]
#[case::fenced_without_language("```\nplain\n```", None)]
#[case::indented("    indented\n", None)]
fn test_code_block_language(#[case] source: &str, #[case] expected: Option<&str>) {
    let nodes = markdown_to_document(source);
    match nodes.as_slice() {
        [Node::CodeBlock { attrs, content }] => {
            assert_eq!(attrs.as_ref().map(|a| a.language.as_str()), expected);
            assert_eq!(content.len(), 1);
        }
        other => panic!("Expected one code block, got {:?}", other),
    }
}

#[test]
fn test_lone_image_is_hoisted() {
    let nodes = markdown_to_document("![cat](https://example.com/cat.png)");
    assert_eq!(type_names(&nodes), vec!["mediaSingle"]);
    assert_eq!(type_names(nodes[0].content()), vec!["media"]);
}

#[test]
fn test_image_url_is_kept_verbatim() {
    let nodes = markdown_to_document("![x](https://example.com)");
    let json = serde_json::to_value(&nodes).unwrap();
    assert_eq!(json[0]["content"][0]["attrs"]["url"], "https://example.com");
}

#[test]
fn test_relative_image_paragraph_is_empty_paragraph() {
    let nodes = markdown_to_document("![cat](cat.png)");
    assert_eq!(nodes, vec![paragraph(vec![])]);
}

#[test]
fn test_blank_lines_after_paragraph_become_hard_break() {
    let nodes = markdown_to_document("one\n\ntwo");
    assert_eq!(type_names(&nodes), vec!["paragraph", "paragraph", "paragraph"]);
    assert_eq!(type_names(nodes[1].content()), vec!["hardBreak"]);
}

#[test]
fn test_blockquote() {
    let nodes = markdown_to_document("> quoted *text*");
    match nodes.as_slice() {
        [Node::Blockquote { content }] => {
            assert_eq!(
                content,
                &vec![paragraph(vec![
                    text("quoted ", vec![]),
                    text("text", vec![Mark::Em])
                ])]
            );
        }
        other => panic!("Expected blockquote, got {:?}", other),
    }
}

#[test]
fn test_deeply_nested_blockquotes_do_not_overflow() {
    let source = format!("{} a", ">".repeat(400));
    let nodes = markdown_to_document(&source);

    let mut depth = 0;
    let mut current = nodes.first();
    while let Some(Node::Blockquote { content }) = current {
        depth += 1;
        current = content.first();
    }
    assert!(depth > 0 && depth <= mdadf::transform::MAX_DEPTH + 1, "depth {depth}");
}

#[test]
fn test_blockquote_with_heading_is_dropped() {
    assert!(markdown_to_document("> # Heading").is_empty());
}

#[test]
fn test_ordered_and_task_lists() {
    let nodes = markdown_to_document("1. one\n2. two\n\n- [x] done\n");
    assert_eq!(type_names(&nodes), vec!["orderedList", "bulletList"]);
    assert_eq!(nodes[0].content().len(), 2);
    assert_eq!(
        nodes[1].content(),
        &[Node::ListItem {
            content: vec![paragraph(vec![text("done", vec![])])]
        }]
    );
}

#[test]
fn test_list_item_with_heading_is_dropped() {
    let nodes = markdown_to_document("- keep\n- # drop\n- also kept\n");
    match nodes.as_slice() {
        [Node::BulletList { content }] => {
            assert_eq!(content.len(), 2);
            assert_eq!(
                content[1],
                Node::ListItem {
                    content: vec![paragraph(vec![text("also kept", vec![])])]
                }
            );
        }
        other => panic!("Expected bullet list, got {:?}", other),
    }
}

#[test]
fn test_nested_list() {
    let nodes = markdown_to_document("- outer\n  - inner\n");
    let item = &nodes[0].content()[0];
    assert_eq!(type_names(item.content()), vec!["paragraph", "bulletList"]);
}

// ============================================================================
// TABLES
// ============================================================================

#[test]
fn test_table_rows_and_failed_cell() {
    let converter = Converter::new().with_sink(CollectingSink::new());
    let nodes = converter
        .convert("| Name | Notes |\n|------|-------|\n| a | plain |\n| b | **bold** |\n")
        .unwrap();

    let rows = match nodes.as_slice() {
        [Node::Table { content }] => content,
        other => panic!("Expected table, got {:?}", other),
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(type_names(rows[0].content()), vec!["tableHeader", "tableHeader"]);
    assert_eq!(type_names(rows[1].content()), vec!["tableCell", "tableCell"]);
    assert_eq!(type_names(rows[2].content()), vec!["tableCell"]);

    let diagnostics = converter.sink().take();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "tableRow, tableCell build failed.");
    assert_eq!(diagnostics[0].source["text"], "bold");
}

#[test]
fn test_formatted_header_keeps_its_column() {
    let converter = Converter::new().with_sink(CollectingSink::new());
    let nodes = converter
        .convert("| **Name** | Age |\n|---|---|\n| a | 1 |\n")
        .unwrap();

    let rows = match nodes.as_slice() {
        [Node::Table { content }] => content,
        other => panic!("Expected table, got {:?}", other),
    };
    assert_eq!(type_names(rows[0].content()), vec!["tableHeader", "tableHeader"]);
    assert_eq!(
        rows[0].content()[0].content(),
        &[paragraph(vec![text("Name", vec![])])]
    );
    assert_eq!(type_names(rows[1].content()), vec!["tableCell", "tableCell"]);
    assert!(converter.sink().is_empty());
}

// ============================================================================
// INLINES
// ============================================================================

#[test]
fn test_inline_marks() {
    let nodes = markdown_to_document("*em* **strong** ~~gone~~ `code`");
    match nodes.as_slice() {
        [Node::Paragraph { content }] => {
            assert!(content.contains(&text("em", vec![Mark::Em])));
            assert!(content.contains(&text("strong", vec![Mark::Strong])));
            assert!(content.contains(&text("gone", vec![Mark::Strike])));
            assert!(content.contains(&text("code", vec![Mark::Code])));
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_link_shows_title_when_present() {
    let nodes = markdown_to_document("[docs](https://example.com \"Read the docs\") and [home](/)");
    match nodes.as_slice() {
        [Node::Paragraph { content }] => {
            assert_eq!(
                content[0],
                text("Read the docs", vec![Mark::link("https://example.com")])
            );
            assert_eq!(content[2], text("home", vec![Mark::link("/")]));
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_autolink() {
    let nodes = markdown_to_document("see https://example.com");
    match nodes.as_slice() {
        [Node::Paragraph { content }] => assert_eq!(
            content[1],
            text("https://example.com", vec![Mark::link("https://example.com")])
        ),
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_inline_html_is_plain_text() {
    let nodes = markdown_to_document("a <b>b</b>");
    match nodes.as_slice() {
        [Node::Paragraph { content }] => {
            assert_eq!(content[1], text("<b>", vec![]));
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_json_token_input() {
    let source = r#"[
        {"type": "heading", "raw": "", "depth": 2, "text": "T",
         "tokens": [{"type": "text", "raw": "T", "text": "T"}]},
        {"type": "mystery", "raw": "?"}
    ]"#;
    let nodes = Converter::new().convert_as(source, "tokens-json").unwrap();
    assert_eq!(type_names(&nodes), vec!["heading"]);
}
