//! Constructors for leaf and fixed-shape nodes
//!
//! Each builder is a pure function of its inputs. None of them recurse or look at tokens;
//! constraints on the inputs (heading level range, absolute media URLs) are the caller's to
//! uphold.

use super::{
    CodeBlockAttrs, HardBreakAttrs, HeadingAttrs, Layout, Mark, MediaAttrs, MediaKind,
    MediaSingleAttrs, Node,
};

/// Code block wrapping `text` as its single text node. The language attribute is attached
/// only for a non-empty `language`.
pub fn code_block(text: impl Into<String>, language: Option<&str>) -> Node {
    let attrs = language
        .filter(|language| !language.is_empty())
        .map(|language| CodeBlockAttrs {
            language: language.to_string(),
        });

    Node::CodeBlock {
        attrs,
        content: vec![text_node(text.into(), None)],
    }
}

/// Heading of the given level. The caller clamps `level` into 1..=6.
pub fn heading(content: Vec<Node>, level: u8) -> Node {
    Node::Heading {
        attrs: HeadingAttrs { level },
        content,
    }
}

/// Text run. `marks` are attached only when there is at least one.
pub fn text(text: impl Into<String>, marks: Vec<Mark>) -> Node {
    let marks = if marks.is_empty() { None } else { Some(marks) };
    text_node(text.into(), marks)
}

/// Externally hosted media. `url` must be absolute; it is stored verbatim.
pub fn media(url: impl Into<String>) -> Node {
    Node::Media {
        attrs: MediaAttrs {
            kind: MediaKind::External,
            url: url.into(),
        },
    }
}

/// Centered block holding a single media node.
pub fn media_single(url: impl Into<String>) -> Node {
    Node::MediaSingle {
        attrs: MediaSingleAttrs {
            layout: Layout::Center,
        },
        content: vec![media(url)],
    }
}

pub fn rule() -> Node {
    Node::Rule
}

pub fn paragraph(content: Vec<Node>) -> Node {
    Node::Paragraph { content }
}

pub fn hard_break(text: impl Into<String>) -> Node {
    Node::HardBreak {
        attrs: HardBreakAttrs { text: text.into() },
    }
}

fn text_node(text: String, marks: Option<Vec<Mark>>) -> Node {
    Node::Text { text, marks }
}
