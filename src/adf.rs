//! Atlassian Document Format (ADF) content nodes
//!
//!     The output side of the conversion: a tree of typed content nodes, tagged by `type` on
//!     the wire, ready to be serialized to JSON and stored or rendered by an editor that only
//!     understands this schema.
//!
//!     Nodes are plain values. They are built fresh on each conversion, have no identity beyond
//!     structural equality and hold no back references. Once returned, the caller owns the tree.
//!
//!     Building a node never checks what was put inside it; the per-kind content rules live in
//!     [`shape`] and are applied by the transformer before a recursively produced sequence is
//!     embedded in a parent.
//!
//! Modules
//!
//!     - [`builders`]: small constructors for leaf and fixed-shape nodes
//!     - [`shape`]: runtime content validation per composite node kind

use serde::{Deserialize, Serialize};

pub mod builders;
pub mod shape;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Paragraph {
        content: Vec<Node>,
    },
    Heading {
        attrs: HeadingAttrs,
        content: Vec<Node>,
    },
    Blockquote {
        content: Vec<Node>,
    },
    BulletList {
        content: Vec<Node>,
    },
    OrderedList {
        content: Vec<Node>,
    },
    ListItem {
        content: Vec<Node>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<CodeBlockAttrs>,
        content: Vec<Node>,
    },
    Rule,
    Table {
        content: Vec<Node>,
    },
    TableRow {
        content: Vec<Node>,
    },
    TableHeader {
        content: Vec<Node>,
    },
    TableCell {
        content: Vec<Node>,
    },
    Media {
        attrs: MediaAttrs,
    },
    MediaSingle {
        attrs: MediaSingleAttrs,
        content: Vec<Node>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        marks: Option<Vec<Mark>>,
    },
    HardBreak {
        attrs: HardBreakAttrs,
    },
}

impl Node {
    /// Wire name of this node's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::Blockquote { .. } => "blockquote",
            Node::BulletList { .. } => "bulletList",
            Node::OrderedList { .. } => "orderedList",
            Node::ListItem { .. } => "listItem",
            Node::CodeBlock { .. } => "codeBlock",
            Node::Rule => "rule",
            Node::Table { .. } => "table",
            Node::TableRow { .. } => "tableRow",
            Node::TableHeader { .. } => "tableHeader",
            Node::TableCell { .. } => "tableCell",
            Node::Media { .. } => "media",
            Node::MediaSingle { .. } => "mediaSingle",
            Node::Text { .. } => "text",
            Node::HardBreak { .. } => "hardBreak",
        }
    }

    /// Child nodes of container kinds; empty for leaves.
    pub fn content(&self) -> &[Node] {
        match self {
            Node::Paragraph { content }
            | Node::Heading { content, .. }
            | Node::Blockquote { content }
            | Node::BulletList { content }
            | Node::OrderedList { content }
            | Node::ListItem { content }
            | Node::CodeBlock { content, .. }
            | Node::Table { content }
            | Node::TableRow { content }
            | Node::TableHeader { content }
            | Node::TableCell { content }
            | Node::MediaSingle { content, .. } => content,
            Node::Rule | Node::Media { .. } | Node::Text { .. } | Node::HardBreak { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttrs {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Absolute URL, kept exactly as written in the source.
    pub url: String,
}

/// Where a media node's bytes live. Only externally hosted media can be produced from Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSingleAttrs {
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardBreakAttrs {
    pub text: String,
}

/// Inline styling attached to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Code,
    Em,
    Link { attrs: LinkAttrs },
    Strike,
    Strong,
}

impl Mark {
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link {
            attrs: LinkAttrs { href: href.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
}

/// The `doc` envelope a document store expects around the top-level blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Doc,
}

impl Document {
    pub const VERSION: u32 = 1;

    pub fn new(content: Vec<Node>) -> Self {
        Self {
            version: Self::VERSION,
            kind: DocumentKind::Doc,
            content,
        }
    }
}
