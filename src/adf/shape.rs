//! Runtime content validation per composite node kind
//!
//! A recursive conversion returns a filtered, heterogeneous `Vec<Node>`; its static type says
//! nothing about whether the sequence may sit inside a given parent. These predicates are the
//! check run before embedding. They are deep: a sequence only passes when every node in it is
//! allowed at that position and is itself well formed all the way down.
//!
//! Sequences may be empty. The one minimum enforced is on text, which must not be empty.
//!
//! The `fits_*` variants are shallow: they look at the kind of each node and at leaves only.
//! The transformer uses them when embedding children it has just built, since every composite
//! child already passed its own check on the way up.

use super::Node;

/// Every node is an inline node (`text` or `hardBreak`) and well formed.
pub fn is_inline_content(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_inline(node) && is_valid(node))
}

/// Content allowed inside a `blockquote`.
pub fn is_blockquote_content(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_flow_block(node) && is_valid(node))
}

/// Content allowed inside a `listItem`.
pub fn is_list_item_content(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_flow_block(node) && is_valid(node))
}

/// Content allowed inside a `tableHeader` or `tableCell`.
pub fn is_table_cell_content(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_cell_block(node) && is_valid(node))
}

pub fn fits_blockquote(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_flow_block(node) && is_valid_leaf(node))
}

pub fn fits_list_item(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_flow_block(node) && is_valid_leaf(node))
}

pub fn fits_table_cell(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| is_cell_block(node) && is_valid_leaf(node))
}

/// Whether a single node, and everything below it, follows its kind's rules.
pub fn is_valid(node: &Node) -> bool {
    match node {
        Node::Paragraph { content } => is_inline_content(content),
        Node::Heading { attrs, content } => {
            (1..=6).contains(&attrs.level) && is_inline_content(content)
        }
        Node::Blockquote { content } => is_blockquote_content(content),
        Node::BulletList { content } | Node::OrderedList { content } => content
            .iter()
            .all(|item| matches!(item, Node::ListItem { .. }) && is_valid(item)),
        Node::ListItem { content } => is_list_item_content(content),
        Node::CodeBlock { content, .. } => {
            matches!(content.as_slice(), [Node::Text { marks: None, .. }])
        }
        Node::Table { content } => content
            .iter()
            .all(|row| matches!(row, Node::TableRow { .. }) && is_valid(row)),
        Node::TableRow { content } => content.iter().all(|cell| {
            matches!(cell, Node::TableHeader { .. } | Node::TableCell { .. }) && is_valid(cell)
        }),
        Node::TableHeader { content } | Node::TableCell { content } => {
            is_table_cell_content(content)
        }
        Node::MediaSingle { content, .. } => matches!(content.as_slice(), [Node::Media { .. }]),
        Node::Text { text, marks } => {
            !text.is_empty() && marks.as_ref().map_or(true, |marks| !marks.is_empty())
        }
        Node::Rule | Node::Media { .. } | Node::HardBreak { .. } => true,
    }
}

fn is_inline(node: &Node) -> bool {
    matches!(node, Node::Text { .. } | Node::HardBreak { .. })
}

fn is_flow_block(node: &Node) -> bool {
    matches!(
        node,
        Node::Paragraph { .. }
            | Node::BulletList { .. }
            | Node::OrderedList { .. }
            | Node::CodeBlock { .. }
            | Node::MediaSingle { .. }
    )
}

fn is_cell_block(node: &Node) -> bool {
    is_flow_block(node) || matches!(node, Node::Blockquote { .. } | Node::Rule | Node::Heading { .. })
}

/// Composite nodes pass unchecked; leaves are checked in full.
fn is_valid_leaf(node: &Node) -> bool {
    match node {
        Node::Text { .. } | Node::HardBreak { .. } | Node::Media { .. } | Node::Rule => {
            is_valid(node)
        }
        _ => true,
    }
}
