//! Token tree → ADF node conversion
//!
//!     The transformer walks a token tree and produces content nodes. It is a pure function of
//!     its input apart from the diagnostics it hands to its sink: the same tokens always give
//!     the same nodes, and no state survives between calls.
//!
//! Dispatch
//!
//!     Every token is first classified (see [`crate::token::classify`]); anything that does not
//!     match a known kind converts to nothing. Known kinds then map as follows:
//!
//!     | Token       | Node                                                                |
//!     | blockquote  | blockquote over the converted children, when they fit               |
//!     | code        | codeBlock, language attached when non-empty                         |
//!     | codespan    | text with a `code` mark                                             |
//!     | del         | text with a `strike` mark                                           |
//!     | em          | text with an `em` mark                                              |
//!     | strong      | text with a `strong` mark                                           |
//!     | heading     | heading over inline children, depth clamped into 1..=6              |
//!     | hr          | rule                                                                |
//!     | html        | plain text of the html                                              |
//!     | image       | mediaSingle, when href is an absolute URI                           |
//!     | link        | text with a `link` mark, showing the title when there is one        |
//!     | list        | bulletList / orderedList of the items whose content fits            |
//!     | paragraph   | a lone mediaSingle is hoisted, otherwise paragraph over inlines     |
//!     | space       | paragraph holding one hardBreak                                     |
//!     | table       | table, header row first; body cells that don't fit are reported    |
//!     | text        | paragraph when converting paragraphs, bare raw text otherwise       |
//!     | br, def, escape, list_item | nothing                                              |
//!
//! Paragraph conversion
//!
//!     List items and table cells only accept block content, yet lexers hand their text over as
//!     bare text tokens. Their children are therefore converted with `convert_paragraph` set,
//!     which wraps a text token in its own paragraph. The flag applies to the direct children
//!     only: it is not passed further down by containers that convert their own children.
//!
//! Shape checks
//!
//!     A recursive call returns a filtered list of whatever its children became. Before that list
//!     is embedded in a parent it is checked against the parent's content rules
//!     ([`crate::adf::shape`]); a failing list drops the parent (or, for lists and tables, just
//!     the item or body cell). Children were checked when they were built, so only their kinds
//!     and leaves are looked at again.
//!
//! Depth
//!
//!     Nesting is capped at [`MAX_DEPTH`] containers. Tokens below the cap convert to nothing,
//!     which keeps pathological input such as hundreds of nested `>` from exhausting the stack.

use crate::adf::builders;
use crate::adf::{shape, Mark, Node};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::token::{AnyToken, ListItemToken, TableCell, Token};
use tracing::{debug, trace};
use url::Url;

/// Containers nested deeper than this are cut off; their children convert to nothing.
pub const MAX_DEPTH: usize = 128;

/// Converts token trees into ADF nodes, reporting cell build failures to `S`.
#[derive(Debug, Clone, Default)]
pub struct Transformer<S = TracingSink> {
    sink: S,
}

impl Transformer {
    /// Transformer reporting through `tracing`.
    pub fn new() -> Self {
        Self { sink: TracingSink }
    }
}

impl<S: DiagnosticSink> Transformer<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Convert a sequence of tokens (a single token is a sequence of one), dropping the ones
    /// that convert to nothing. Each input token contributes at most one node.
    pub fn transform<'t, I>(&self, tokens: I, convert_paragraph: bool) -> Vec<Node>
    where
        I: IntoIterator<Item = &'t AnyToken>,
    {
        self.transform_at(tokens, convert_paragraph, 0)
    }

    /// Convert one token into at most one node.
    pub fn transform_one(&self, token: &AnyToken, convert_paragraph: bool) -> Option<Node> {
        self.transform_one_at(token, convert_paragraph, 0)
    }

    fn transform_at<'t, I>(&self, tokens: I, convert_paragraph: bool, depth: usize) -> Vec<Node>
    where
        I: IntoIterator<Item = &'t AnyToken>,
    {
        tokens
            .into_iter()
            .filter_map(|token| self.transform_one_at(token, convert_paragraph, depth))
            .collect()
    }

    fn transform_one_at(
        &self,
        token: &AnyToken,
        convert_paragraph: bool,
        depth: usize,
    ) -> Option<Node> {
        if depth > MAX_DEPTH {
            trace!(
                kind = token.kind().unwrap_or("<none>"),
                depth,
                "dropping token nested past the depth limit"
            );
            return None;
        }
        let Some(known) = token.classify() else {
            trace!(kind = token.kind().unwrap_or("<none>"), "dropping unclassified token");
            return None;
        };
        let inner = depth + 1;

        match known {
            Token::Blockquote { tokens, .. } => {
                let content = self.transform_at(tokens, false, inner);
                shape::fits_blockquote(&content).then_some(Node::Blockquote { content })
            }
            Token::Code { text, lang, .. } => Some(builders::code_block(text.as_str(), lang.as_deref())),
            Token::Codespan { text, .. } => Some(builders::text(text.as_str(), vec![Mark::Code])),
            Token::Del { text, .. } => Some(builders::text(text.as_str(), vec![Mark::Strike])),
            Token::Em { text, .. } => Some(builders::text(text.as_str(), vec![Mark::Em])),
            Token::Strong { text, .. } => Some(builders::text(text.as_str(), vec![Mark::Strong])),
            Token::Heading { depth: level, tokens, .. } => {
                let content = self.transform_at(tokens, false, inner);
                if shape::is_inline_content(&content) {
                    Some(builders::heading(content, heading_level(*level)))
                } else {
                    None
                }
            }
            Token::Hr { .. } => Some(builders::rule()),
            // Embedded as plain text; there is no faithful ADF counterpart for arbitrary html.
            Token::Html { text, .. } => Some(builders::text(text.as_str(), Vec::new())),
            Token::Image { href, .. } => match Url::parse(href) {
                Ok(_) => Some(builders::media_single(href.as_str())),
                Err(err) => {
                    debug!(href = %href, error = %err, "dropping image without an absolute url");
                    None
                }
            },
            Token::Link {
                href, title, text, ..
            } => {
                let shown = title.as_deref().unwrap_or(text);
                Some(builders::text(shown, vec![Mark::link(href.as_str())]))
            }
            Token::List { ordered, items, .. } => Some(self.list(*ordered, items, inner)),
            Token::Paragraph { tokens, .. } => self.paragraph(tokens, inner),
            Token::Space { .. } => Some(builders::paragraph(vec![builders::hard_break("\n")])),
            Token::Table { header, rows, .. } => Some(self.table(header, rows, inner)),
            Token::Text { raw, text, .. } => {
                if convert_paragraph {
                    Some(builders::paragraph(vec![builders::text(
                        text.as_str(),
                        Vec::new(),
                    )]))
                } else {
                    Some(builders::text(raw.as_str(), Vec::new()))
                }
            }
            Token::Br { .. } | Token::Def { .. } | Token::Escape { .. } | Token::ListItem(_) => {
                trace!(kind = known.kind(), "token kind converts to nothing");
                None
            }
        }
    }

    fn paragraph(&self, tokens: &[AnyToken], depth: usize) -> Option<Node> {
        let mut content = self.transform_at(tokens, false, depth);
        if let [Node::MediaSingle { .. }] = content.as_slice() {
            return content.pop();
        }
        if shape::is_inline_content(&content) {
            Some(builders::paragraph(content))
        } else {
            let kinds: Vec<&str> = content.iter().map(Node::type_name).collect();
            trace!(?kinds, "dropping paragraph with non-inline content");
            None
        }
    }

    fn list(&self, ordered: bool, items: &[ListItemToken], depth: usize) -> Node {
        let content = items
            .iter()
            .filter_map(|item| {
                let content = self.transform_at(&item.tokens, true, depth);
                if shape::fits_list_item(&content) {
                    Some(Node::ListItem { content })
                } else {
                    trace!(raw = %item.raw, "dropping list item with unsupported content");
                    None
                }
            })
            .collect();

        if ordered {
            Node::OrderedList { content }
        } else {
            Node::BulletList { content }
        }
    }

    fn table(&self, header: &[TableCell], rows: &[Vec<TableCell>], depth: usize) -> Node {
        let mut content = Vec::with_capacity(rows.len() + 1);
        content.push(Node::TableRow {
            content: header
                .iter()
                .map(|cell| self.header_cell(cell, depth))
                .collect(),
        });
        content.extend(rows.iter().map(|row| Node::TableRow {
            content: row
                .iter()
                .filter_map(|cell| self.body_cell(cell, depth))
                .collect(),
        }));
        Node::Table { content }
    }

    /// Header cells are never dropped, so the header row keeps one cell per column. Content
    /// that doesn't fit falls back to the cell's plain text.
    fn header_cell(&self, cell: &TableCell, depth: usize) -> Node {
        let content = self.transform_at(&cell.tokens, true, depth);
        if shape::fits_table_cell(&content) {
            return Node::TableHeader { content };
        }

        trace!(text = %cell.text, "header cell content replaced by its plain text");
        let content = if cell.text.is_empty() {
            Vec::new()
        } else {
            vec![builders::paragraph(vec![builders::text(
                cell.text.as_str(),
                Vec::new(),
            )])]
        };
        Node::TableHeader { content }
    }

    fn body_cell(&self, cell: &TableCell, depth: usize) -> Option<Node> {
        let content = self.transform_at(&cell.tokens, true, depth);
        if shape::fits_table_cell(&content) {
            return Some(Node::TableCell { content });
        }

        let source = serde_json::to_value(cell).unwrap_or_default();
        self.sink.emit(Diagnostic::build_failure(
            "tableRow, tableCell build failed.",
            source,
            content,
        ));
        None
    }
}

/// Headings only come in six levels; deeper (or zero) depths are pulled into range.
fn heading_level(depth: u32) -> u8 {
    depth.clamp(1, 6) as u8
}
