//! Markdown lexing (Markdown → token tree)
//!
//! Pipeline: Markdown string → Comrak AST → token tree
//!
//! The token tree mirrors what a classic regex-driven Markdown lexer hands over, so that the
//! transformer only ever sees one token taxonomy regardless of where tokens come from:
//!
//! - Children of the document and of blockquotes are lexed at top level, where paragraphs are
//!   `paragraph` tokens.
//! - Children of list items are lexed nested, where paragraphs become block `text` tokens
//!   (plain text plus the inline tokens).
//! - A run of blank lines after a paragraph, with another block following, becomes a `space`
//!   token.
//! - Table cells hold inline tokens directly.
//!
//! Comrak resolves link reference definitions and entities on its own, so `def` and `escape`
//! tokens never appear in its output. For the same reason a `text` token's `raw` is the decoded
//! literal, identical to its `text`: `a &amp; b \* c` lexes to `a & b * c` in both fields.
//! Blocks without a counterpart (front matter, footnote definitions, description lists) are
//! skipped.

use super::Lexer;
use crate::error::ConvertResult;
use crate::token::{Align, AnyToken, ListItemToken, TableCell, Token};
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};
use tracing::{debug, trace};

/// GFM extensions switched on while lexing. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownExtensions {
    pub table: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self {
            table: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
        }
    }
}

/// CommonMark + GFM lexer backed by comrak.
#[derive(Debug, Clone, Default)]
pub struct MarkdownLexer {
    extensions: MarkdownExtensions,
}

impl MarkdownLexer {
    pub const NAME: &'static str = "markdown";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions(extensions: MarkdownExtensions) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> MarkdownExtensions {
        self.extensions
    }

    /// Lex `source` into top-level tokens. Never fails: anything comrak accepts is Markdown.
    pub fn tokenize(&self, source: &str) -> Vec<AnyToken> {
        let arena = Arena::new();
        let options = self.comrak_options();
        let root = parse_document(&arena, source, &options);

        let tokens = Walker::new(source).blocks(root, Mode::Top);
        debug!(tokens = tokens.len(), "lexed markdown");
        tokens
    }

    fn comrak_options(&self) -> ComrakOptions<'static> {
        let mut options = ComrakOptions::default();
        options.extension.table = self.extensions.table;
        options.extension.strikethrough = self.extensions.strikethrough;
        options.extension.autolink = self.extensions.autolink;
        options.extension.tasklist = self.extensions.tasklist;
        options
    }
}

impl Lexer for MarkdownLexer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "CommonMark with GFM tables, strikethrough, autolinks and task lists"
    }

    fn lex(&self, source: &str) -> ConvertResult<Vec<AnyToken>> {
        Ok(self.tokenize(source))
    }
}

/// How paragraphs are lexed at the current depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Document and blockquote children: `paragraph` tokens.
    Top,
    /// List item children: block `text` tokens.
    Nested,
}

struct Walker<'s> {
    lines: Vec<&'s str>,
}

impl<'s> Walker<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            lines: source.split_inclusive('\n').collect(),
        }
    }

    /// Source lines `start..=end` (1-based), newlines included.
    fn span(&self, start: usize, end: usize) -> String {
        let from = start.saturating_sub(1).min(self.lines.len());
        let to = end.min(self.lines.len()).max(from);
        self.lines[from..to].concat()
    }

    fn raw<'a>(&self, node: &'a AstNode<'a>) -> String {
        let (start, end) = line_range(node);
        self.span(start, end)
    }

    // ========================================================================
    // BLOCKS
    // ========================================================================

    fn blocks<'a>(&self, parent: &'a AstNode<'a>, mode: Mode) -> Vec<AnyToken> {
        let children: Vec<&'a AstNode<'a>> = parent.children().collect();
        let mut tokens = Vec::with_capacity(children.len());

        for (index, child) in children.iter().enumerate() {
            if let Some(token) = self.block(child, mode) {
                tokens.push(token);
            }

            let Some(next) = children.get(index + 1) else {
                continue;
            };
            let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
            let (_, end) = line_range(child);
            let (next_start, _) = line_range(next);
            if is_paragraph && next_start > end + 1 {
                let blank = next_start - end - 1;
                tokens.push(Token::Space { raw: "\n".repeat(blank) }.into());
            }
        }

        tokens
    }

    fn block<'a>(&self, node: &'a AstNode<'a>, mode: Mode) -> Option<AnyToken> {
        let data = node.data.borrow();
        let raw = self.raw(node);

        let token = match &data.value {
            NodeValue::Paragraph => {
                let tokens = self.inlines(node);
                let text = plain_text(node);
                match mode {
                    Mode::Top => Token::Paragraph { raw, text, tokens },
                    Mode::Nested => Token::Text {
                        raw,
                        text,
                        tokens: Some(tokens),
                    },
                }
            }
            NodeValue::Heading(heading) => Token::Heading {
                raw,
                depth: u32::from(heading.level),
                text: plain_text(node),
                tokens: self.inlines(node),
            },
            NodeValue::CodeBlock(code) => {
                let text = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
                Token::Code {
                    raw,
                    text: text.to_string(),
                    lang: code.info.split_whitespace().next().map(str::to_string),
                    code_block_style: (!code.fenced).then(|| "indented".to_string()),
                }
            }
            NodeValue::HtmlBlock(html) => Token::Html {
                raw,
                text: html.literal.trim_end_matches('\n').to_string(),
                block: true,
                pre: html.block_type == 1,
            },
            NodeValue::ThematicBreak => Token::Hr { raw },
            NodeValue::BlockQuote => Token::Blockquote {
                raw,
                text: plain_text(node),
                tokens: self.blocks(node, Mode::Top),
            },
            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                Token::List {
                    raw,
                    ordered,
                    start: ordered.then_some(list.start as u64),
                    loose: !list.tight,
                    items: node
                        .children()
                        .filter_map(|item| self.list_item(item))
                        .collect(),
                }
            }
            NodeValue::Table(table) => {
                let alignments: Vec<Option<Align>> =
                    table.alignments.iter().map(|a| align(*a)).collect();
                self.table(node, raw, alignments)
            }
            other => {
                trace!(node = ?other, "skipping markdown block without a token kind");
                return None;
            }
        };

        Some(token.into())
    }

    fn list_item<'a>(&self, node: &'a AstNode<'a>) -> Option<ListItemToken> {
        let data = node.data.borrow();
        let (task, checked, tight) = match &data.value {
            NodeValue::Item(list) => (false, None, list.tight),
            NodeValue::TaskItem(symbol) => {
                let tight = node
                    .parent()
                    .and_then(|parent| match &parent.data.borrow().value {
                        NodeValue::List(list) => Some(list.tight),
                        _ => None,
                    })
                    .unwrap_or(true);
                (true, Some(symbol.is_some()), tight)
            }
            _ => return None,
        };

        Some(ListItemToken {
            raw: self.raw(node),
            task,
            checked,
            loose: !tight,
            text: plain_text(node),
            tokens: self.blocks(node, Mode::Nested),
        })
    }

    fn table<'a>(&self, node: &'a AstNode<'a>, raw: String, alignments: Vec<Option<Align>>) -> Token {
        let mut header = Vec::new();
        let mut rows = Vec::new();

        for row in node.children() {
            let is_header = match row.data.borrow().value {
                NodeValue::TableRow(is_header) => is_header,
                _ => continue,
            };
            let cells: Vec<TableCell> = row
                .children()
                .enumerate()
                .map(|(column, cell)| TableCell {
                    text: plain_text(cell),
                    tokens: self.inlines(cell),
                    header: is_header,
                    align: alignments.get(column).copied().flatten(),
                })
                .collect();

            if is_header {
                header = cells;
            } else {
                rows.push(cells);
            }
        }

        Token::Table {
            raw,
            align: alignments,
            header,
            rows,
        }
    }

    // ========================================================================
    // INLINES
    // ========================================================================

    /// Inline tokens of a block. Adjacent text and soft breaks are merged into one text token.
    fn inlines<'a>(&self, parent: &'a AstNode<'a>) -> Vec<AnyToken> {
        let mut tokens: Vec<AnyToken> = Vec::new();
        let mut pending = String::new();

        for child in parent.children() {
            match &child.data.borrow().value {
                NodeValue::Text(text) => {
                    pending.push_str(text);
                    continue;
                }
                NodeValue::SoftBreak => {
                    pending.push('\n');
                    continue;
                }
                _ => {}
            }

            flush_text(&mut pending, &mut tokens);
            if let Some(token) = self.inline(child) {
                tokens.push(token.into());
            }
        }
        flush_text(&mut pending, &mut tokens);

        tokens
    }

    fn inline<'a>(&self, node: &'a AstNode<'a>) -> Option<Token> {
        let data = node.data.borrow();

        let token = match &data.value {
            NodeValue::LineBreak => Token::Br {
                raw: "\n".to_string(),
            },
            NodeValue::Code(code) => {
                let ticks = "`".repeat(code.num_backticks.max(1));
                Token::Codespan {
                    raw: format!("{ticks}{}{ticks}", code.literal),
                    text: code.literal.clone(),
                }
            }
            NodeValue::Emph => {
                let (raw, text, tokens) = self.span_parts(node, "*");
                Token::Em { raw, text, tokens }
            }
            NodeValue::Strong => {
                let (raw, text, tokens) = self.span_parts(node, "**");
                Token::Strong { raw, text, tokens }
            }
            NodeValue::Strikethrough => {
                let (raw, text, tokens) = self.span_parts(node, "~~");
                Token::Del { raw, text, tokens }
            }
            NodeValue::Link(link) => {
                let tokens = self.inlines(node);
                Token::Link {
                    raw: format!("[{}]({})", joined_raw(&tokens), link.url),
                    href: link.url.clone(),
                    title: non_empty(&link.title),
                    text: plain_text(node),
                    tokens,
                }
            }
            NodeValue::Image(link) => {
                let text = plain_text(node);
                Token::Image {
                    raw: format!("![{}]({})", text, link.url),
                    href: link.url.clone(),
                    title: non_empty(&link.title),
                    text,
                }
            }
            NodeValue::HtmlInline(html) => Token::Html {
                raw: html.clone(),
                text: html.clone(),
                block: false,
                pre: false,
            },
            other => {
                trace!(node = ?other, "skipping markdown inline without a token kind");
                return None;
            }
        };

        Some(token)
    }

    /// Raw, plain text and child tokens of a delimited span.
    fn span_parts<'a>(
        &self,
        node: &'a AstNode<'a>,
        delimiter: &str,
    ) -> (String, String, Vec<AnyToken>) {
        let tokens = self.inlines(node);
        let raw = format!("{delimiter}{}{delimiter}", joined_raw(&tokens));
        (raw, plain_text(node), tokens)
    }
}

fn flush_text(pending: &mut String, tokens: &mut Vec<AnyToken>) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    tokens.push(
        Token::Text {
            raw: text.clone(),
            text,
            tokens: None,
        }
        .into(),
    );
}

fn line_range<'a>(node: &'a AstNode<'a>) -> (usize, usize) {
    let pos = node.data.borrow().sourcepos;
    (pos.start.line, pos.end.line)
}

fn joined_raw(tokens: &[AnyToken]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            AnyToken::Known(token) => token.raw(),
            AnyToken::Generic(token) => token.raw.as_str(),
            AnyToken::Unrecognized(_) => "",
        })
        .collect()
}

/// Text content of a node and its descendants, markup stripped.
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => out.push_str(text),
        NodeValue::Code(code) => out.push_str(&code.literal),
        NodeValue::CodeBlock(code) => out.push_str(&code.literal),
        NodeValue::HtmlInline(html) => out.push_str(html),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
        _ => {
            let mut first = true;
            for child in node.children() {
                if !first && is_block(&child.data.borrow().value) {
                    out.push('\n');
                }
                first = false;
                collect_text(child, out);
            }
        }
    }
}

fn is_block(value: &NodeValue) -> bool {
    matches!(
        value,
        NodeValue::Paragraph
            | NodeValue::Heading(_)
            | NodeValue::CodeBlock(_)
            | NodeValue::HtmlBlock(_)
            | NodeValue::ThematicBreak
            | NodeValue::BlockQuote
            | NodeValue::List(_)
            | NodeValue::Item(_)
            | NodeValue::TaskItem(_)
            | NodeValue::Table(_)
            | NodeValue::TableRow(_)
            | NodeValue::TableCell
    )
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn align(alignment: TableAlignment) -> Option<Align> {
    match alignment {
        TableAlignment::None => None,
        TableAlignment::Left => Some(Align::Left),
        TableAlignment::Center => Some(Align::Center),
        TableAlignment::Right => Some(Align::Right),
    }
}
