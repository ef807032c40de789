//! Token tree handed over by a Markdown lexer
//!
//!     A lexer turns the source text into an ordered sequence of tokens. Each token carries a
//!     kind tag (`type` on the wire), the raw source it was cut from and kind specific fields.
//!     Container kinds (blockquote, heading, paragraph, list items, table cells, inline spans)
//!     expose their nested content as child token sequences.
//!
//!     The set of kinds is open: lexers grow extension kinds over time, and tokens may reach us
//!     as untyped JSON. Hence the two layers:
//!
//!     - [`Token`]: the kinds the transformer knows how to convert.
//!     - [`AnyToken`]: what a lexer actually hands over. Either a known token, a generic
//!       extension token (tagged, with raw text), or an unrecognized value.
//!
//!     Narrowing from [`AnyToken`] to [`Token`] is done by the classifier in [`classify`].
//!     Child sequences are `Vec<AnyToken>`, so an unknown or malformed child never spoils
//!     its parent: it is simply dropped when the parent's children are transformed.
//!
//!     Tokens are read-only inputs. Nothing downstream mutates them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod classify;

/// A token as produced by a lexer, before it has been narrowed to a known kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyToken {
    /// One of the kinds listed in [`Token`], with all required fields in place.
    Known(Token),
    /// A tagged token of a kind we don't convert (lexer extensions, or a known tag whose
    /// fields are malformed).
    Generic(GenericToken),
    /// Anything else.
    Unrecognized(Value),
}

impl AnyToken {
    /// Wire name of the token kind, when the value carries one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            AnyToken::Known(token) => Some(token.kind()),
            AnyToken::Generic(token) => Some(&token.kind),
            AnyToken::Unrecognized(value) => value.get("type").and_then(Value::as_str),
        }
    }
}

impl From<Token> for AnyToken {
    fn from(token: Token) -> Self {
        AnyToken::Known(token)
    }
}

impl<'de> Deserialize<'de> for AnyToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(classify::narrow(value))
    }
}

/// Extension token: tagged and carrying its raw source, of a kind outside [`Token`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<AnyToken>,
}

// ============================================================================
// KNOWN TOKEN KINDS
// ============================================================================

/// The token kinds the transformer dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    Blockquote {
        raw: String,
        text: String,
        tokens: Vec<AnyToken>,
    },
    /// Hard line break inside an inline run.
    Br { raw: String },
    /// Fenced or indented code block.
    Code {
        raw: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        #[serde(
            rename = "codeBlockStyle",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        code_block_style: Option<String>,
    },
    /// Inline code span.
    Codespan { raw: String, text: String },
    /// Link reference definition.
    Def {
        raw: String,
        tag: String,
        href: String,
        #[serde(default)]
        title: String,
    },
    /// Strikethrough span.
    Del {
        raw: String,
        text: String,
        tokens: Vec<AnyToken>,
    },
    Em {
        raw: String,
        text: String,
        tokens: Vec<AnyToken>,
    },
    /// Backslash escape.
    Escape { raw: String, text: String },
    Heading {
        raw: String,
        depth: u32,
        text: String,
        tokens: Vec<AnyToken>,
    },
    /// Thematic break.
    Hr { raw: String },
    Html {
        raw: String,
        text: String,
        #[serde(default)]
        block: bool,
        #[serde(default)]
        pre: bool,
    },
    Image {
        raw: String,
        href: String,
        #[serde(default)]
        title: Option<String>,
        text: String,
    },
    Link {
        raw: String,
        href: String,
        #[serde(default)]
        title: Option<String>,
        text: String,
        tokens: Vec<AnyToken>,
    },
    List {
        raw: String,
        ordered: bool,
        #[serde(default, deserialize_with = "number_or_blank")]
        start: Option<u64>,
        #[serde(default)]
        loose: bool,
        items: Vec<ListItemToken>,
    },
    /// Only ever found inside [`Token::List::items`]; a free-standing one converts to nothing.
    ListItem(ListItemToken),
    Paragraph {
        raw: String,
        text: String,
        tokens: Vec<AnyToken>,
    },
    /// Run of blank lines between blocks.
    Space { raw: String },
    Strong {
        raw: String,
        text: String,
        tokens: Vec<AnyToken>,
    },
    Table {
        raw: String,
        #[serde(default)]
        align: Vec<Option<Align>>,
        header: Vec<TableCell>,
        rows: Vec<Vec<TableCell>>,
    },
    /// Plain text. Inline text has no children; block-level text (paragraphs inside list
    /// items) carries its inline tokens.
    Text {
        raw: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tokens: Option<Vec<AnyToken>>,
    },
}

impl Token {
    /// Wire name of this token's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Blockquote { .. } => "blockquote",
            Token::Br { .. } => "br",
            Token::Code { .. } => "code",
            Token::Codespan { .. } => "codespan",
            Token::Def { .. } => "def",
            Token::Del { .. } => "del",
            Token::Em { .. } => "em",
            Token::Escape { .. } => "escape",
            Token::Heading { .. } => "heading",
            Token::Hr { .. } => "hr",
            Token::Html { .. } => "html",
            Token::Image { .. } => "image",
            Token::Link { .. } => "link",
            Token::List { .. } => "list",
            Token::ListItem(_) => "list_item",
            Token::Paragraph { .. } => "paragraph",
            Token::Space { .. } => "space",
            Token::Strong { .. } => "strong",
            Token::Table { .. } => "table",
            Token::Text { .. } => "text",
        }
    }

    /// The source text this token was cut from.
    pub fn raw(&self) -> &str {
        match self {
            Token::ListItem(item) => &item.raw,
            Token::Blockquote { raw, .. }
            | Token::Br { raw }
            | Token::Code { raw, .. }
            | Token::Codespan { raw, .. }
            | Token::Def { raw, .. }
            | Token::Del { raw, .. }
            | Token::Em { raw, .. }
            | Token::Escape { raw, .. }
            | Token::Heading { raw, .. }
            | Token::Hr { raw }
            | Token::Html { raw, .. }
            | Token::Image { raw, .. }
            | Token::Link { raw, .. }
            | Token::List { raw, .. }
            | Token::Paragraph { raw, .. }
            | Token::Space { raw }
            | Token::Strong { raw, .. }
            | Token::Table { raw, .. }
            | Token::Text { raw, .. } => raw,
        }
    }
}

/// One entry of a [`Token::List`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemToken {
    pub raw: String,
    #[serde(default)]
    pub task: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default)]
    pub loose: bool,
    pub text: String,
    pub tokens: Vec<AnyToken>,
}

/// One cell of a [`Token::Table`], header or body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
    pub tokens: Vec<AnyToken>,
    #[serde(default)]
    pub header: bool,
    #[serde(default)]
    pub align: Option<Align>,
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Ordered lists carry their first number; bullet lists carry an empty string.
fn number_or_blank<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("list start must be a non-negative integer")),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "list start must be a number or \"\", got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_token_from_json() {
        let token: AnyToken = serde_json::from_value(json!({
            "type": "heading",
            "raw": "# Title\n",
            "depth": 1,
            "text": "Title",
            "tokens": [{ "type": "text", "raw": "Title", "text": "Title" }]
        }))
        .unwrap();

        match token {
            AnyToken::Known(Token::Heading { depth, tokens, .. }) => {
                assert_eq!(depth, 1);
                assert_eq!(tokens.len(), 1);
                assert_eq!(tokens[0].kind(), Some("text"));
            }
            other => panic!("Expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_token_is_generic() {
        let token: AnyToken = serde_json::from_value(json!({
            "type": "footnote",
            "raw": "[^1]: note",
        }))
        .unwrap();

        assert!(matches!(token, AnyToken::Generic(_)));
        assert_eq!(token.kind(), Some("footnote"));
    }

    #[test]
    fn test_malformed_child_does_not_spoil_parent() {
        let token: AnyToken = serde_json::from_value(json!({
            "type": "paragraph",
            "raw": "text",
            "text": "text",
            "tokens": [{ "type": "heading", "raw": "#" }, 42]
        }))
        .unwrap();

        match token {
            AnyToken::Known(Token::Paragraph { tokens, .. }) => {
                assert!(matches!(tokens[0], AnyToken::Generic(_)));
                assert!(matches!(tokens[1], AnyToken::Unrecognized(_)));
            }
            other => panic!("Expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_list_start_accepts_number_or_blank() {
        let ordered: Token = serde_json::from_value(json!({
            "type": "list", "raw": "3. a", "ordered": true, "start": 3, "loose": false, "items": []
        }))
        .unwrap();
        let bullet: Token = serde_json::from_value(json!({
            "type": "list", "raw": "- a", "ordered": false, "start": "", "loose": false, "items": []
        }))
        .unwrap();

        assert!(matches!(ordered, Token::List { start: Some(3), .. }));
        assert!(matches!(bullet, Token::List { start: None, .. }));
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let token = Token::Hr {
            raw: "---".to_string(),
        };
        assert_eq!(
            serde_json::to_value(AnyToken::from(token)).unwrap(),
            json!({ "type": "hr", "raw": "---" })
        );
    }
}
