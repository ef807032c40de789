//! Token classifier
//!
//! The trust boundary between a lexer and the transformer. A value only counts as a token
//! when it structurally matches one of the known kinds: a `type` discriminant naming one of
//! the [`Token`] kinds, with every field that kind requires present and correctly typed.
//! Anything else is reported as "not a token" and converts to nothing. Classification never
//! fails loudly.

use super::{AnyToken, GenericToken, Token};
use serde::Deserialize;
use serde_json::Value;

impl AnyToken {
    /// Narrow to a known token kind. `None` means the transformer must not touch this value.
    pub fn classify(&self) -> Option<&Token> {
        match self {
            AnyToken::Known(token) => Some(token),
            AnyToken::Generic(_) | AnyToken::Unrecognized(_) => None,
        }
    }
}

/// Check whether an untyped value is a well-formed token of a known kind.
pub fn is_token(value: &Value) -> bool {
    classify(value).is_some()
}

/// Narrow an untyped value to a known token, or `None` when it does not match any kind.
///
/// Child token sequences are classified lazily, element by element, so a parent with an
/// unknown child still classifies.
pub fn classify(value: &Value) -> Option<Token> {
    Token::deserialize(value).ok()
}

/// Sort an untyped value into the open token union.
pub(crate) fn narrow(value: Value) -> AnyToken {
    if let Some(token) = classify(&value) {
        return AnyToken::Known(token);
    }
    match GenericToken::deserialize(&value) {
        Ok(generic) => AnyToken::Generic(generic),
        Err(_) => AnyToken::Unrecognized(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_every_leaf_kind() {
        let values = [
            json!({ "type": "br", "raw": "  \n" }),
            json!({ "type": "code", "raw": "```\nx\n```", "text": "x" }),
            json!({ "type": "codespan", "raw": "`x`", "text": "x" }),
            json!({ "type": "def", "raw": "[a]: /b", "tag": "a", "href": "/b", "title": "" }),
            json!({ "type": "escape", "raw": "\\*", "text": "*" }),
            json!({ "type": "hr", "raw": "---" }),
            json!({ "type": "html", "raw": "<b>", "text": "<b>", "block": false, "pre": false }),
            json!({ "type": "image", "raw": "![a](b)", "href": "b", "title": null, "text": "a" }),
            json!({ "type": "space", "raw": "\n\n" }),
            json!({ "type": "text", "raw": "x", "text": "x" }),
        ];

        for value in &values {
            assert!(is_token(value), "should classify: {}", value);
        }
    }

    #[test]
    fn test_rejects_missing_required_field() {
        // heading without depth
        let value = json!({ "type": "heading", "raw": "# a", "text": "a", "tokens": [] });
        assert!(!is_token(&value));
    }

    #[test]
    fn test_rejects_wrongly_typed_field() {
        let value = json!({ "type": "list", "raw": "- a", "ordered": "yes", "items": [] });
        assert!(!is_token(&value));
    }

    #[test]
    fn test_rejects_unknown_kind_and_non_objects() {
        assert!(!is_token(&json!({ "type": "footnote", "raw": "[^1]" })));
        assert!(!is_token(&json!("text")));
        assert!(!is_token(&json!(null)));
        assert!(!is_token(&json!({ "raw": "no discriminant" })));
    }

    #[test]
    fn test_narrow_sorts_into_open_union() {
        assert!(matches!(
            narrow(json!({ "type": "hr", "raw": "***" })),
            AnyToken::Known(Token::Hr { .. })
        ));
        assert!(matches!(
            narrow(json!({ "type": "mention", "raw": "@me" })),
            AnyToken::Generic(_)
        ));
        assert!(matches!(narrow(json!([1, 2])), AnyToken::Unrecognized(_)));
    }

    #[test]
    fn test_classify_on_any_token() {
        let known = AnyToken::from(Token::Space {
            raw: "\n".to_string(),
        });
        let unknown = AnyToken::Unrecognized(json!(7));

        assert_eq!(known.classify().map(Token::kind), Some("space"));
        assert!(unknown.classify().is_none());
    }
}
