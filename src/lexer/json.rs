//! Pre-lexed token input
//!
//! Accepts a JSON array of tokens, as produced by a lexer running elsewhere. Each element goes
//! through the classifier, so unknown or malformed elements are kept as opaque tokens and
//! dropped later by the transformer. Only malformed JSON, or a root that isn't an array, is an
//! error.

use super::Lexer;
use crate::error::ConvertResult;
use crate::token::AnyToken;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTokenLexer;

impl JsonTokenLexer {
    pub const NAME: &'static str = "tokens-json";
}

impl Lexer for JsonTokenLexer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "JSON array of already lexed tokens"
    }

    fn lex(&self, source: &str) -> ConvertResult<Vec<AnyToken>> {
        Ok(serde_json::from_str(source)?)
    }
}
