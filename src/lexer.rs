//! Lexer trait definition
//!
//! A lexer turns source text into the token tree consumed by the
//! [`Transformer`](crate::transform::Transformer). Lexers are looked up by name through the
//! [`LexerRegistry`](registry::LexerRegistry).
//!
//! Built-in lexers:
//!
//! - [`markdown::MarkdownLexer`] (`markdown`): CommonMark plus GFM tables, strikethrough,
//!   autolinks and task lists, backed by comrak
//! - [`json::JsonTokenLexer`] (`tokens-json`): reads an already lexed token array from JSON

use crate::error::ConvertResult;
use crate::token::AnyToken;

pub mod json;
pub mod markdown;
pub mod registry;

pub use json::JsonTokenLexer;
pub use markdown::{MarkdownExtensions, MarkdownLexer};
pub use registry::LexerRegistry;

/// Trait for source lexers
///
/// # Examples
///
/// ```ignore
/// struct Shouting;
///
/// impl Lexer for Shouting {
///     fn name(&self) -> &str {
///         "shouting"
///     }
///
///     fn lex(&self, source: &str) -> ConvertResult<Vec<AnyToken>> {
///         // Cut `source` into tokens
///         todo!()
///     }
/// }
/// ```
pub trait Lexer: Send + Sync {
    /// Registry key of this lexer (e.g. "markdown")
    fn name(&self) -> &str;

    /// Optional description of this lexer
    fn description(&self) -> &str {
        ""
    }

    /// Cut source text into a top-level token sequence.
    fn lex(&self, source: &str) -> ConvertResult<Vec<AnyToken>>;
}
