//! Markdown to Atlassian Document Format (ADF) conversion
//!
//!     This crate turns Markdown into the block-structured rich-text node tree used by issue
//!     trackers and wikis that store documents as ADF. Conversion is total and lossy: anything
//!     without an ADF counterpart, or whose converted content would not be well formed, is
//!     dropped, and the output is always a (possibly empty) list of top-level blocks.
//!
//! Architecture
//!
//!     Markdown string → Lexer → token tree → Transformer → ADF nodes
//!
//!     - Lexer trait: uniform interface for anything producing a token tree (see ./lexer.rs)
//!     - LexerRegistry: discovery and selection of lexers by name
//!     - Transformer: the token → node dispatch, with runtime shape checks before embedding
//!     - Converter: the facade tying a registry, an input format and a transformer together
//!
//!     This is a pure lib: it doesn't print, read env vars or touch files, apart from the
//!     configuration files a caller explicitly hands to the config [`Loader`](config::Loader).
//!     The only side channel is the diagnostic sink, which by default emits `tracing` events.
//!
//!     The file structure :
//!     .
//!     ├── adf.rs                  # Output node model
//!     │   ├── builders.rs         # Leaf and fixed-shape constructors
//!     │   └── shape.rs            # Content rules per composite kind
//!     ├── token.rs                # Input token model
//!     │   └── classify.rs         # Open union → known kind narrowing
//!     ├── lexer.rs                # Lexer trait
//!     │   ├── markdown.rs         # comrak-backed Markdown lexer
//!     │   ├── json.rs             # Pre-lexed JSON tokens
//!     │   └── registry.rs         # LexerRegistry
//!     ├── transform.rs            # Token → node conversion
//!     ├── diagnostics.rs          # Build failure reports and sinks
//!     ├── convert.rs              # Converter facade
//!     ├── config.rs               # Layered configuration
//!     └── error.rs
//!
//! Testing
//!     tests
//!     ├── markdown_to_adf.rs      # End to end scenarios
//!     ├── transform_tokens.rs     # Transformer over hand-written token trees
//!     ├── properties.rs           # proptest: totality, determinism, non-expansion
//!     └── snapshots               # insta snapshots of serialized documents

pub mod adf;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod token;
pub mod transform;

pub use adf::{Document, Mark, Node};
pub use convert::Converter;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use error::{ConvertError, ConvertResult};
pub use lexer::{Lexer, LexerRegistry, MarkdownLexer};
pub use token::{AnyToken, Token};
pub use transform::Transformer;

/// Convert Markdown into top-level ADF blocks.
///
/// The empty string converts to an empty list without being lexed.
pub fn markdown_to_document(markdown: &str) -> Vec<Node> {
    if markdown.is_empty() {
        return Vec::new();
    }

    let tokens = MarkdownLexer::new().tokenize(markdown);
    Transformer::new().transform(&tokens, false)
}

/// Convert Markdown into a complete `doc` envelope.
pub fn markdown_to_adf(markdown: &str) -> Document {
    Document::new(markdown_to_document(markdown))
}
