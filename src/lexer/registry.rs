//! Lexer registry for lexer discovery and selection
//!
//! Lexers are registered and retrieved by name. The converter looks up its input format here.

use super::{JsonTokenLexer, Lexer, MarkdownExtensions, MarkdownLexer};
use crate::config::LexerConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::token::AnyToken;
use std::collections::HashMap;
use std::fmt;

/// Registry of source lexers
///
/// # Examples
///
/// ```ignore
/// let registry = LexerRegistry::with_defaults();
/// let tokens = registry.lex("# Title", "markdown")?;
/// ```
pub struct LexerRegistry {
    lexers: HashMap<String, Box<dyn Lexer>>,
}

impl LexerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        LexerRegistry {
            lexers: HashMap::new(),
        }
    }

    /// Register a lexer, replacing any lexer already registered under the same name.
    pub fn register<L: Lexer + 'static>(&mut self, lexer: L) {
        self.lexers.insert(lexer.name().to_string(), Box::new(lexer));
    }

    pub fn get(&self, name: &str) -> ConvertResult<&dyn Lexer> {
        self.lexers
            .get(name)
            .map(|lexer| lexer.as_ref())
            .ok_or_else(|| ConvertError::LexerNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.lexers.contains_key(name)
    }

    /// All registered lexer names (sorted)
    pub fn list_lexers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.lexers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Lex source text with the named lexer
    pub fn lex(&self, source: &str, name: &str) -> ConvertResult<Vec<AnyToken>> {
        self.get(name)?.lex(source)
    }

    /// Registry with the built-in lexers, Markdown using every GFM extension.
    pub fn with_defaults() -> Self {
        Self::with_markdown(MarkdownLexer::new())
    }

    /// Registry with the built-in lexers, Markdown extensions taken from configuration.
    pub fn from_config(config: &LexerConfig) -> Self {
        Self::with_markdown(MarkdownLexer::with_extensions(MarkdownExtensions::from(
            config,
        )))
    }

    fn with_markdown(markdown: MarkdownLexer) -> Self {
        let mut registry = Self::new();
        registry.register(markdown);
        registry.register(JsonTokenLexer);
        registry
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for LexerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexerRegistry")
            .field("lexers", &self.list_lexers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    struct HrLexer;
    impl Lexer for HrLexer {
        fn name(&self) -> &str {
            "hr"
        }
        fn description(&self) -> &str {
            "Every line is a rule"
        }
        fn lex(&self, source: &str) -> ConvertResult<Vec<AnyToken>> {
            Ok(source
                .lines()
                .map(|line| {
                    Token::Hr {
                        raw: line.to_string(),
                    }
                    .into()
                })
                .collect())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = LexerRegistry::new();
        assert!(registry.list_lexers().is_empty());
    }

    #[test]
    fn test_registry_register_and_lex() {
        let mut registry = LexerRegistry::new();
        registry.register(HrLexer);

        assert!(registry.has("hr"));
        assert_eq!(registry.get("hr").unwrap().description(), "Every line is a rule");
        assert_eq!(registry.lex("a\nb", "hr").unwrap().len(), 2);
    }

    #[test]
    fn test_registry_lex_not_found() {
        let registry = LexerRegistry::new();
        match registry.lex("input", "nonexistent").unwrap_err() {
            ConvertError::LexerNotFound(name) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected LexerNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = LexerRegistry::default();
        assert_eq!(registry.list_lexers(), vec!["markdown", "tokens-json"]);
    }

    #[test]
    fn test_registry_from_config() {
        let config = LexerConfig {
            table: false,
            ..LexerConfig::default()
        };
        let registry = LexerRegistry::from_config(&config);
        let tokens = registry.lex("| a |\n|---|\n| 1 |\n", "markdown").unwrap();
        assert_eq!(tokens[0].kind(), Some("paragraph"));
    }

    #[test]
    fn test_registry_replace_lexer() {
        let mut registry = LexerRegistry::new();
        registry.register(HrLexer);
        registry.register(HrLexer);

        assert_eq!(registry.list_lexers().len(), 1);
    }
}
