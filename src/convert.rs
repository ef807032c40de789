//! Source text → ADF conversion facade
//!
//! A [`Converter`] ties a [`LexerRegistry`] to a [`Transformer`]: the source is lexed with the
//! selected lexer and the resulting top-level tokens are transformed without paragraph
//! conversion.

use crate::adf::{Document, Node};
use crate::config::{Loader, MdAdfConfig};
use crate::diagnostics::{DiagnosticSink, NullSink, TracingSink};
use crate::error::ConvertResult;
use crate::lexer::{LexerRegistry, MarkdownLexer};
use crate::transform::Transformer;
use tracing::debug;

#[derive(Debug)]
pub struct Converter<S = TracingSink> {
    registry: LexerRegistry,
    format: String,
    transformer: Transformer<S>,
}

impl Converter {
    /// Markdown converter with the built-in lexers, reporting through `tracing`.
    pub fn new() -> Self {
        Self {
            registry: LexerRegistry::with_defaults(),
            format: MarkdownLexer::NAME.to_string(),
            transformer: Transformer::new(),
        }
    }

    /// Converter set up from a loaded configuration.
    pub fn from_config(config: &MdAdfConfig) -> Converter<Box<dyn DiagnosticSink>> {
        let sink: Box<dyn DiagnosticSink> = if config.diagnostics.report_build_failures {
            Box::new(TracingSink)
        } else {
            Box::new(NullSink)
        };

        Converter {
            registry: LexerRegistry::from_config(&config.lexer),
            format: config.input.format.clone(),
            transformer: Transformer::with_sink(sink),
        }
    }

    pub fn from_loader(loader: Loader) -> ConvertResult<Converter<Box<dyn DiagnosticSink>>> {
        let config = loader.build()?;
        Ok(Self::from_config(&config))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticSink> Converter<S> {
    /// Swap the diagnostic sink, keeping lexers and input format.
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> Converter<T> {
        Converter {
            registry: self.registry,
            format: self.format,
            transformer: Transformer::with_sink(sink),
        }
    }

    /// Select the lexer used by [`Converter::convert`].
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn registry(&self) -> &LexerRegistry {
        &self.registry
    }

    /// Registry access for plugging in extra lexers.
    pub fn registry_mut(&mut self) -> &mut LexerRegistry {
        &mut self.registry
    }

    pub fn sink(&self) -> &S {
        self.transformer.sink()
    }

    /// Convert `source` with the configured input format.
    pub fn convert(&self, source: &str) -> ConvertResult<Vec<Node>> {
        self.convert_as(source, &self.format)
    }

    /// Convert `source` with the named lexer. An empty source is always empty output.
    pub fn convert_as(&self, source: &str, format: &str) -> ConvertResult<Vec<Node>> {
        if source.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = self.registry.lex(source, format)?;
        let nodes = self.transformer.transform(&tokens, false);
        debug!(
            format,
            tokens = tokens.len(),
            nodes = nodes.len(),
            "converted source"
        );
        Ok(nodes)
    }

    /// Convert `source` and wrap the blocks in a `doc` envelope.
    pub fn convert_document(&self, source: &str) -> ConvertResult<Document> {
        self.convert(source).map(Document::new)
    }
}
