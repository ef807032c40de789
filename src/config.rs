//! Configuration loader.
//!
//! `defaults/mdadf.default.toml` is embedded into the library so that docs and runtime
//! behavior stay in sync. Callers layer their own files and overrides on top via [`Loader`]
//! before deserializing into [`MdAdfConfig`].

use crate::lexer::MarkdownExtensions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/mdadf.default.toml");

/// Top-level configuration of a converter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MdAdfConfig {
    pub input: InputConfig,
    pub lexer: LexerConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputConfig {
    /// Name of the registered lexer reading the source.
    pub format: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: "markdown".to_string(),
        }
    }
}

/// GFM extensions of the Markdown lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LexerConfig {
    pub table: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        let extensions = MarkdownExtensions::default();
        Self {
            table: extensions.table,
            strikethrough: extensions.strikethrough,
            autolink: extensions.autolink,
            tasklist: extensions.tasklist,
        }
    }
}

impl From<&LexerConfig> for MarkdownExtensions {
    fn from(config: &LexerConfig) -> Self {
        MarkdownExtensions {
            table: config.table,
            strikethrough: config.strikethrough,
            autolink: config.autolink,
            tasklist: config.tasklist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiagnosticsConfig {
    pub report_build_failures: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report_build_failures: true,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `("lexer.table", false)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdAdfConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdAdfConfig, ConfigError> {
    Loader::new().build()
}
