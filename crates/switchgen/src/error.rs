use miette::{Diagnostic, SourceSpan};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Placeholder path used for schemas that were not read from disk
pub const MEMORY_ORIGIN: &str = "<memory>";

/// Errors that can occur during tool-switch code generation
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    /// IO error when reading schemas or writing generated source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse the rule schema XML
    #[error("Failed to parse rule schema {}", path.display())]
    #[diagnostic(
        code(switchgen::parse_error),
        help("Check that the rule file is well-formed XML")
    )]
    ParseError {
        #[source]
        source: quick_xml::Error,
        /// Path to the file that failed to parse
        path: PathBuf,
        /// Source text that failed to parse
        #[source_code]
        src: Option<String>,
        /// Location of the error in the source
        #[label("parse error here")]
        span: Option<SourceSpan>,
    },

    /// Document ended while an element was still open
    #[error("Unclosed element <{name}> in {}", path.display())]
    #[diagnostic(
        code(switchgen::unclosed_element),
        help("Every start tag needs a matching end tag before the end of the document")
    )]
    UnclosedElement {
        /// Qualified name of the innermost element left open
        name: String,
        path: PathBuf,
        #[source_code]
        src: Option<String>,
        #[label("document ends here")]
        span: Option<SourceSpan>,
    },

    /// Markup the XML parser accepts but a well-formed document forbids
    #[error("Malformed rule schema {}: {message}", path.display())]
    #[diagnostic(
        code(switchgen::malformed),
        help("A rule schema must be a single well-formed XML element tree")
    )]
    Malformed {
        message: String,
        path: PathBuf,
        #[source_code]
        src: Option<String>,
        #[label("malformed here")]
        span: Option<SourceSpan>,
    },

    /// Invalid configuration file
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(switchgen::config))]
    Config {
        message: String,
        /// Config file the problem was found in, if any
        path: Option<PathBuf>,
    },

    /// Input patterns resolved to nothing
    #[error("No rule schemas matched {pattern}")]
    #[diagnostic(
        code(switchgen::no_inputs),
        help("Pass a schema file, a directory containing .xml files, or a quoted glob")
    )]
    NoInputs { pattern: String },

    /// Generic error with context
    #[error("{message}")]
    #[diagnostic(code(switchgen::error))]
    Other {
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CodegenError {
    /// Create a parse error at a byte offset of the schema
    pub fn parse_error(source: quick_xml::Error, path: impl Into<PathBuf>, offset: u64) -> Self {
        Self::ParseError {
            source,
            path: path.into(),
            src: None,
            span: Some(point_span(offset)),
        }
    }

    /// Create an unclosed element error at a byte offset of the schema
    pub fn unclosed_element(name: impl Into<String>, path: impl Into<PathBuf>, offset: u64) -> Self {
        Self::UnclosedElement {
            name: name.into(),
            path: path.into(),
            src: None,
            span: Some(point_span(offset)),
        }
    }

    /// Create a well-formedness error at a byte offset of the schema
    pub fn malformed(message: impl Into<String>, path: impl Into<PathBuf>, offset: u64) -> Self {
        Self::Malformed {
            message: message.into(),
            path: path.into(),
            src: None,
            span: Some(point_span(offset)),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>, path: Option<impl Into<PathBuf>>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
        }
    }

    /// Attach the schema text so diagnostics can point into it
    pub fn with_source_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::ParseError {
                source, path, span, ..
            } => {
                let text = text.into();
                Self::ParseError {
                    source,
                    path,
                    span: span.map(|s| clamp_span(s, text.len())),
                    src: Some(text),
                }
            }
            Self::UnclosedElement {
                name, path, span, ..
            } => {
                let text = text.into();
                Self::UnclosedElement {
                    name,
                    path,
                    span: span.map(|s| clamp_span(s, text.len())),
                    src: Some(text),
                }
            }
            Self::Malformed {
                message, path, span, ..
            } => {
                let text = text.into();
                Self::Malformed {
                    message,
                    path,
                    span: span.map(|s| clamp_span(s, text.len())),
                    src: Some(text),
                }
            }
            other => other,
        }
    }

    /// Whether this error comes from malformed schema markup
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::ParseError { .. } | Self::UnclosedElement { .. } | Self::Malformed { .. }
        )
    }
}

fn point_span(offset: u64) -> SourceSpan {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    (offset, 0).into()
}

// quick-xml reports the position after the offending byte, which can sit at EOF
fn clamp_span(span: SourceSpan, len: usize) -> SourceSpan {
    (span.offset().min(len), 0).into()
}

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;
