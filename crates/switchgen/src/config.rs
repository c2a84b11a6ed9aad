//! `switchgen.kdl` configuration.
//!
//! ```kdl
//! generator {
//!     scan-scope "document"
//!     getters "typed"
//! }
//! source "rules/*.xml"
//! output {
//!     dir "generated"
//!     extension "cs"
//! }
//! ```

use crate::codegen::GeneratorOptions;
use crate::error::{CodegenError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG: &str = "switchgen.kdl";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub generator: GeneratorOptions,
    /// Schema files, directories or glob patterns
    pub sources: Vec<String>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("generated"),
            extension: "cs".to_string(),
        }
    }
}

impl Config {
    /// Load a config file.
    ///
    /// With no explicit path, a missing `switchgen.kdl` means defaults; an
    /// explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG), false),
        };

        if !explicit && !path.exists() {
            tracing::debug!("no {DEFAULT_CONFIG} found, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        Self::from_kdl(&text).map_err(|e| match e {
            CodegenError::Config { message, .. } => CodegenError::Config {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })
    }

    pub fn from_kdl(text: &str) -> Result<Self> {
        let doc = text
            .parse::<kdl::KdlDocument>()
            .map_err(|e| config_error(format!("Failed to parse KDL: {e}")))?;

        let mut config = Config::default();
        let mut seen_generator = false;

        for node in doc.nodes() {
            match node.name().value() {
                "generator" => {
                    if seen_generator {
                        return Err(config_error("Multiple generator blocks found"));
                    }
                    seen_generator = true;
                    config.generator = parse_generator(node)?;
                }
                "source" => {
                    config.sources.push(string_arg(node, "source")?);
                }
                "output" => {
                    if config.output.is_some() {
                        return Err(config_error("Multiple output blocks found"));
                    }
                    config.output = Some(parse_output(node)?);
                }
                other => {
                    return Err(config_error(format!("Unknown config node: {other}")));
                }
            }
        }

        Ok(config)
    }
}

fn config_error(message: impl Into<String>) -> CodegenError {
    CodegenError::config(message, None::<PathBuf>)
}

fn string_arg(node: &kdl::KdlNode, what: &str) -> Result<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| config_error(format!("{what} expects a string value")))
}

fn parse_generator(node: &kdl::KdlNode) -> Result<GeneratorOptions> {
    let mut options = GeneratorOptions::default();
    let Some(children) = node.children() else {
        return Ok(options);
    };

    for child in children.nodes() {
        match child.name().value() {
            "scan-scope" => {
                options.scan_scope = string_arg(child, "scan-scope")?.parse()?;
            }
            "getters" => {
                options.getter_style = string_arg(child, "getters")?.parse()?;
            }
            other => {
                return Err(config_error(format!("Unknown generator field: {other}")));
            }
        }
    }

    Ok(options)
}

fn parse_output(node: &kdl::KdlNode) -> Result<OutputConfig> {
    let mut output = OutputConfig::default();
    let Some(children) = node.children() else {
        return Ok(output);
    };

    for child in children.nodes() {
        match child.name().value() {
            "dir" => output.dir = PathBuf::from(string_arg(child, "dir")?),
            "extension" => {
                output.extension = string_arg(child, "extension")?
                    .trim_start_matches('.')
                    .to_string();
            }
            other => {
                return Err(config_error(format!("Unknown output field: {other}")));
            }
        }
    }

    Ok(output)
}
