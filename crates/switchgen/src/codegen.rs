//! Accessor generation for rule schemas.
//!
//! [`CodeGenerator::generate`] drives a [`RuleReader`] and writes one
//! accessor block per property as soon as the reader yields it. Rendering
//! itself lives in [`CodeGenerator::render_property`] and never touches the
//! document.

use crate::error::{CodegenError, Result};
use crate::reader::{RuleReader, ScanScope};
use crate::schema::PropertyKind;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

mod accessor;
mod output;
mod switch_map;
mod utils;

pub use output::GeneratedFile;

/// Which stored member a getter returns, and its unset default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GetterStyle {
    /// Kind-correct getters: `BooleanValue`/`false`, `Number`/`0`,
    /// `Value`/`null`
    #[default]
    Typed,
    /// Every getter reads `StringList` and non-list kinds default to
    /// `false`, as the legacy accessor templates do
    Verbatim,
}

impl FromStr for GetterStyle {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "typed" => Ok(Self::Typed),
            "verbatim" => Ok(Self::Verbatim),
            other => Err(CodegenError::config(
                format!("unknown getter style `{other}`, expected `typed` or `verbatim`"),
                None::<&Path>,
            )),
        }
    }
}

impl FromStr for ScanScope {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "document" => Ok(Self::Document),
            "rule" => Ok(Self::Rule),
            other => Err(CodegenError::config(
                format!("unknown scan scope `{other}`, expected `document` or `rule`"),
                None::<&Path>,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorOptions {
    pub scan_scope: ScanScope,
    pub getter_style: GetterStyle,
}

/// Counts from one generation pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationSummary {
    /// Name of the rule that was found, if any
    pub rule: Option<String>,
    pub rule_found: bool,
    pub properties: BTreeMap<PropertyKind, usize>,
}

impl GenerationSummary {
    pub fn total(&self) -> usize {
        self.properties.values().sum()
    }
}

/// Code generator for tool-switch accessors
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    options: GeneratorOptions,
}

impl CodeGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Run one pass over a schema, writing accessor blocks to `sink` in
    /// document order, each followed by a line break.
    ///
    /// A document without a rule, or a rule without recognized properties,
    /// writes nothing and succeeds.
    pub fn generate<R: BufRead, W: Write>(
        &self,
        reader: RuleReader<R>,
        sink: &mut W,
    ) -> Result<GenerationSummary> {
        let mut reader = reader.with_scope(self.options.scan_scope);
        let mut summary = GenerationSummary::default();

        let Some(rule) = reader.read_rule()? else {
            tracing::debug!("no rule element found");
            return Ok(summary);
        };
        summary.rule_found = true;
        let prefix = rule.prefix();

        while let Some(property) = reader.next_property()? {
            let block = self.render_property(prefix, &property);
            writeln!(sink, "{block}")?;
            *summary.properties.entry(property.kind()).or_default() += 1;
        }
        sink.flush()?;

        summary.rule = rule.name;
        Ok(summary)
    }

    /// Generate accessors for a schema held in memory
    pub fn generate_str(&self, text: &str) -> Result<String> {
        let mut out = Vec::new();
        self.generate(RuleReader::from_text(text), &mut out)
            .map_err(|e| e.with_source_text(text))?;
        String::from_utf8(out).map_err(|e| CodegenError::Other {
            message: "generated source is not valid UTF-8".into(),
            source: Some(Box::new(e)),
        })
    }

    /// Generate accessors for a schema file
    pub fn generate_file<W: Write>(
        &self,
        path: impl AsRef<Path>,
        sink: &mut W,
    ) -> Result<GenerationSummary> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let reader = RuleReader::from_text(&text).with_origin(path);

        let summary = self
            .generate(reader, sink)
            .map_err(|e| e.with_source_text(text.as_str()))?;
        tracing::info!(
            path = %path.display(),
            rule = summary.rule.as_deref().unwrap_or_default(),
            properties = summary.total(),
            "generated accessors"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERBOSE: &str = r#"<Rule Name="Tool" SwitchPrefix="-">
        <BoolProperty Name="Verbose" Switch="v" ReverseSwitch="q"/>
    </Rule>"#;

    #[test]
    fn blocks_are_newline_terminated() {
        let out = CodeGenerator::default().generate_str(VERBOSE).expect("generate");
        assert!(out.starts_with("    public virtual bool Verbose\n"));
        assert!(out.ends_with("    }\n"));
        assert!(out.contains(r#""-v""#));
        assert!(out.contains(r#""-q""#));
    }

    #[test]
    fn summary_counts_properties_by_kind() {
        let mut out = Vec::new();
        let summary = CodeGenerator::default()
            .generate(
                RuleReader::from_text(
                    r#"<Rule Name="CL">
                         <BoolProperty Name="A"/><BoolProperty Name="B"/>
                         <EnumProperty Name="C"><EnumValue Name="x"/></EnumProperty>
                       </Rule>"#,
                ),
                &mut out,
            )
            .expect("generate");
        assert!(summary.rule_found);
        assert_eq!(summary.rule.as_deref(), Some("CL"));
        assert_eq!(summary.properties.get(&PropertyKind::Bool), Some(&2));
        assert_eq!(summary.properties.get(&PropertyKind::Enum), Some(&1));
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn missing_rule_writes_nothing() {
        let mut out = Vec::new();
        let summary = CodeGenerator::default()
            .generate(RuleReader::from_text("<Project><BoolProperty Name=\"X\"/></Project>"), &mut out)
            .expect("generate");
        assert!(!summary.rule_found);
        assert!(out.is_empty());
    }

    #[test]
    fn option_names_parse() {
        assert_eq!("rule".parse::<ScanScope>().unwrap(), ScanScope::Rule);
        assert_eq!("document".parse::<ScanScope>().unwrap(), ScanScope::Document);
        assert_eq!("verbatim".parse::<GetterStyle>().unwrap(), GetterStyle::Verbatim);
        assert!("loose".parse::<GetterStyle>().is_err());
    }

    #[test]
    fn malformed_input_keeps_source_for_diagnostics() {
        let err = CodeGenerator::default()
            .generate_str("<Rule><BoolProperty Name=\"X\">")
            .expect_err("unclosed");
        match err {
            CodegenError::UnclosedElement { name, src, .. } => {
                assert_eq!(name, "BoolProperty");
                assert!(src.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
