//! Streaming reader for rule schema documents.
//!
//! [`RuleReader`] is a forward-only cursor over a schema. Callers first ask
//! for the rule with [`RuleReader::read_rule`], then pull property
//! declarations one at a time with [`RuleReader::next_property`]. Enum
//! entries are collected by a nested scan bounded to the enclosing
//! `EnumProperty`.

use crate::error::{CodegenError, MEMORY_ORIGIN, Result};
use crate::schema::{
    ENUM_VALUE_TAG, EnumEntry, PropertyDeclaration, PropertyInfo, PropertyKind, RULE_TAG,
    RuleDefinition, RuleSchema,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;
use std::path::PathBuf;

/// How far the property scan runs once the rule has been found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanScope {
    /// Keep dispatching property elements until the end of the document,
    /// regardless of where the rule closes
    #[default]
    Document,
    /// Stop dispatching at the rule's matching end tag
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Looking for the rule element
    Seeking,
    /// Dispatching properties; `rule_depth` is the depth of the rule element
    Properties { rule_depth: usize },
    /// Nothing more will be dispatched
    Finished,
}

/// A single element read from the document, with owned data
enum Node {
    Open(BytesStart<'static>),
    Empty(BytesStart<'static>),
    Close,
    Eof,
}

/// Forward-only reader over one rule schema document
pub struct RuleReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    origin: PathBuf,
    scope: ScanScope,
    phase: Phase,
    /// Qualified names of the currently open elements
    open: Vec<String>,
    /// Whether the root element has been opened
    seen_root: bool,
}

impl<'a> RuleReader<&'a [u8]> {
    /// Read a schema held in memory
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: BufRead> RuleReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            origin: PathBuf::from(MEMORY_ORIGIN),
            scope: ScanScope::default(),
            phase: Phase::Seeking,
            open: Vec::new(),
            seen_root: false,
        }
    }

    /// Path reported in errors
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_scope(mut self, scope: ScanScope) -> Self {
        self.scope = scope;
        self
    }

    /// Scan forward to the first `<Rule>` element.
    ///
    /// Returns `None` when the document has no rule; the rest of the
    /// document has been read (and checked) by then. Calling this again
    /// after the rule was found returns `None`.
    pub fn read_rule(&mut self) -> Result<Option<RuleDefinition>> {
        while self.phase == Phase::Seeking {
            match self.next_node()? {
                Node::Open(start) if start.name().as_ref() == RULE_TAG.as_bytes() => {
                    let rule = self.rule_definition(&start)?;
                    self.phase = Phase::Properties {
                        rule_depth: self.open.len(),
                    };
                    return Ok(Some(rule));
                }
                Node::Empty(start) if start.name().as_ref() == RULE_TAG.as_bytes() => {
                    let rule = self.rule_definition(&start)?;
                    // a childless rule still opens the document-wide scan
                    self.phase = match self.scope {
                        ScanScope::Document => Phase::Properties {
                            rule_depth: self.open.len(),
                        },
                        ScanScope::Rule => Phase::Finished,
                    };
                    return Ok(Some(rule));
                }
                Node::Eof => self.phase = Phase::Finished,
                _ => {}
            }
        }
        Ok(None)
    }

    /// Pull the next property declaration in document order.
    ///
    /// Unrecognized elements are skipped. Returns `None` once the scan is
    /// over; by then the remainder of the document has been read so that
    /// malformed markup after the last property still fails the pass.
    pub fn next_property(&mut self) -> Result<Option<PropertyDeclaration>> {
        loop {
            let Phase::Properties { rule_depth } = self.phase else {
                self.drain()?;
                return Ok(None);
            };

            match self.next_node()? {
                Node::Open(start) => {
                    if let Some(kind) = PropertyKind::from_tag(start.name().as_ref()) {
                        return self.declaration(kind, &start, true).map(Some);
                    }
                }
                Node::Empty(start) => {
                    if let Some(kind) = PropertyKind::from_tag(start.name().as_ref()) {
                        return self.declaration(kind, &start, false).map(Some);
                    }
                }
                Node::Close => {
                    if self.scope == ScanScope::Rule && self.open.len() < rule_depth {
                        tracing::trace!("rule closed, ending property scan");
                        self.phase = Phase::Finished;
                    }
                }
                Node::Eof => self.phase = Phase::Finished,
            }
        }
    }

    /// Read the rule and every property into memory
    pub fn read_schema(&mut self) -> Result<Option<RuleSchema>> {
        let Some(rule) = self.read_rule()? else {
            return Ok(None);
        };
        let mut properties = Vec::new();
        while let Some(property) = self.next_property()? {
            properties.push(property);
        }
        Ok(Some(RuleSchema { rule, properties }))
    }

    /// Read to the end of the document, checking structure along the way
    fn drain(&mut self) -> Result<()> {
        while !matches!(self.next_node()?, Node::Eof) {}
        Ok(())
    }

    fn declaration(
        &mut self,
        kind: PropertyKind,
        start: &BytesStart<'_>,
        has_children: bool,
    ) -> Result<PropertyDeclaration> {
        let info = PropertyInfo {
            name: self.attribute(start, "Name")?,
            display_name: self.attribute(start, "DisplayName")?,
            description: self.attribute(start, "Description")?,
        };
        tracing::debug!(kind = ?kind, name = info.name(), "dispatching property");

        let declaration = match kind {
            PropertyKind::StringList => PropertyDeclaration::StringList {
                info,
                switch: self.attribute(start, "Switch")?,
            },
            PropertyKind::Bool => PropertyDeclaration::Bool {
                info,
                switch: self.attribute(start, "Switch")?,
                reverse_switch: self.attribute(start, "ReverseSwitch")?,
            },
            PropertyKind::Int => PropertyDeclaration::Int {
                info,
                switch: self.attribute(start, "Switch")?,
            },
            PropertyKind::Enum => PropertyDeclaration::Enum {
                info,
                values: if has_children {
                    self.read_enum_entries()?
                } else {
                    Vec::new()
                },
            },
        };
        Ok(declaration)
    }

    /// Collect `EnumValue` elements up to the end of the enclosing
    /// `EnumProperty`, which must be the innermost open element.
    fn read_enum_entries(&mut self) -> Result<Vec<EnumEntry>> {
        let depth = self.open.len();
        let mut entries = Vec::new();

        loop {
            match self.next_node()? {
                Node::Open(start) | Node::Empty(start)
                    if start.name().as_ref() == ENUM_VALUE_TAG.as_bytes() =>
                {
                    entries.push(EnumEntry {
                        name: self.attribute(&start, "Name")?,
                        switch: self.attribute(&start, "Switch")?,
                    });
                }
                Node::Close if self.open.len() < depth => return Ok(entries),
                // next_node rejects EOF while the enum is still open
                Node::Eof => return Ok(entries),
                _ => {}
            }
        }
    }

    fn rule_definition(&self, start: &BytesStart<'_>) -> Result<RuleDefinition> {
        let rule = RuleDefinition {
            name: self.attribute(start, "Name")?,
            switch_prefix: self.attribute(start, "SwitchPrefix")?,
        };
        tracing::debug!(
            rule = rule.name.as_deref().unwrap_or_default(),
            prefix = rule.prefix(),
            "found rule"
        );
        Ok(rule)
    }

    fn attribute(&self, start: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
        let value = match start.try_get_attribute(key).map_err(quick_xml::Error::from) {
            Ok(Some(attr)) => attr
                .unescape_value()
                .map(|v| Some(v.into_owned()))
                .map_err(quick_xml::Error::from),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        value.map_err(|e| self.parse_error(e))
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn parse_error(&self, source: quick_xml::Error) -> CodegenError {
        CodegenError::parse_error(source, &self.origin, self.position())
    }

    fn malformed(&self, message: impl Into<String>) -> CodegenError {
        CodegenError::malformed(message, &self.origin, self.position())
    }

    /// Well-formedness checks quick-xml leaves to the caller: a single root
    /// element, well-formed attributes with valid references and no raw `<`
    fn check_start(&mut self, start: &BytesStart<'_>) -> Result<()> {
        if self.open.is_empty() {
            if self.seen_root {
                return Err(self.malformed(format!(
                    "second root element <{}>",
                    String::from_utf8_lossy(start.name().as_ref())
                )));
            }
            self.seen_root = true;
        }

        for attr in start.attributes() {
            let attr = attr
                .map_err(quick_xml::Error::from)
                .map_err(|e| self.parse_error(e))?;
            if attr.value.contains(&b'<') {
                return Err(self.malformed(format!(
                    "`<` in value of attribute {}",
                    String::from_utf8_lossy(attr.key.as_ref())
                )));
            }
            attr.unescape_value()
                .map_err(quick_xml::Error::from)
                .map_err(|e| self.parse_error(e))?;
        }
        Ok(())
    }

    /// Read events until the next element boundary, tracking open elements
    fn next_node(&mut self) -> Result<Node> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event.into_owned(),
                Err(e) => {
                    return Err(CodegenError::parse_error(
                        e,
                        &self.origin,
                        self.reader.error_position() as u64,
                    ));
                }
            };

            match event {
                Event::Start(start) => {
                    self.check_start(&start)?;
                    self.open
                        .push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                    return Ok(Node::Open(start));
                }
                Event::Empty(start) => {
                    self.check_start(&start)?;
                    return Ok(Node::Empty(start));
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(quick_xml::Error::from)
                        .map_err(|e| self.parse_error(e))?;
                    if self.open.is_empty() && !is_blank(&text) {
                        return Err(self.malformed("text outside the root element"));
                    }
                }
                Event::CData(_) if self.open.is_empty() => {
                    return Err(self.malformed("CDATA outside the root element"));
                }
                Event::End(_) => {
                    self.open.pop();
                    return Ok(Node::Close);
                }
                Event::Eof => {
                    if let Some(name) = self.open.last() {
                        return Err(CodegenError::unclosed_element(
                            name.clone(),
                            &self.origin,
                            self.position(),
                        ));
                    }
                    return Ok(Node::Eof);
                }
                // comments, declarations and processing instructions
                _ => {}
            }
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == '\u{feff}')
}
