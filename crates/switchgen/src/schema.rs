//! Data model for MSBuild-style rule schemas.
//!
//! Only the parts of a rule file that feed code generation are modelled: the
//! rule's switch prefix and its four property kinds. Every attribute is
//! optional; an absent attribute and an empty one render identically.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// XML tag of the rule element
pub const RULE_TAG: &str = "Rule";
/// XML tag of an enum entry inside an `EnumProperty`
pub const ENUM_VALUE_TAG: &str = "EnumValue";

/// The first `<Rule>` of a schema document.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub name: Option<String>,
    pub switch_prefix: Option<String>,
}

impl RuleDefinition {
    /// Prefix composed onto every non-empty switch
    pub fn prefix(&self) -> &str {
        self.switch_prefix.as_deref().unwrap_or_default()
    }
}

/// Property element kinds recognized under a rule
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum PropertyKind {
    StringList,
    Bool,
    Int,
    Enum,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 4] = [
        PropertyKind::StringList,
        PropertyKind::Bool,
        PropertyKind::Int,
        PropertyKind::Enum,
    ];

    /// Qualified XML tag declaring a property of this kind
    pub fn tag(self) -> &'static str {
        match self {
            PropertyKind::StringList => "StringListProperty",
            PropertyKind::Bool => "BoolProperty",
            PropertyKind::Int => "IntProperty",
            PropertyKind::Enum => "EnumProperty",
        }
    }

    /// Look up the kind declared by an element tag
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag().as_bytes() == tag)
    }
}

/// Attributes shared by every property kind
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl PropertyInfo {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// One `<EnumValue>` of an enum property, in declaration order
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct EnumEntry {
    pub name: Option<String>,
    pub switch: Option<String>,
}

impl EnumEntry {
    pub fn new(name: impl Into<String>, switch: Option<&str>) -> Self {
        Self {
            name: Some(name.into()),
            switch: switch.map(str::to_owned),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// A property declaration found under the rule.
///
/// Switches are stored raw; the rule prefix is applied at render time with
/// [`effective_switch`].
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyDeclaration {
    StringList {
        #[serde(flatten)]
        info: PropertyInfo,
        switch: Option<String>,
    },
    Bool {
        #[serde(flatten)]
        info: PropertyInfo,
        switch: Option<String>,
        #[serde(rename = "reverseSwitch")]
        reverse_switch: Option<String>,
    },
    Int {
        #[serde(flatten)]
        info: PropertyInfo,
        switch: Option<String>,
    },
    Enum {
        #[serde(flatten)]
        info: PropertyInfo,
        values: Vec<EnumEntry>,
    },
}

impl PropertyDeclaration {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyDeclaration::StringList { .. } => PropertyKind::StringList,
            PropertyDeclaration::Bool { .. } => PropertyKind::Bool,
            PropertyDeclaration::Int { .. } => PropertyKind::Int,
            PropertyDeclaration::Enum { .. } => PropertyKind::Enum,
        }
    }

    pub fn info(&self) -> &PropertyInfo {
        match self {
            PropertyDeclaration::StringList { info, .. }
            | PropertyDeclaration::Bool { info, .. }
            | PropertyDeclaration::Int { info, .. }
            | PropertyDeclaration::Enum { info, .. } => info,
        }
    }

    pub fn name(&self) -> &str {
        self.info().name()
    }
}

/// A whole rule and its properties, collected for inspection
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct RuleSchema {
    pub rule: RuleDefinition,
    pub properties: Vec<PropertyDeclaration>,
}

/// Compose a raw switch with the rule prefix.
///
/// An absent or empty switch yields an empty string; the prefix alone is
/// never emitted.
pub fn effective_switch(prefix: &str, raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => format!("{prefix}{raw}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_composed_onto_present_switches() {
        assert_eq!(effective_switch("-", Some("v")), "-v");
        assert_eq!(effective_switch("--", Some("O2")), "--O2");
        assert_eq!(effective_switch("", Some("v")), "v");
    }

    #[test]
    fn absent_switch_never_yields_bare_prefix() {
        assert_eq!(effective_switch("-", None), "");
        assert_eq!(effective_switch("-", Some("")), "");
        assert_eq!(effective_switch("", None), "");
    }

    #[test]
    fn kinds_round_trip_through_tags() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_tag(kind.tag().as_bytes()), Some(kind));
        }
        assert_eq!(PropertyKind::from_tag(b"StringProperty"), None);
        assert_eq!(PropertyKind::from_tag(b"Rule"), None);
    }

    #[test]
    fn missing_prefix_defaults_to_empty() {
        assert_eq!(RuleDefinition::default().prefix(), "");
    }

    #[test]
    fn declarations_serialize_with_kind_tag() {
        let decl = PropertyDeclaration::Bool {
            info: PropertyInfo {
                name: Some("Verbose".into()),
                display_name: None,
                description: None,
            },
            switch: Some("v".into()),
            reverse_switch: Some("q".into()),
        };
        let json = serde_json::to_value(&decl).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "bool",
                "name": "Verbose",
                "switch": "v",
                "reverseSwitch": "q",
            })
        );
    }
}
