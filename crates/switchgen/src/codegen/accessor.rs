use super::switch_map::switch_map_literal;
use super::utils::string_literal;
use super::{CodeGenerator, GetterStyle};
use crate::schema::{PropertyDeclaration, PropertyInfo, PropertyKind, effective_switch};
use std::fmt::Write;

const SETTER_INDENT: &str = "            ";

/// What the getter reads from the stored switch, and what it returns when
/// the property was never set
struct Getter {
    member: &'static str,
    default: &'static str,
}

impl Getter {
    fn for_kind(kind: PropertyKind, style: GetterStyle) -> Self {
        let (member, default) = match (style, kind) {
            (_, PropertyKind::StringList) => ("StringList", "null"),
            (GetterStyle::Typed, PropertyKind::Bool) => ("BooleanValue", "false"),
            (GetterStyle::Typed, PropertyKind::Int) => ("Number", "0"),
            (GetterStyle::Typed, PropertyKind::Enum) => ("Value", "null"),
            (GetterStyle::Verbatim, _) => ("StringList", "false"),
        };
        Self { member, default }
    }
}

/// One rendered accessor: shared getter/setter scaffolding around a
/// kind-specific block of setter statements
struct Accessor<'d> {
    info: &'d PropertyInfo,
    csharp_type: &'static str,
    switch_type: &'static str,
    getter: Getter,
    setup: Vec<String>,
    payload: &'static str,
}

impl Accessor<'_> {
    fn render(&self) -> String {
        let ident = self.info.name();
        let name = string_literal(ident);
        let mut out = String::new();

        let _ = write!(
            out,
            r#"    public virtual {ty} {ident}
    {{
        get
        {{
            if (IsPropertySet("{name}"))
            {{
                return base.ActiveToolSwitches["{name}"].{member};
            }}

            return {default};
        }}
        set
        {{
            base.ActiveToolSwitches.Remove("{name}");
            ToolSwitch toolSwitch = new ToolSwitch(ToolSwitchType.{switch_type});
            toolSwitch.DisplayName = "{display}";
            toolSwitch.Description = "{description}";
            toolSwitch.ArgumentRelationList = new ArrayList();
"#,
            ty = self.csharp_type,
            member = self.getter.member,
            default = self.getter.default,
            switch_type = self.switch_type,
            display = string_literal(self.info.display_name()),
            description = string_literal(self.info.description()),
        );

        for line in &self.setup {
            out.push_str(line);
            out.push('\n');
        }

        let _ = write!(
            out,
            r#"            toolSwitch.Name = "{name}";
            toolSwitch.{payload} = value;
            base.ActiveToolSwitches.Add("{name}", toolSwitch);
            AddActiveSwitchToolValue(toolSwitch);
        }}
    }}"#,
            payload = self.payload,
        );
        out
    }
}

fn switch_value(member: &str, switch: &str) -> String {
    format!(
        r#"{SETTER_INDENT}toolSwitch.{member} = "{}";"#,
        string_literal(switch)
    )
}

impl CodeGenerator {
    /// Render the accessor block for one property declaration.
    ///
    /// Pure: the output depends only on the declaration, the rule prefix and
    /// the generator options. The block has no trailing line break.
    pub fn render_property(&self, prefix: &str, property: &PropertyDeclaration) -> String {
        let getter = Getter::for_kind(property.kind(), self.options.getter_style);

        let accessor = match property {
            PropertyDeclaration::StringList { info, switch } => Accessor {
                info,
                csharp_type: "string[]",
                switch_type: "StringArray",
                getter,
                setup: vec![switch_value(
                    "SwitchValue",
                    &effective_switch(prefix, switch.as_deref()),
                )],
                payload: "StringList",
            },
            PropertyDeclaration::Bool {
                info,
                switch,
                reverse_switch,
            } => Accessor {
                info,
                csharp_type: "bool",
                switch_type: "Boolean",
                getter,
                setup: vec![
                    switch_value("SwitchValue", &effective_switch(prefix, switch.as_deref())),
                    switch_value(
                        "ReverseSwitchValue",
                        &effective_switch(prefix, reverse_switch.as_deref()),
                    ),
                ],
                payload: "BooleanValue",
            },
            PropertyDeclaration::Int { info, switch } => Accessor {
                info,
                csharp_type: "int",
                switch_type: "Integer",
                getter,
                setup: vec![
                    format!(
                        r#"{SETTER_INDENT}if (ValidateInteger("{}", int.MinValue, int.MaxValue, value))"#,
                        string_literal(info.name())
                    ),
                    format!("{SETTER_INDENT}{{"),
                    format!("{SETTER_INDENT}    toolSwitch.IsValid = true;"),
                    format!("{SETTER_INDENT}}}"),
                    format!("{SETTER_INDENT}else"),
                    format!("{SETTER_INDENT}{{"),
                    format!("{SETTER_INDENT}    toolSwitch.IsValid = false;"),
                    format!("{SETTER_INDENT}}}"),
                    switch_value("SwitchValue", &effective_switch(prefix, switch.as_deref())),
                ],
                payload: "Number",
            },
            PropertyDeclaration::Enum { info, values } => Accessor {
                info,
                csharp_type: "string",
                switch_type: "String",
                getter,
                setup: vec![
                    format!(
                        "{SETTER_INDENT}string[][] switchMap = {};",
                        switch_map_literal(prefix, values)
                    ),
                    format!(
                        r#"{SETTER_INDENT}toolSwitch.SwitchValue = ReadSwitchMap("{}", switchMap, value);"#,
                        string_literal(info.name())
                    ),
                ],
                payload: "Value",
            },
        };

        accessor.render()
    }
}
