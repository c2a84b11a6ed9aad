use std::fs;
use std::path::{Path, PathBuf};
use switchgen::codegen::{CodeGenerator, GeneratorOptions, GetterStyle};
use switchgen::error::CodegenError;
use switchgen::reader::{RuleReader, ScanScope};
use switchgen::schema::PropertyKind;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn generate(name: &str, options: GeneratorOptions) -> Result<String, CodegenError> {
    let mut out = Vec::new();
    CodeGenerator::new(options).generate_file(fixture(name), &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

fn verbatim() -> GeneratorOptions {
    GeneratorOptions {
        getter_style: GetterStyle::Verbatim,
        ..Default::default()
    }
}

#[test]
fn bool_switch_and_reverse_switch_get_prefix() {
    let out = generate("verbose.xml", GeneratorOptions::default()).expect("generate");

    assert!(out.starts_with("    public virtual bool Verbose\n"));
    assert!(out.contains("new ToolSwitch(ToolSwitchType.Boolean);"));
    assert!(out.contains(r#"            toolSwitch.SwitchValue = "-v";"#));
    assert!(out.contains(r#"            toolSwitch.ReverseSwitchValue = "-q";"#));
    assert!(out.contains("            toolSwitch.BooleanValue = value;"));
    assert!(out.contains(r#"            base.ActiveToolSwitches.Add("Verbose", toolSwitch);"#));
}

#[test]
fn enum_matches_reference_accessor_verbatim() {
    let out = generate("optimize.xml", verbatim()).expect("generate");
    let expected = fs::read_to_string(fixture("optimize.verbatim.cs")).expect("read reference");
    assert_eq!(out, expected);
}

#[test]
fn compiler_rule_emits_accessors_in_document_order() {
    let out = generate("cl.xml", GeneratorOptions::default()).expect("generate");

    let headers: Vec<&str> = out
        .lines()
        .filter(|line| line.starts_with("    public virtual "))
        .collect();
    assert_eq!(
        headers,
        [
            "    public virtual string[] AdditionalIncludeDirectories",
            "    public virtual bool Verbose",
            "    public virtual int ErrorLimit",
            "    public virtual string OptimizationLevel",
            "    public virtual bool Exceptions",
        ]
    );

    // StringProperty is not a recognized kind
    assert!(!out.contains("ObjectFileName"));

    assert!(out.contains(r#"toolSwitch.SwitchValue = "-I";"#));
    assert!(out.contains(r#"toolSwitch.SwitchValue = "-ferror-limit=";"#));
    assert!(out.contains(r#"new string[2] { "Os", "-Os" }"#));
    assert!(out.contains(r#"toolSwitch.ReverseSwitchValue = "-fno-exceptions";"#));
    assert!(out.contains(r#"toolSwitch.Description = "Enable \"-fexceptions\" style unwinding.";"#));
}

#[test]
fn summary_reports_rule_and_kinds() {
    let mut out = Vec::new();
    let summary = CodeGenerator::default()
        .generate_file(fixture("cl.xml"), &mut out)
        .expect("generate");

    assert_eq!(summary.rule.as_deref(), Some("EmCC"));
    assert_eq!(summary.properties.get(&PropertyKind::StringList), Some(&1));
    assert_eq!(summary.properties.get(&PropertyKind::Bool), Some(&2));
    assert_eq!(summary.properties.get(&PropertyKind::Int), Some(&1));
    assert_eq!(summary.properties.get(&PropertyKind::Enum), Some(&1));
    assert_eq!(summary.total(), 5);
}

#[test]
fn string_list_without_switch_has_empty_switch_value() {
    let out = CodeGenerator::default()
        .generate_str(r#"<Rule SwitchPrefix="/"><StringListProperty Name="Defines"/></Rule>"#)
        .expect("generate");
    assert!(out.contains(r#"            toolSwitch.SwitchValue = "";"#));
    assert!(!out.contains(r#""/""#));
}

#[test]
fn no_rule_generates_nothing() {
    let out = generate("no_rule.xml", GeneratorOptions::default()).expect("generate");
    assert!(out.is_empty());
}

#[test]
fn rule_without_recognized_properties_generates_nothing() {
    let out = generate("empty_rule.xml", GeneratorOptions::default()).expect("generate");
    assert!(out.is_empty());
}

#[test]
fn document_scope_reaches_later_rules_with_first_prefix() {
    let out = generate("two_rules.xml", GeneratorOptions::default()).expect("generate");
    assert!(out.contains("public virtual bool Verbose"));
    assert!(out.contains("public virtual bool Incremental"));
    assert!(out.contains(r#"toolSwitch.SwitchValue = "-INCREMENTAL";"#));
}

#[test]
fn rule_scope_stops_at_rule_end() {
    let options = GeneratorOptions {
        scan_scope: ScanScope::Rule,
        ..Default::default()
    };
    let out = generate("two_rules.xml", options).expect("generate");
    assert!(out.contains("public virtual bool Verbose"));
    assert!(!out.contains("Incremental"));
}

#[test]
fn generation_is_deterministic() {
    let first = generate("cl.xml", GeneratorOptions::default()).expect("first pass");
    let second = generate("cl.xml", GeneratorOptions::default()).expect("second pass");
    assert_eq!(first, second);
}

#[test]
fn unterminated_document_fails() {
    let err = generate("unterminated.xml", GeneratorOptions::default()).expect_err("malformed");
    assert!(err.is_structural());
    match err {
        CodegenError::UnclosedElement { path, .. } => {
            assert!(path.ends_with("unterminated.xml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn inspect_schema_serializes_declarations() {
    let text = fs::read_to_string(fixture("optimize.xml")).expect("read fixture");
    let schema = RuleReader::from_text(&text)
        .read_schema()
        .expect("read schema")
        .expect("rule present");

    let json = serde_json::to_value(&schema).expect("serialize");
    let property = &json["properties"][0];
    assert_eq!(property["kind"], "enum");
    assert_eq!(property["name"], "Optimize");
    assert_eq!(property["values"].as_array().map(Vec::len), Some(2));
}

#[test]
fn batch_writes_every_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inputs = [fixture("verbose.xml"), fixture("optimize.xml"), fixture("no_rule.xml")];

    let written = CodeGenerator::default()
        .write_to_disk(&inputs, dir.path(), "g.cs")
        .expect("write to disk");

    assert_eq!(written.len(), 3);
    let verbose = fs::read_to_string(dir.path().join("verbose.g.cs")).expect("read verbose");
    assert!(verbose.contains("public virtual bool Verbose"));
    let no_rule = fs::read_to_string(dir.path().join("no_rule.g.cs")).expect("read no_rule");
    assert!(no_rule.is_empty());
    assert!(!written[2].summary.rule_found);
}

#[test]
fn malformed_markup_never_generates() {
    let inputs = [
        r#"<Rule SwitchPrefix="-"><BoolProperty Name="A" Switch="a"/></Rule><Rule/>"#,
        r#"<Rule SwitchPrefix="-">a & b <BoolProperty Name="A" Switch="a"/></Rule>"#,
        r#"junk<Rule SwitchPrefix="-"><BoolProperty Name="A" Switch="a"/></Rule>"#,
        r#"<Rule SwitchPrefix="-"><BoolProperty Name="A<" Switch="a"/></Rule>"#,
    ];
    for input in inputs {
        let err = CodeGenerator::default()
            .generate_str(input)
            .expect_err(input);
        assert!(err.is_structural(), "{input}: {err:?}");
    }
}
