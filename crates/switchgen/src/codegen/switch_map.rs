use super::utils::string_literal;
use crate::schema::{EnumEntry, effective_switch};

/// Serialize enum entries as a C# jagged array literal of
/// `{ name, effective switch }` rows.
///
/// Rows keep declaration order and are comma-joined on a single line between
/// the opening and closing lines of the array. The literal ends with a line
/// break, so the statement terminator that follows it lands on its own line.
pub(super) fn switch_map_literal(prefix: &str, entries: &[EnumEntry]) -> String {
    let rows: Vec<String> = entries
        .iter()
        .map(|entry| {
            let switch = effective_switch(prefix, entry.switch.as_deref());
            format!(
                r#"new string[2] {{ "{}", "{}" }}"#,
                string_literal(entry.name()),
                string_literal(&switch)
            )
        })
        .collect();

    format!(
        "new string[{}][] {{\n{}\n}}\n",
        entries.len(),
        rows.join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_order_and_compose_prefix() {
        let entries = [EnumEntry::new("O0", Some("")), EnumEntry::new("O2", Some("O2"))];
        assert_eq!(
            switch_map_literal("--", &entries),
            "new string[2][] {\n\
             new string[2] { \"O0\", \"\" },new string[2] { \"O2\", \"--O2\" }\n\
             }\n"
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let entries = [EnumEntry::new("A", Some("a")), EnumEntry::new("A", Some("a"))];
        let literal = switch_map_literal("/", &entries);
        assert!(literal.starts_with("new string[2][] {"));
        assert_eq!(literal.matches(r#"{ "A", "/a" }"#).count(), 2);
    }

    #[test]
    fn empty_table_still_renders() {
        assert_eq!(switch_map_literal("-", &[]), "new string[0][] {\n\n}\n");
    }
}
