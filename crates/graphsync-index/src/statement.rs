//! A Cypher statement with named parameter bindings.
//!
//! The Bolt adapter ships bindings out-of-band. The RedisGraph protocol
//! embeds literals in the query text, so [`Statement::render_inline`]
//! substitutes each `$name` placeholder through a single escaping routine.

use std::collections::BTreeMap;

use graphsync_core::Scalar;

/// Query text plus named `$name` bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    params: BTreeMap<String, Scalar>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind a named parameter.
    pub fn param(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &BTreeMap<String, Scalar> {
        &self.params
    }

    /// Render the statement with every bound parameter inlined as an
    /// escaped literal.
    ///
    /// The scan is a single left-to-right pass over the original text:
    /// substituted values are never rescanned, so a value that itself
    /// contains a `$name` sequence cannot trigger a second substitution.
    /// Unknown placeholders are left untouched.
    pub fn render_inline(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..end];
            match self.params.get(name) {
                Some(value) => out.push_str(&literal(value)),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[end..];
        }
        out.push_str(rest);
        out
    }
}

/// Render one scalar as a Cypher literal. Numbers and booleans are emitted
/// bare; strings are double-quoted with `\` and `"` escaped.
fn literal(value: &Scalar) -> String {
    match value {
        Scalar::Int(v) => v.to_string(),
        Scalar::Float(v) => format!("{v:?}"),
        Scalar::Bool(v) => v.to_string(),
        Scalar::Str(v) => quote(v),
    }
}

fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_rendering_substitutes_all_kinds() {
        let statement = Statement::new("CREATE (n:Person {udid: $udid, age: $age, score: $score, active: $active})")
            .param("udid", "1a2b")
            .param("age", 36_i64)
            .param("score", 9.5_f64)
            .param("active", true);
        assert_eq!(
            statement.render_inline(),
            r#"CREATE (n:Person {udid: "1a2b", age: 36, score: 9.5, active: true})"#
        );
    }

    #[test]
    fn test_quote_breaking_values_are_escaped() {
        let statement = Statement::new("MATCH (n {name: $name}) RETURN n.udid")
            .param("name", r#"Ada" }) MATCH (m) DELETE m //"#);
        assert_eq!(
            statement.render_inline(),
            r#"MATCH (n {name: "Ada\" }) MATCH (m) DELETE m //"}) RETURN n.udid"#
        );
    }

    #[test]
    fn test_backslashes_are_escaped() {
        let statement = Statement::new("MATCH (n {name: $name}) RETURN n.udid")
            .param("name", r"back\slash");
        assert_eq!(
            statement.render_inline(),
            r#"MATCH (n {name: "back\\slash"}) RETURN n.udid"#
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        // The value for $note contains the text "$udid"; it must survive
        // verbatim instead of being replaced by the udid binding.
        let statement = Statement::new("CREATE (n {udid: $udid, note: $note})")
            .param("udid", "1a2b")
            .param("note", "mentions $udid here");
        assert_eq!(
            statement.render_inline(),
            r#"CREATE (n {udid: "1a2b", note: "mentions $udid here"})"#
        );
    }

    #[test]
    fn test_unknown_placeholders_are_left_untouched() {
        let statement = Statement::new("MATCH (n {udid: $udid, other: $missing})")
            .param("udid", "1a2b");
        assert_eq!(
            statement.render_inline(),
            r#"MATCH (n {udid: "1a2b", other: $missing})"#
        );
    }

    #[test]
    fn test_placeholder_names_do_not_match_by_prefix() {
        let statement = Statement::new("MATCH (n {a: $udid, b: $udid2})")
            .param("udid", "1a2b")
            .param("udid2", "2b3c");
        assert_eq!(
            statement.render_inline(),
            r#"MATCH (n {a: "1a2b", b: "2b3c"})"#
        );
    }

    #[test]
    fn test_whole_float_keeps_decimal_point() {
        let statement = Statement::new("RETURN $v").param("v", 3.0_f64);
        assert_eq!(statement.render_inline(), "RETURN 3.0");
    }
}
