//! Rule declarations and their BUILD file syntax.
//!
//! A [`Rule`] is plain data: a rule kind plus an ordered list of attributes.
//! Formatting it produces the text written to the BUILD file:
//!
//! ```text
//! cc_library(
//!     name = "bar",
//!     srcs = ["bar.cc"],
//!     testonly = False,
//! )
//! ```

use std::fmt::{self, Display, Formatter};

use crate::translate::rules::RuleKind;

const INDENT: &str = "    ";

/// Value of one rule attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// A string literal
    Str(String),
    /// A list of string literals
    List(Vec<String>),
    /// `True` or `False`
    Bool(bool),
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => write_quoted(f, s),
            AttrValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, item)?;
                }
                f.write_str("]")
            }
            AttrValue::Bool(true) => f.write_str("True"),
            AttrValue::Bool(false) => f.write_str("False"),
        }
    }
}

/// One rule declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    kind: RuleKind,
    attrs: Vec<(&'static str, AttrValue)>,
}

impl Rule {
    /// Start a rule with its `name` attribute.
    pub fn new(kind: RuleKind, name: impl Into<String>) -> Self {
        Rule {
            kind,
            attrs: vec![("name", AttrValue::Str(name.into()))],
        }
    }

    /// Append a string attribute.
    pub fn string(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, AttrValue::Str(value.into())));
        self
    }

    /// Append a list attribute.
    pub fn list(mut self, key: &'static str, values: Vec<String>) -> Self {
        self.attrs.push((key, AttrValue::List(values)));
        self
    }

    /// Append a list attribute only when it has entries.
    pub fn list_if_any(self, key: &'static str, values: Vec<String>) -> Self {
        if values.is_empty() {
            self
        } else {
            self.list(key, values)
        }
    }

    /// Append a boolean attribute.
    pub fn boolean(mut self, key: &'static str, value: bool) -> Self {
        self.attrs.push((key, AttrValue::Bool(value)));
        self
    }

    /// The rule kind.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Look up a list attribute.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key) {
            Some(AttrValue::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Look up a string attribute.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}(", self.kind)?;
        for (key, value) in &self.attrs {
            writeln!(f, "{}{} = {},", INDENT, key, value)?;
        }
        writeln!(f, ")")
    }
}

/// Write a double-quoted Starlark string literal.
fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rule() {
        let rule = Rule::new(RuleKind::CcLibrary, "bar")
            .list("srcs", vec!["bar.cc".into(), "util.cc".into()])
            .list("deps", Vec::new())
            .boolean("testonly", false);

        let expected = concat!(
            "cc_library(\n",
            "    name = \"bar\",\n",
            "    srcs = [\"bar.cc\", \"util.cc\"],\n",
            "    deps = [],\n",
            "    testonly = False,\n",
            ")\n",
        );
        assert_eq!(rule.to_string(), expected);
    }

    #[test]
    fn test_quoting() {
        let value = AttrValue::Str(r#"echo "hi" \ there"#.to_string());
        assert_eq!(value.to_string(), r#""echo \"hi\" \\ there""#);
        assert_eq!(AttrValue::Bool(true).to_string(), "True");
    }

    #[test]
    fn test_list_if_any() {
        let rule = Rule::new(RuleKind::CcBinary, "app")
            .list_if_any("cxxopts", Vec::new())
            .list_if_any("conlyopts", vec!["-std=c11".into()]);

        assert!(rule.get("cxxopts").is_none());
        assert_eq!(rule.get_list("conlyopts").unwrap(), ["-std=c11"]);
        assert_eq!(rule.get_str("name"), Some("app"));
        assert_eq!(
            rule.to_string(),
            "cc_binary(\n    name = \"app\",\n    conlyopts = [\"-std=c11\"],\n)\n"
        );
    }
}
