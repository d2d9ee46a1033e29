//! Command-line flags for the external renderer.
//!
//! Flags are kept in insertion order so the generated argument string is
//! stable. Each flag holds one of three value shapes:
//!
//! - a switch (`true` becomes `--name`)
//! - a single value (becomes `--name='value'`)
//! - a list of values (repeats `--name='value'` once per element)
//!
//! Falsy values (`false`, empty string, empty list) are kept in the mapping
//! but never serialized.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Group-by columns, outermost first.
pub const OPT_AGGREGATE: &str = "aggregate";
/// Aggregation method per column, as `column|method`.
pub const OPT_AGGREGATION: &str = "aggregation";
/// The data file starts with a header row naming the columns.
pub const OPT_AUTOCOLUMN: &str = "autocolumn";
/// Calculated column, as `name|expression`.
pub const OPT_CALCULATE: &str = "calculate";
/// Column description shown as a header tooltip, as `column|text`.
pub const OPT_DESCRIPTION: &str = "description";
/// Column formatter chain, as `column|format[|format...]`.
pub const OPT_FORMATTER: &str = "formatter";
/// Renderer module used to produce output.
pub const OPT_RENDERER: &str = "renderer";
/// Sort column, as `column` or `column|desc`.
pub const OPT_SORT: &str = "sort";
/// Omit detail rows, rendering aggregate rows only.
pub const OPT_SUPPRESSDETAIL: &str = "suppressdetail";

/// Value of a single renderer flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Bare flag, included only when `true`
    Switch(bool),
    /// Single key/value flag
    Value(String),
    /// Key/value flag repeated once per element
    List(Vec<String>),
}

impl FlagValue {
    /// Whether this value is omitted from the command line.
    pub fn is_falsy(&self) -> bool {
        match self {
            FlagValue::Switch(on) => !on,
            FlagValue::Value(value) => value.is_empty(),
            FlagValue::List(values) => values.is_empty(),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Switch(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Value(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::Value(value)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(values: Vec<String>) -> Self {
        FlagValue::List(values)
    }
}

impl From<Vec<&str>> for FlagValue {
    fn from(values: Vec<&str>) -> Self {
        FlagValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for FlagValue {
    fn from(values: &[&str]) -> Self {
        FlagValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Insertion-ordered mapping of flag name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    entries: Vec<(String, FlagValue)>,
}

impl Flags {
    /// Create an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag. An existing flag keeps its position and takes the new value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Builder: set a flag.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Append values to a list flag, converting a single value into a list.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, FlagValue::List(values))) => values.push(value),
            Some((_, slot)) => {
                let mut values = match std::mem::replace(slot, FlagValue::List(Vec::new())) {
                    FlagValue::Value(existing) if !existing.is_empty() => vec![existing],
                    _ => Vec::new(),
                };
                values.push(value);
                *slot = FlagValue::List(values);
            }
            None => self.entries.push((name, FlagValue::List(vec![value]))),
        }
        self
    }

    /// Look up a flag value.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Remove a flag, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<FlagValue> {
        let pos = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterate flags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of flags, including falsy ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no flags are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize into renderer arguments, in insertion order.
    ///
    /// Falsy flags are skipped entirely.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (name, value) in &self.entries {
            match value {
                FlagValue::Switch(true) => args.push(format!("--{}", name)),
                FlagValue::Switch(false) => {}
                FlagValue::Value(v) if v.is_empty() => {}
                FlagValue::Value(v) => args.push(format!("--{}='{}'", name, escape_value(v))),
                FlagValue::List(values) => {
                    for v in values {
                        args.push(format!("--{}='{}'", name, escape_value(v)));
                    }
                }
            }
        }
        args
    }

    /// Serialize into a single space-separated argument string.
    pub fn to_arg_string(&self) -> String {
        let args = self.to_args().join(" ");
        debug!(flags = self.entries.len(), args = %args, "assembled renderer flags");
        args
    }
}

impl<K, V> FromIterator<(K, V)> for Flags
where
    K: Into<String>,
    V: Into<FlagValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut flags = Flags::new();
        for (name, value) in iter {
            flags.set(name, value);
        }
        flags
    }
}

/// Escape a flag value for a single-quoted shell argument.
///
/// Backslash-escapes quotes, backslashes and NUL. Nothing else is touched.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_string_in_insertion_order() {
        let flags = Flags::new()
            .with(OPT_AUTOCOLUMN, true)
            .with(OPT_SORT, vec!["a", "b|desc"])
            .with(OPT_RENDERER, "x");

        assert_eq!(
            flags.to_arg_string(),
            "--autocolumn --sort='a' --sort='b|desc' --renderer='x'"
        );
    }

    #[test]
    fn test_falsy_values_omitted() {
        let flags = Flags::new()
            .with(OPT_AUTOCOLUMN, false)
            .with(OPT_RENDERER, "")
            .with(OPT_SORT, Vec::<String>::new())
            .with(OPT_SUPPRESSDETAIL, true);

        assert_eq!(flags.len(), 4);
        assert_eq!(flags.to_arg_string(), "--suppressdetail");
    }

    #[test]
    fn test_empty_flags() {
        assert_eq!(Flags::new().to_arg_string(), "");
        assert!(Flags::new().to_args().is_empty());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut flags = Flags::new().with("a", "1").with("b", "2");
        flags.set("a", "3");

        assert_eq!(flags.to_arg_string(), "--a='3' --b='2'");
    }

    #[test]
    fn test_push_converts_value_to_list() {
        let mut flags = Flags::new().with(OPT_SORT, "a");
        flags.push(OPT_SORT, "b|desc");
        flags.push("aggregate", "region");

        assert_eq!(
            flags.get(OPT_SORT),
            Some(&FlagValue::List(vec!["a".to_string(), "b|desc".to_string()]))
        );
        assert_eq!(
            flags.to_arg_string(),
            "--sort='a' --sort='b|desc' --aggregate='region'"
        );
    }

    #[test]
    fn test_remove() {
        let mut flags = Flags::new().with("a", true).with("b", true);
        assert_eq!(flags.remove("a"), Some(FlagValue::Switch(true)));
        assert_eq!(flags.remove("a"), None);
        assert_eq!(flags.to_arg_string(), "--b");
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("plain"), "plain");
        assert_eq!(escape_value("it's"), "it\\'s");
        assert_eq!(escape_value("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_value("a\\b"), "a\\\\b");
        assert_eq!(escape_value("nul\0"), "nul\\0");
        assert_eq!(escape_value("{Age}*2 $x"), "{Age}*2 $x");
    }

    #[test]
    fn test_quoted_value_in_args() {
        let flags = Flags::new().with(OPT_DESCRIPTION, "Age|years since 'birth'");
        assert_eq!(
            flags.to_arg_string(),
            "--description='Age|years since \\'birth\\''"
        );
    }

    #[test]
    fn test_from_iterator() {
        let flags: Flags = vec![("x", FlagValue::from(true)), ("y", FlagValue::from("z"))]
            .into_iter()
            .collect();
        assert_eq!(flags.to_arg_string(), "--x --y='z'");
    }

    #[test]
    fn test_flag_value_json_shapes() {
        let value: FlagValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, FlagValue::Switch(true));
        let value: FlagValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(value, FlagValue::Value("x".to_string()));
        let value: FlagValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert!(!value.is_falsy());
    }
}
