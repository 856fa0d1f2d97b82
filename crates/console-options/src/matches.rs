use indexmap::IndexMap;
use serde::Serialize;

use crate::arity::Arity;
use crate::definition::OptionDeclaration;
use crate::value::Value;

/// Key under which positional arguments are stored.
pub const POSITIONAL_KEY: &str = "_";

/// Parsed options and positional arguments.
///
/// Maps each option's canonical key to its [`Value`]. The `_` key is always
/// present and holds the positional arguments in the order they were seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParseResult {
    values: IndexMap<String, Value>,
}

impl Default for ParseResult {
    fn default() -> Self {
        let mut values = IndexMap::new();
        values.insert(POSITIONAL_KEY.to_string(), Value::List(Vec::new()));
        Self { values }
    }
}

impl ParseResult {
    /// The stored value for `key`, or `None` if the option was not given.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether a value is stored for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Everything, including `_`.
    pub fn all(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Positional arguments in encounter order.
    pub fn positionals(&self) -> &[String] {
        self.values
            .get(POSITIONAL_KEY)
            .and_then(Value::as_list)
            .unwrap_or(&[])
    }

    /// Option keys that were set, excluding `_`.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| *k != POSITIONAL_KEY)
    }

    /// Number of options set, excluding `_`.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// True when no option was set (positionals may still exist).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the parser hands to [`ParseResult::accumulate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input<'a> {
    /// The flag itself, with no argument.
    Flag,
    Literal(&'a str),
}

impl Input<'_> {
    fn into_value(self) -> Value {
        match self {
            Self::Flag => Value::Flag,
            Self::Literal(s) => Value::Scalar(s.to_string()),
        }
    }
}

impl ParseResult {
    pub(crate) fn push_positional(&mut self, arg: &str) {
        if let Some(Value::List(list)) = self.values.get_mut(POSITIONAL_KEY) {
            list.push(arg.to_string());
            return;
        }
        // An option whose canonical key is `_` clobbered the slot.
        self.values
            .insert(POSITIONAL_KEY.to_string(), Value::List(vec![arg.to_string()]));
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Merge `input` into the slot for `decl`, honoring its arity.
    ///
    /// Returns `false` and leaves the result untouched when the value is
    /// rejected: a single-value option that is already set, a fixed-size list
    /// that is full, or a bare flag offered to an option that needs a value.
    pub(crate) fn accumulate(&mut self, decl: &OptionDeclaration, input: Input<'_>) -> bool {
        let key = decl.canonical_key();
        let arity = decl.arity();

        match arity {
            Arity::Exact(0) => {
                if self.values.contains_key(key) {
                    return false;
                }
                self.values.insert(key.to_string(), Value::Flag);
                return true;
            }
            Arity::Exact(1) if self.values.contains_key(key) => return false,
            Arity::Optional => {
                if let Some(slot) = self.values.get_mut(key) {
                    // A real value is never overwritten, only the placeholder.
                    if !slot.is_flag() {
                        return false;
                    }
                    *slot = input.into_value();
                } else {
                    self.values.insert(key.to_string(), input.into_value());
                }
                return true;
            }
            _ => {}
        }

        let Input::Literal(literal) = input else {
            if arity == Arity::ZeroOrMore {
                // The placeholder only stands in for "no values yet".
                if self.values.contains_key(key) {
                    return false;
                }
                self.values.insert(key.to_string(), Value::Flag);
                return true;
            }
            return false;
        };

        if !arity.is_list() {
            self.values
                .insert(key.to_string(), Value::Scalar(literal.to_string()));
            return true;
        }

        let slot = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        if arity == Arity::ZeroOrMore && slot.is_flag() {
            *slot = Value::List(Vec::new());
        }
        let Value::List(list) = slot else {
            return false;
        };
        if let Arity::Exact(n) = arity {
            if list.len() >= n {
                return false;
            }
        }
        list.push(literal.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Input, ParseResult};
    use crate::{Arity, OptionDeclaration, Value};

    fn decl(names: &str, arity: Arity) -> OptionDeclaration {
        OptionDeclaration::new(names, arity).unwrap()
    }

    fn list(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn fresh_result_has_only_positionals() {
        let r = ParseResult::default();
        assert!(r.has("_"));
        assert!(r.is_empty());
        assert!(r.positionals().is_empty());
        assert_eq!(r.get("_"), Some(&list(&[])));
    }

    #[test]
    fn switch_is_forced_to_flag_and_set_once() {
        let d = decl("help, h", Arity::Exact(0));
        let mut r = ParseResult::default();
        assert!(r.accumulate(&d, Input::Literal("ignored")));
        assert_eq!(r.get("help"), Some(&Value::Flag));
        assert!(!r.accumulate(&d, Input::Flag));
    }

    #[test]
    fn single_value_is_never_overwritten() {
        let d = decl("out, o", Arity::Exact(1));
        let mut r = ParseResult::default();
        assert!(!r.accumulate(&d, Input::Flag));
        assert!(!r.has("out"));
        assert!(r.accumulate(&d, Input::Literal("a.xml")));
        assert!(!r.accumulate(&d, Input::Literal("b.xml")));
        assert_eq!(r.get("out"), Some(&Value::Scalar("a.xml".to_string())));
    }

    #[test]
    fn optional_value_supersedes_placeholder_once() {
        let d = decl("opt", Arity::Optional);
        let mut r = ParseResult::default();
        assert!(r.accumulate(&d, Input::Flag));
        assert_eq!(r.get("opt"), Some(&Value::Flag));
        assert!(r.accumulate(&d, Input::Literal("v1")));
        assert_eq!(r.get("opt"), Some(&Value::Scalar("v1".to_string())));
        assert!(!r.accumulate(&d, Input::Literal("v2")));
        assert!(!r.accumulate(&d, Input::Flag));
        assert_eq!(r.get("opt"), Some(&Value::Scalar("v1".to_string())));
    }

    #[test]
    fn fixed_list_stops_at_capacity() {
        let d = decl("pair", Arity::Exact(2));
        let mut r = ParseResult::default();
        assert!(!r.accumulate(&d, Input::Flag));
        assert!(!r.has("pair"));
        assert!(r.accumulate(&d, Input::Literal("a")));
        assert!(r.accumulate(&d, Input::Literal("b")));
        assert!(!r.accumulate(&d, Input::Literal("c")));
        assert_eq!(r.get("pair"), Some(&list(&["a", "b"])));
    }

    #[test]
    fn zero_or_more_placeholder_is_replaced_by_values() {
        let d = decl("files", Arity::ZeroOrMore);
        let mut r = ParseResult::default();
        assert!(r.accumulate(&d, Input::Flag));
        assert_eq!(r.get("files"), Some(&Value::Flag));
        assert!(!r.accumulate(&d, Input::Flag));
        assert!(r.accumulate(&d, Input::Literal("a")));
        assert!(r.accumulate(&d, Input::Literal("b")));
        assert_eq!(r.get("files"), Some(&list(&["a", "b"])));
        assert!(!r.accumulate(&d, Input::Flag));
        assert_eq!(r.get("files"), Some(&list(&["a", "b"])));
    }

    #[test]
    fn one_or_more_rejects_bare_flag() {
        let d = decl("tag", Arity::OneOrMore);
        let mut r = ParseResult::default();
        assert!(!r.accumulate(&d, Input::Flag));
        assert!(!r.has("tag"));
        assert!(r.accumulate(&d, Input::Literal("x")));
        assert!(r.accumulate(&d, Input::Literal("y")));
        assert_eq!(r.get("tag"), Some(&list(&["x", "y"])));
    }

    #[test]
    fn conflicting_tag_under_shared_key_is_rejected() {
        let single = decl("name", Arity::Exact(1));
        let many = decl("name", Arity::OneOrMore);
        let mut r = ParseResult::default();
        assert!(r.accumulate(&single, Input::Literal("a")));
        assert!(!r.accumulate(&many, Input::Literal("b")));
        assert_eq!(r.get("name"), Some(&Value::Scalar("a".to_string())));
    }

    #[test]
    fn reads_do_not_mutate() {
        let d = decl("tag", Arity::OneOrMore);
        let mut r = ParseResult::default();
        r.accumulate(&d, Input::Literal("x"));
        r.push_positional("file.json");
        let first = (r.get("tag").cloned(), r.has("tag"), r.all().clone());
        let second = (r.get("tag").cloned(), r.has("tag"), r.all().clone());
        assert_eq!(first, second);
        assert_eq!(r.positionals(), ["file.json"]);
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["tag"]);
    }
}
