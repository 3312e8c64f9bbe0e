//! Property lookups with JavaScript member-access rules.

use crate::tree::{AstValue, ValueKind};

/// The result of reading a property.
///
/// `length` of a list or string is a number that does not exist anywhere in
/// the tree, so it is carried by value.
pub(crate) enum Prop<'a, V> {
    Undefined,
    Value(&'a V),
    Number(f64),
}

impl<V> Clone for Prop<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Prop<'_, V> {}

impl<'a, V: AstValue> Prop<'a, V> {
    /// `true` for `undefined` and `null`.
    pub(crate) fn is_nullish(self) -> bool {
        match self {
            Prop::Undefined => true,
            Prop::Value(value) => matches!(value.kind(), ValueKind::Null),
            Prop::Number(_) => false,
        }
    }

    pub(crate) fn as_str(self) -> Option<&'a str> {
        match self {
            Prop::Value(value) => match value.kind() {
                ValueKind::String(s) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Follows `path` from `value`. A `null` along the way is returned as is,
/// anything else missing is `undefined`.
pub(crate) fn resolve<'a, V: AstValue>(value: &'a V, path: &[String]) -> Prop<'a, V> {
    let mut current = Prop::Value(value);
    for key in path {
        current = match current {
            Prop::Value(value) if matches!(value.kind(), ValueKind::Null) => return current,
            Prop::Value(value) => property(value, key),
            Prop::Undefined | Prop::Number(_) => return Prop::Undefined,
        };
    }
    current
}

#[allow(clippy::cast_precision_loss)]
fn property<'a, V: AstValue>(value: &'a V, key: &str) -> Prop<'a, V> {
    match value.kind() {
        ValueKind::List(elements) if key == "length" => Prop::Number(elements.len() as f64),
        ValueKind::String(s) if key == "length" => Prop::Number(s.encode_utf16().count() as f64),
        _ => lookup(value, key).map_or(Prop::Undefined, Prop::Value),
    }
}

/// The member `key` of an object, or the element at index `key` of a list.
pub(crate) fn lookup<'a, V: AstValue>(value: &'a V, key: &str) -> Option<&'a V> {
    match value.kind() {
        ValueKind::Object => value.member(key),
        ValueKind::List(elements) => elements.get(array_index(key)?),
        _ => None,
    }
}

/// Parses a canonical array index: digits only, no leading zeros.
fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn path(dotted: &str) -> Vec<String> {
        dotted.split('.').map(str::to_string).collect()
    }

    fn resolved(value: &Value, dotted: &str) -> Option<Value> {
        match resolve(value, &path(dotted)) {
            Prop::Undefined => None,
            Prop::Value(value) => Some(value.clone()),
            Prop::Number(n) => Some(json!(n)),
        }
    }

    #[test]
    fn nested_members() {
        let node = json!({"callee": {"object": {"name": "console"}}});
        assert_eq!(resolved(&node, "callee.object.name"), Some(json!("console")));
        assert_eq!(resolved(&node, "callee.property.name"), None);
    }

    #[test]
    fn null_stops_the_walk() {
        let node = json!({"init": null});
        assert_eq!(resolved(&node, "init.value"), Some(Value::Null));
    }

    #[test]
    fn lists_have_indexes_and_length() {
        let node = json!({"params": [{"name": "a"}, {"name": "b"}], "name": "héllo😀"});
        assert_eq!(resolved(&node, "params.1.name"), Some(json!("b")));
        assert_eq!(resolved(&node, "params.01"), None);
        assert_eq!(resolved(&node, "params.length"), Some(json!(2.0)));
        assert_eq!(resolved(&node, "name.length"), Some(json!(7.0)));
    }
}
