//! A uniform, read-only view over syntax-tree values.
//!
//! The engine never sees concrete node types. Nodes, lists of nodes, plain
//! records, and scalar properties are all values of a single type
//! implementing [`AstValue`], and a node is any object whose `type` member is
//! a string. Values are handled as `&'a V`, and two nodes are the same node
//! only if they are the same reference.

use serde_json::Value as Json;

/// The shape of a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind<'a, V> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    List(&'a [V]),
    Object,
}

/// The contract between the engine and a syntax-tree representation.
pub trait AstValue: Sized {
    /// The shape of this value.
    fn kind(&self) -> ValueKind<'_, Self>;

    /// The member `key` of an object. Returns `None` for missing members and
    /// for values that are not objects.
    fn member(&self, key: &str) -> Option<&Self>;

    /// The member names of an object in their original order, or an empty
    /// list for values that are not objects.
    fn member_names(&self) -> Vec<&str>;

    /// The `type` of a node, or `None` if this value is not a node.
    fn node_type(&self) -> Option<&str> {
        match self.member("type")?.kind() {
            ValueKind::String(kind) => Some(kind),
            _ => None,
        }
    }

    fn is_node(&self) -> bool {
        self.node_type().is_some()
    }

    /// The elements of a list, or `None` if this value is not a list.
    fn elements(&self) -> Option<&[Self]> {
        match self.kind() {
            ValueKind::List(elements) => Some(elements),
            _ => None,
        }
    }
}

impl AstValue for Json {
    fn kind(&self) -> ValueKind<'_, Self> {
        match self {
            Json::Null => ValueKind::Null,
            Json::Bool(b) => ValueKind::Bool(*b),
            Json::Number(n) => ValueKind::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => ValueKind::String(s),
            Json::Array(elements) => ValueKind::List(elements),
            Json::Object(_) => ValueKind::Object,
        }
    }

    fn member(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn member_names(&self) -> Vec<&str> {
        self.as_object()
            .map(|members| members.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Returns `true` if `a` and `b` are the same value in the tree.
#[inline]
#[must_use]
pub fn same<V>(a: &V, b: &V) -> bool {
    std::ptr::eq(a, b)
}
